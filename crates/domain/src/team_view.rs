// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Team-view classification.
//!
//! This is the only place that decides which team queue an invoice sits in.
//! Counting, filtering and the AP panel split all go through [`classify`].
//!
//! Rules, first match wins:
//! 1. `paymentStatus = REQUESTED` → payment queue, whatever the stage.
//! 2. Closed → reconciliation for `MISSING_INVOICE`, AP for `PO_PENDING`.
//! 3. Reconciliation stages (Invoice Missing, Posted) → reconciliation.
//! 4. AP stages (Sent to AP Processing, Invoice Received, PO Email Sent,
//!    PO Created, EXR Created) → AP.
//!
//! The ALL view contains every invoice.

use crate::error::DomainError;
use crate::flow::{MissingInvoiceStage, Stage};
use crate::invoice::{Invoice, PaymentStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The single team queue an invoice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Queue {
    Reconciliation,
    ApProcessing,
    PaymentQueue,
}

impl Queue {
    /// Returns the team view that lists this queue.
    #[must_use]
    pub const fn view(&self) -> TeamView {
        match self {
            Self::Reconciliation => TeamView::Reconciliation,
            Self::ApProcessing => TeamView::ApProcessing,
            Self::PaymentQueue => TeamView::PaymentQueue,
        }
    }
}

/// A lens used to filter and count invoices for a processing team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamView {
    #[default]
    All,
    Reconciliation,
    ApProcessing,
    PaymentQueue,
}

impl TeamView {
    /// Every view, in tab order.
    pub const ALL_VIEWS: [Self; 4] = [
        Self::All,
        Self::Reconciliation,
        Self::ApProcessing,
        Self::PaymentQueue,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Reconciliation => "RECONCILIATION",
            Self::ApProcessing => "AP_PROCESSING",
            Self::PaymentQueue => "PAYMENT_QUEUE",
        }
    }
}

impl std::fmt::Display for TeamView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TeamView {
    type Err = DomainError;

    /// Accepts the wire names as well as the short tab names
    /// (`recon`, `ap`, `payment`, `all`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "RECONCILIATION" | "RECON" => Ok(Self::Reconciliation),
            "AP_PROCESSING" | "AP" => Ok(Self::ApProcessing),
            "PAYMENT_QUEUE" | "PAYMENT" => Ok(Self::PaymentQueue),
            _ => Err(DomainError::InvalidTeamView(s.to_string())),
        }
    }
}

/// Which AP panel an AP-queue invoice is shown in.
///
/// This is a display split of the AP queue by flow type; it does not
/// change queue membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApPanel {
    /// `MISSING_INVOICE` items escalated from reconciliation.
    EscalatedFromReconciliation,
    /// `PO_PENDING` items entered directly.
    DirectEntry,
}

/// Returns the queue an invoice currently belongs to.
///
/// Classification consults the flow type and stage jointly: the same label
/// ("PO Created", "Closed") lands in different queues per flow.
#[must_use]
pub const fn classify(invoice: &Invoice) -> Queue {
    if matches!(invoice.payment_status(), PaymentStatus::Requested) {
        return Queue::PaymentQueue;
    }

    match invoice.current_stage() {
        Stage::MissingInvoice(
            MissingInvoiceStage::InvoiceMissing
            | MissingInvoiceStage::Posted
            | MissingInvoiceStage::Closed,
        ) => Queue::Reconciliation,
        Stage::MissingInvoice(
            MissingInvoiceStage::SentToApProcessing | MissingInvoiceStage::PoCreated,
        )
        | Stage::PoPending(_) => Queue::ApProcessing,
    }
}

/// Returns true if the invoice is listed in the given view.
#[must_use]
pub fn is_visible_in(invoice: &Invoice, view: TeamView) -> bool {
    match view {
        TeamView::All => true,
        _ => classify(invoice).view() == view,
    }
}

/// Returns the AP panel for an invoice in the AP queue, `None` otherwise.
#[must_use]
pub fn ap_panel(invoice: &Invoice) -> Option<ApPanel> {
    if classify(invoice) != Queue::ApProcessing {
        return None;
    }
    Some(match invoice.current_stage() {
        Stage::MissingInvoice(_) => ApPanel::EscalatedFromReconciliation,
        Stage::PoPending(_) => ApPanel::DirectEntry,
    })
}
