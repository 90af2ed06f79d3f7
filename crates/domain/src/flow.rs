// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flow types and their fixed stage sequences.
//!
//! Each flow type owns its own stage enumeration. A [`Stage`] carries the
//! flow it belongs to, so a stage from one flow can never be stored on an
//! invoice of the other. Display labels are shared between flows
//! ("PO Created", "Closed") and only exist at the presentation boundary.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The two invoice approval pipelines.
///
/// The flow type is fixed when an invoice is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    /// Reconciliation-sourced: the vendor statement shows an invoice the ERP lacks.
    MissingInvoice,
    /// Directly entered invoice waiting on a purchase order.
    PoPending,
}

impl FlowType {
    /// Every flow type, in declaration order.
    pub const ALL: [Self; 2] = [Self::MissingInvoice, Self::PoPending];

    /// Returns the wire representation of the flow type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingInvoice => "MISSING_INVOICE",
            Self::PoPending => "PO_PENDING",
        }
    }

    /// Returns the ordered stage sequence of this flow.
    ///
    /// This sequence is the single source of truth for forward validation
    /// and revert computation.
    #[must_use]
    pub const fn stages(&self) -> &'static [Stage] {
        match self {
            Self::MissingInvoice => &MISSING_INVOICE_SEQUENCE,
            Self::PoPending => &PO_PENDING_SEQUENCE,
        }
    }

    /// Returns the stage a newly created invoice of this flow starts in.
    #[must_use]
    pub const fn initial_stage(&self) -> Stage {
        match self {
            Self::MissingInvoice => Stage::MissingInvoice(MissingInvoiceStage::InvoiceMissing),
            Self::PoPending => Stage::PoPending(PoPendingStage::InvoiceReceived),
        }
    }

    /// Returns the terminal stage of this flow.
    #[must_use]
    pub const fn closed_stage(&self) -> Stage {
        match self {
            Self::MissingInvoice => Stage::MissingInvoice(MissingInvoiceStage::Closed),
            Self::PoPending => Stage::PoPending(PoPendingStage::Closed),
        }
    }
}

impl std::fmt::Display for FlowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FlowType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MISSING_INVOICE" => Ok(Self::MissingInvoice),
            "PO_PENDING" => Ok(Self::PoPending),
            _ => Err(DomainError::InvalidFlowType(s.to_string())),
        }
    }
}

/// Stages of the `MISSING_INVOICE` flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingInvoiceStage {
    InvoiceMissing,
    SentToApProcessing,
    PoCreated,
    Posted,
    Closed,
}

impl MissingInvoiceStage {
    const fn label(self) -> &'static str {
        match self {
            Self::InvoiceMissing => "Invoice Missing",
            Self::SentToApProcessing => "Sent to AP Processing",
            Self::PoCreated => "PO Created",
            Self::Posted => "Posted",
            Self::Closed => "Closed",
        }
    }
}

/// Stages of the `PO_PENDING` flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoPendingStage {
    InvoiceReceived,
    PoEmailSent,
    PoCreated,
    ExrCreated,
    Closed,
}

impl PoPendingStage {
    const fn label(self) -> &'static str {
        match self {
            Self::InvoiceReceived => "Invoice Received",
            Self::PoEmailSent => "PO Email Sent",
            Self::PoCreated => "PO Created",
            Self::ExrCreated => "EXR Created",
            Self::Closed => "Closed",
        }
    }
}

const MISSING_INVOICE_SEQUENCE: [Stage; 5] = [
    Stage::MissingInvoice(MissingInvoiceStage::InvoiceMissing),
    Stage::MissingInvoice(MissingInvoiceStage::SentToApProcessing),
    Stage::MissingInvoice(MissingInvoiceStage::PoCreated),
    Stage::MissingInvoice(MissingInvoiceStage::Posted),
    Stage::MissingInvoice(MissingInvoiceStage::Closed),
];

const PO_PENDING_SEQUENCE: [Stage; 5] = [
    Stage::PoPending(PoPendingStage::InvoiceReceived),
    Stage::PoPending(PoPendingStage::PoEmailSent),
    Stage::PoPending(PoPendingStage::PoCreated),
    Stage::PoPending(PoPendingStage::ExrCreated),
    Stage::PoPending(PoPendingStage::Closed),
];

/// A position within one flow's stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    MissingInvoice(MissingInvoiceStage),
    PoPending(PoPendingStage),
}

impl Stage {
    /// Returns the flow this stage belongs to.
    #[must_use]
    pub const fn flow_type(&self) -> FlowType {
        match self {
            Self::MissingInvoice(_) => FlowType::MissingInvoice,
            Self::PoPending(_) => FlowType::PoPending,
        }
    }

    /// Returns the display label shared with the presentation layer.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingInvoice(stage) => stage.label(),
            Self::PoPending(stage) => stage.label(),
        }
    }

    /// Returns true for the terminal stage of either flow.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::MissingInvoice(MissingInvoiceStage::Closed)
                | Self::PoPending(PoPendingStage::Closed)
        )
    }

    /// Returns the zero-based index of this stage within its flow sequence.
    #[must_use]
    pub fn position(&self) -> usize {
        // Every variant appears in its flow's sequence exactly once.
        self.flow_type()
            .stages()
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Returns the stage immediately before this one in its flow, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        let index = self.position();
        if index == 0 {
            return None;
        }
        self.flow_type().stages().get(index - 1).copied()
    }

    /// Returns the stage immediately after this one in its flow, if any.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.flow_type().stages().get(self.position() + 1).copied()
    }

    /// Resolves a display label within the given flow.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StageNotInFlow` if no stage of `flow` carries
    /// the label, including labels that exist only in the other flow.
    pub fn from_label(flow: FlowType, label: &str) -> Result<Self, DomainError> {
        let wanted: &str = label.trim();
        flow.stages()
            .iter()
            .find(|s| s.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| DomainError::StageNotInFlow {
                flow,
                stage: label.to_string(),
            })
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
