// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The invoice record and the partial-update payload that mutates it.
//!
//! Stage, payment and evidence fields are only reachable through
//! [`Invoice::apply_patch`], which rejects any stage outside the invoice's
//! own flow. Display fields are opaque payload and stay public.

use crate::error::DomainError;
use crate::flow::{FlowType, Stage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Opaque invoice identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(i64);

impl InvoiceId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment progress, independent of the invoice's stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    None,
    Requested,
    Paid,
}

impl PaymentStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Requested => "REQUESTED",
            Self::Paid => "PAID",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "REQUESTED" => Ok(Self::Requested),
            "PAID" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

/// How an invoice entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceSource {
    /// Typed in by an AP processor.
    Manual,
    /// Loaded from an uploaded spreadsheet.
    SpreadsheetImport,
    /// Pushed by the vendor reconciliation tool.
    ReconciliationImport,
}

impl InvoiceSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::SpreadsheetImport => "SPREADSHEET_IMPORT",
            Self::ReconciliationImport => "RECONCILIATION_IMPORT",
        }
    }
}

impl std::fmt::Display for InvoiceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of evidence attached to an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceKind {
    Note,
    Email,
}

impl FromStr for EvidenceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NOTE" => Ok(Self::Note),
            "EMAIL" => Ok(Self::Email),
            _ => Err(DomainError::InvalidEvidenceKind(s.to_string())),
        }
    }
}

/// A note or email recorded against an invoice.
///
/// Evidence is append-only and tagged with the stage it was added at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub kind: EvidenceKind,
    pub stage: Stage,
    pub body: String,
    /// Email subject line; `None` for notes.
    pub subject: Option<String>,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

/// The one-time record created when a requested payment is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentValidation {
    pub validated_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub validated_at: OffsetDateTime,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
}

/// A request to create an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub vendor: String,
    pub amount: Decimal,
    pub currency: String,
    pub entity: Option<String>,
    pub detail: Option<String>,
    pub flow_type: FlowType,
    pub source: InvoiceSource,
    pub created_by: String,
}

impl NewInvoice {
    /// Currency assumed for reconciliation imports that carry none.
    pub const DEFAULT_CURRENCY: &'static str = "EUR";

    /// Vendor assumed for reconciliation rows that carry none.
    pub const UNKNOWN_VENDOR: &'static str = "Unknown Vendor";

    /// Builds a creation request for a row pushed by the reconciliation tool.
    ///
    /// Reconciliation rows always open in the `MISSING_INVOICE` flow. A
    /// missing or blank vendor becomes [`Self::UNKNOWN_VENDOR`].
    #[must_use]
    pub fn from_reconciliation(
        invoice_number: &str,
        vendor: Option<&str>,
        entity: Option<&str>,
        amount: Decimal,
        currency: Option<&str>,
        created_by: &str,
    ) -> Self {
        Self {
            invoice_number: invoice_number.trim().to_string(),
            vendor: vendor
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(Self::UNKNOWN_VENDOR)
                .to_string(),
            amount,
            currency: currency
                .map_or(Self::DEFAULT_CURRENCY, str::trim)
                .to_ascii_uppercase(),
            entity: entity
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            detail: None,
            flow_type: FlowType::MissingInvoice,
            source: InvoiceSource::ReconciliationImport,
            created_by: created_by.to_string(),
        }
    }
}

/// Partial update payload dispatched to the store.
///
/// Every field left as `None` (or empty, for evidence) is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoicePatch {
    pub stage: Option<Stage>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_blocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub append_evidence: Vec<Evidence>,
    pub payment_validation: Option<PaymentValidation>,
}

impl InvoicePatch {
    /// Returns true if applying this patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stage.is_none()
            && self.payment_status.is_none()
            && self.payment_blocked.is_none()
            && self.append_evidence.is_empty()
            && self.payment_validation.is_none()
    }
}

/// An invoice tracked through one of the two approval flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub vendor: String,
    pub amount: Decimal,
    pub currency: String,
    pub entity: Option<String>,
    pub detail: Option<String>,
    pub source: InvoiceSource,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    current_stage: Stage,
    payment_status: PaymentStatus,
    payment_blocked: bool,
    #[serde(default)]
    evidence: Vec<Evidence>,
    payment_validation: Option<PaymentValidation>,
}

impl Invoice {
    /// Creates an invoice from a creation request.
    ///
    /// The invoice starts at the first stage of its flow with no payment
    /// activity and no evidence.
    #[must_use]
    pub fn create(id: InvoiceId, new: NewInvoice, now: OffsetDateTime) -> Self {
        Self {
            id,
            invoice_number: new.invoice_number,
            vendor: new.vendor,
            amount: new.amount,
            currency: new.currency,
            entity: new.entity,
            detail: new.detail,
            source: new.source,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
            current_stage: new.flow_type.initial_stage(),
            payment_status: PaymentStatus::None,
            payment_blocked: false,
            evidence: Vec::new(),
            payment_validation: None,
        }
    }

    /// Returns the flow type, fixed at creation.
    #[must_use]
    pub const fn flow_type(&self) -> FlowType {
        self.current_stage.flow_type()
    }

    #[must_use]
    pub const fn current_stage(&self) -> Stage {
        self.current_stage
    }

    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    #[must_use]
    pub const fn payment_blocked(&self) -> bool {
        self.payment_blocked
    }

    #[must_use]
    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    #[must_use]
    pub const fn payment_validation(&self) -> Option<&PaymentValidation> {
        self.payment_validation.as_ref()
    }

    /// Returns true once the invoice has reached its flow's terminal stage.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.current_stage.is_closed()
    }

    /// Applies a partial update in place.
    ///
    /// The patch is checked in full before anything is written, so a
    /// rejected patch leaves the invoice untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StageNotInFlow` if the patch carries a stage,
    /// or evidence tagged with a stage, from the other flow.
    pub fn apply_patch(&mut self, patch: &InvoicePatch) -> Result<(), DomainError> {
        let flow: FlowType = self.flow_type();
        let foreign = patch
            .stage
            .iter()
            .chain(patch.append_evidence.iter().map(|e| &e.stage))
            .find(|s| s.flow_type() != flow);
        if let Some(stage) = foreign {
            return Err(DomainError::StageNotInFlow {
                flow,
                stage: stage.label().to_string(),
            });
        }

        if let Some(stage) = patch.stage {
            self.current_stage = stage;
        }
        if let Some(status) = patch.payment_status {
            self.payment_status = status;
        }
        if let Some(blocked) = patch.payment_blocked {
            self.payment_blocked = blocked;
        }
        self.evidence.extend(patch.append_evidence.iter().cloned());
        if let Some(record) = &patch.payment_validation {
            self.payment_validation = Some(record.clone());
        }
        Ok(())
    }
}
