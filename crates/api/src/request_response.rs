// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Stages, flows, views and statuses cross this boundary as display strings.

use fincomms_domain::{
    ApPanelCounts, Evidence, Invoice, PaymentValidation, ViewCounts, classify,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One row of an invoice listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// The canonical invoice identifier.
    pub invoice_id: i64,
    pub invoice_number: String,
    pub vendor: String,
    pub amount: Decimal,
    pub currency: String,
    pub entity: Option<String>,
    /// The flow type (`MISSING_INVOICE` or `PO_PENDING`).
    pub flow_type: String,
    /// The stage display label.
    pub stage: String,
    pub payment_status: String,
    pub payment_blocked: bool,
    /// The team queue the invoice is listed in.
    pub queue: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl InvoiceSummary {
    /// Builds a listing row from an invoice.
    #[must_use]
    pub fn of(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.id.value(),
            invoice_number: invoice.invoice_number.clone(),
            vendor: invoice.vendor.clone(),
            amount: invoice.amount,
            currency: invoice.currency.clone(),
            entity: invoice.entity.clone(),
            flow_type: invoice.flow_type().to_string(),
            stage: invoice.current_stage().label().to_string(),
            payment_status: invoice.payment_status().to_string(),
            payment_blocked: invoice.payment_blocked(),
            queue: classify(invoice).view().to_string(),
            created_at: invoice.created_at,
        }
    }
}

/// Full view of a single invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub summary: InvoiceSummary,
    pub detail: Option<String>,
    pub created_by: String,
    /// Labels of the stages still ahead in the flow.
    pub remaining_stages: Vec<String>,
    pub evidence: Vec<Evidence>,
    pub payment_validation: Option<PaymentValidation>,
}

impl InvoiceDetail {
    /// Builds the detail view of an invoice.
    #[must_use]
    pub fn of(invoice: &Invoice) -> Self {
        let position: usize = invoice.current_stage().position();
        Self {
            summary: InvoiceSummary::of(invoice),
            detail: invoice.detail.clone(),
            created_by: invoice.created_by.clone(),
            remaining_stages: invoice
                .flow_type()
                .stages()
                .iter()
                .skip(position + 1)
                .map(|stage| stage.label().to_string())
                .collect(),
            evidence: invoice.evidence().to_vec(),
            payment_validation: invoice.payment_validation().cloned(),
        }
    }
}

/// API request for a queue listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueOverviewRequest {
    /// The team view; `None` lists every invoice.
    pub view: Option<String>,
    /// Free-text filter over invoice number, vendor and entity.
    pub search: Option<String>,
    /// Sort key (`created_at`, `amount` or `vendor`); newest first by default.
    pub sort_by: Option<String>,
    /// Sort ascending instead of descending.
    pub ascending: bool,
}

/// API response for a queue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueOverviewResponse {
    /// The view that was listed.
    pub view: String,
    /// Counts for every view, over the whole collection.
    pub counts: ViewCounts,
    /// Split of the AP queue into its display panels.
    pub ap_panels: ApPanelCounts,
    /// The listed invoices, filtered and sorted.
    pub invoices: Vec<InvoiceSummary>,
}

/// API request to create an invoice by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInvoiceRequest {
    pub invoice_number: String,
    pub vendor: String,
    pub amount: Decimal,
    /// Three-letter currency code; defaults to EUR.
    pub currency: Option<String>,
    pub entity: Option<String>,
    pub detail: Option<String>,
    /// The flow type; manual entries default to `PO_PENDING`.
    pub flow_type: Option<String>,
}

/// One row pushed by the vendor reconciliation tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    pub invoice_number: String,
    /// Missing or blank vendors import as "Unknown Vendor".
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
}

/// A reconciliation row that was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub invoice_number: String,
    pub reason: String,
}

/// API response for a reconciliation import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReconciliationResponse {
    pub created: Vec<InvoiceSummary>,
    pub skipped: Vec<SkippedRow>,
    pub message: String,
}

/// API request to move an invoice to a stage of its flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStageRequest {
    pub invoice_id: i64,
    /// The stage display label, e.g. "PO Created".
    pub stage: String,
}

/// API request to confirm a requested payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatePaymentRequest {
    pub invoice_id: i64,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
}

/// API request to attach a note or email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddEvidenceRequest {
    pub invoice_id: i64,
    /// `NOTE` or `EMAIL`.
    pub kind: String,
    pub body: String,
    /// Email subject; ignored for notes.
    pub subject: Option<String>,
}

/// API response for an operation on a single invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub invoice: InvoiceSummary,
    pub message: String,
}

/// The action of a bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    /// Move every invoice to the stage with this label in its own flow.
    ApplyStage { stage: String },
    Revert,
    RequestPayment,
    Block,
    Unblock,
}

/// API request to apply one action to many invoices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkActionRequest {
    pub invoice_ids: Vec<i64>,
    pub action: BulkAction,
}

/// One invoice that failed in a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemFailure {
    pub invoice_id: i64,
    pub error: String,
    pub retryable: bool,
}

/// API response for a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkActionResponse {
    pub succeeded: Vec<i64>,
    pub failed: Vec<BulkItemFailure>,
    pub message: String,
}
