// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Presentation boundary for FinComms.
//!
//! Translates requests carrying display strings into core commands, runs
//! them against an [`AppState`], and translates every lower-layer error into
//! an [`ApiError`] that tells rule violations apart from storage failures.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod handlers;
mod request_response;
mod state;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, storage_failure, translate_core_error, translate_domain_error,
    translate_operation_error,
};
pub use handlers::{
    ApiResult, add_evidence, bulk_action, change_stage, create_invoice, import_reconciliation,
    invoice_detail, queue_overview, request_payment, revert_stage, set_payment_blocked,
    validate_payment,
};
pub use request_response::{
    AddEvidenceRequest, BulkAction, BulkActionRequest, BulkActionResponse, BulkItemFailure,
    ChangeStageRequest, CreateInvoiceRequest, ImportReconciliationResponse, InvoiceDetail,
    InvoiceResponse, InvoiceSummary, QueueOverviewRequest, QueueOverviewResponse,
    ReconciliationRow, SkippedRow, ValidatePaymentRequest,
};
pub use state::AppState;
