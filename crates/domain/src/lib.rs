// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and classification rules for FinComms.
//!
//! Everything here is a pure function over invoice values: the stage
//! taxonomy of both flows, the team-view classifier, per-view counts, and
//! view listings. Nothing in this crate performs I/O.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod aggregation;
mod error;
mod flow;
mod invoice;
mod listing;
mod team_view;
mod validation;

#[cfg(test)]
mod tests;

pub use aggregation::{ApPanelCounts, ViewCounts, counts_by_ap_panel, counts_by_view};
pub use error::DomainError;
pub use flow::{FlowType, MissingInvoiceStage, PoPendingStage, Stage};
pub use invoice::{
    Evidence, EvidenceKind, Invoice, InvoiceId, InvoicePatch, InvoiceSource, NewInvoice,
    PaymentStatus, PaymentValidation,
};
pub use listing::{ListQuery, SortDirection, SortKey, SortOrder, list_view};
pub use team_view::{ApPanel, Queue, TeamView, ap_panel, classify, is_visible_in};
pub use validation::{validate_invoice_record, validate_new_invoice};
