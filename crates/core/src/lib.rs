// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stage transition engine and bulk coordinator for FinComms.
//!
//! [`apply`] is a pure function from an invoice and a [`Command`] to the
//! updated invoice, the patch to persist, and an audit event. [`execute`]
//! and [`bulk_apply`] route commands through an [`InvoiceStore`].

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

mod apply;
mod bulk;
mod command;
mod error;
mod state;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{
    apply, apply_stage, payment_request_patch, request_payment, revert, revert_patch, stage_patch,
    validate_payment,
};
pub use bulk::{BulkFailure, BulkReport, Executed, OperationError, bulk_apply, execute};
pub use command::Command;
pub use error::{CoreError, ErrorKind};
pub use state::TransitionResult;
pub use store::InvoiceStore;
