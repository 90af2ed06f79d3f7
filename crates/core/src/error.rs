// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fincomms_domain::{DomainError, FlowType, InvoiceId};

/// Broad category of a [`CoreError`], for callers that render errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request does not fit the invoice's flow or current state.
    Validation,
    /// Revert requested at the first stage of the flow.
    Terminal,
    /// The stored invoice itself is inconsistent.
    Integrity,
}

/// Errors that can occur during invoice transitions.
///
/// None of these errors mutate the invoice they were raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The requested stage is not in the invoice's flow sequence.
    StageNotInFlow {
        invoice_id: InvoiceId,
        flow: FlowType,
        stage: String,
    },
    /// A closed invoice cannot be moved forward to an open stage.
    InvoiceClosed {
        invoice_id: InvoiceId,
        requested: String,
    },
    /// Revert requested on an invoice already at its flow's first stage.
    AlreadyAtInitialStage {
        invoice_id: InvoiceId,
        stage: String,
    },
    /// Payment cannot be requested again once it has been validated.
    AlreadyPaid { invoice_id: InvoiceId },
    /// Evidence must carry a body.
    EmptyEvidence { invoice_id: InvoiceId },
    /// A domain rule was violated.
    DomainViolation(DomainError),
}

impl CoreError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StageNotInFlow { .. }
            | Self::InvoiceClosed { .. }
            | Self::AlreadyPaid { .. }
            | Self::EmptyEvidence { .. } => ErrorKind::Validation,
            Self::AlreadyAtInitialStage { .. } => ErrorKind::Terminal,
            Self::DomainViolation(_) => ErrorKind::Integrity,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StageNotInFlow {
                invoice_id,
                flow,
                stage,
            } => {
                write!(
                    f,
                    "Invoice {invoice_id}: stage '{stage}' is not part of the {flow} flow"
                )
            }
            Self::InvoiceClosed {
                invoice_id,
                requested,
            } => {
                write!(
                    f,
                    "Invoice {invoice_id} is closed and cannot move to '{requested}'"
                )
            }
            Self::AlreadyAtInitialStage { invoice_id, stage } => {
                write!(
                    f,
                    "Invoice {invoice_id} is already at its initial stage '{stage}'"
                )
            }
            Self::AlreadyPaid { invoice_id } => {
                write!(f, "Invoice {invoice_id} has already been paid")
            }
            Self::EmptyEvidence { invoice_id } => {
                write!(f, "Invoice {invoice_id}: evidence body cannot be empty")
            }
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
