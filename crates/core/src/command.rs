// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fincomms_domain::{EvidenceKind, InvoicePatch, PaymentValidation, Stage};
use time::OffsetDateTime;

/// A command represents user intent against one invoice, as data only.
///
/// Commands are the only way to request invoice changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the invoice's stage to any stage of its own flow.
    ApplyStage {
        /// The target stage.
        stage: Stage,
    },
    /// Move the invoice back to the previous stage of its flow.
    Revert,
    /// Put the invoice in the payment queue.
    RequestPayment,
    /// Confirm a requested payment.
    ValidatePayment {
        /// The one-time validation record.
        record: PaymentValidation,
    },
    /// Set or clear the payment block flag.
    SetPaymentBlocked {
        /// The new flag value.
        blocked: bool,
    },
    /// Append a note or email, tagged with the current stage.
    AddEvidence {
        kind: EvidenceKind,
        body: String,
        subject: Option<String>,
        author: String,
        added_at: OffsetDateTime,
    },
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ApplyStage { .. } => "ApplyStage",
            Self::Revert => "Revert",
            Self::RequestPayment => "RequestPayment",
            Self::ValidatePayment { .. } => "ValidatePayment",
            Self::SetPaymentBlocked { .. } => "SetPaymentBlocked",
            Self::AddEvidence { .. } => "AddEvidence",
        }
    }

    /// Returns the payload this command writes to every invoice it targets,
    /// or `None` when the payload depends on each invoice.
    ///
    /// Commands with a shared payload can be dispatched as one bulk update.
    #[must_use]
    pub fn shared_patch(&self) -> Option<InvoicePatch> {
        match self {
            Self::ApplyStage { stage } => Some(InvoicePatch {
                stage: Some(*stage),
                ..InvoicePatch::default()
            }),
            Self::RequestPayment => Some(InvoicePatch {
                payment_status: Some(fincomms_domain::PaymentStatus::Requested),
                ..InvoicePatch::default()
            }),
            Self::SetPaymentBlocked { blocked } => Some(InvoicePatch {
                payment_blocked: Some(*blocked),
                ..InvoicePatch::default()
            }),
            Self::Revert | Self::ValidatePayment { .. } | Self::AddEvidence { .. } => None,
        }
    }
}
