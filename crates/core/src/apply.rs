// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::TransitionResult;
use fincomms_audit::{Action, Actor, AuditEvent, Cause};
use fincomms_domain::{
    Evidence, Invoice, InvoicePatch, PaymentStatus, PaymentValidation, Stage,
    validate_invoice_record,
};
use tracing::warn;

/// Builds the partial update for moving an invoice to `stage`.
///
/// Any stage of the invoice's own flow is accepted, forward or backward,
/// so that stages can be skipped or corrected. The only refusals are a
/// stage from the other flow and re-opening a closed invoice.
///
/// # Errors
///
/// Returns `CoreError::StageNotInFlow` for a stage of the other flow, and
/// `CoreError::InvoiceClosed` for a closed invoice and an open target.
pub fn stage_patch(invoice: &Invoice, stage: Stage) -> Result<InvoicePatch, CoreError> {
    if stage.flow_type() != invoice.flow_type() {
        return Err(CoreError::StageNotInFlow {
            invoice_id: invoice.id,
            flow: invoice.flow_type(),
            stage: stage.label().to_string(),
        });
    }

    // Revert is the only way out of Closed.
    if invoice.is_closed() && !stage.is_closed() {
        return Err(CoreError::InvoiceClosed {
            invoice_id: invoice.id,
            requested: stage.label().to_string(),
        });
    }

    Ok(InvoicePatch {
        stage: Some(stage),
        ..InvoicePatch::default()
    })
}

/// Builds the partial update for moving an invoice one stage back.
///
/// Closed invoices revert to the last stage before closure.
///
/// # Errors
///
/// Returns `CoreError::AlreadyAtInitialStage` if the invoice is at the
/// first stage of its flow.
pub fn revert_patch(invoice: &Invoice) -> Result<InvoicePatch, CoreError> {
    let current: Stage = invoice.current_stage();
    let previous: Stage = current
        .previous()
        .ok_or_else(|| CoreError::AlreadyAtInitialStage {
            invoice_id: invoice.id,
            stage: current.label().to_string(),
        })?;

    Ok(InvoicePatch {
        stage: Some(previous),
        ..InvoicePatch::default()
    })
}

/// Builds the partial update for putting an invoice in the payment queue.
///
/// # Errors
///
/// Returns `CoreError::AlreadyPaid` if the invoice already carries a
/// payment validation record.
pub fn payment_request_patch(invoice: &Invoice) -> Result<InvoicePatch, CoreError> {
    // Rule: a validation record is only ever held by a PAID invoice
    if invoice.payment_validation().is_some() {
        return Err(CoreError::AlreadyPaid {
            invoice_id: invoice.id,
        });
    }

    Ok(InvoicePatch {
        payment_status: Some(PaymentStatus::Requested),
        ..InvoicePatch::default()
    })
}

fn plan(invoice: &Invoice, command: Command) -> Result<(InvoicePatch, Action), CoreError> {
    let name: String = command.name().to_string();
    let from: &str = invoice.current_stage().label();

    match command {
        Command::ApplyStage { stage } => {
            let patch = stage_patch(invoice, stage)?;
            let details = format!("{from} -> {}", stage.label());
            Ok((patch, Action::new(name, Some(details))))
        }
        Command::Revert => {
            let patch = revert_patch(invoice)?;
            let to: &str = patch.stage.map_or(from, |s| s.label());
            let details = format!("{from} -> {to}");
            Ok((patch, Action::new(name, Some(details))))
        }
        Command::RequestPayment => {
            let patch = payment_request_patch(invoice)?;
            let details = format!("requested at stage {from}");
            Ok((patch, Action::new(name, Some(details))))
        }
        Command::ValidatePayment { record } => {
            if invoice.payment_validation().is_some() {
                warn!(
                    invoice_id = %invoice.id,
                    invoice_number = %invoice.invoice_number,
                    "Replacing an existing payment validation record"
                );
            }
            let details = record
                .payment_reference
                .as_ref()
                .map(|reference| format!("reference {reference}"));
            let patch = InvoicePatch {
                payment_status: Some(PaymentStatus::Paid),
                payment_validation: Some(record),
                ..InvoicePatch::default()
            };
            Ok((patch, Action::new(name, details)))
        }
        Command::SetPaymentBlocked { blocked } => {
            let patch = InvoicePatch {
                payment_blocked: Some(blocked),
                ..InvoicePatch::default()
            };
            Ok((patch, Action::new(name, Some(format!("blocked={blocked}")))))
        }
        Command::AddEvidence {
            kind,
            body,
            subject,
            author,
            added_at,
        } => {
            if body.trim().is_empty() {
                return Err(CoreError::EmptyEvidence {
                    invoice_id: invoice.id,
                });
            }
            let evidence = Evidence {
                kind,
                stage: invoice.current_stage(),
                body,
                subject,
                author,
                added_at,
            };
            let details = format!("{kind:?} at stage {from}");
            let patch = InvoicePatch {
                append_evidence: vec![evidence],
                ..InvoicePatch::default()
            };
            Ok((patch, Action::new(name, Some(details))))
        }
    }
}

/// Applies a command to an invoice, producing the updated invoice, the
/// patch to persist, and an audit event.
///
/// # Arguments
///
/// * `invoice` - The current invoice (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the command is not permitted for this invoice. The
/// input invoice is left untouched in every case.
pub fn apply(
    invoice: &Invoice,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let (patch, action) = plan(invoice, command)?;
    let updated: Invoice = patched(invoice, &patch)?;

    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, invoice, &updated);

    Ok(TransitionResult {
        invoice: updated,
        patch,
        audit_event,
    })
}

fn patched(invoice: &Invoice, patch: &InvoicePatch) -> Result<Invoice, CoreError> {
    let mut updated: Invoice = invoice.clone();
    updated.apply_patch(patch)?;
    validate_invoice_record(&updated)?;
    Ok(updated)
}

/// Returns a copy of the invoice moved to `stage`.
///
/// # Errors
///
/// See [`stage_patch`].
pub fn apply_stage(invoice: &Invoice, stage: Stage) -> Result<Invoice, CoreError> {
    patched(invoice, &stage_patch(invoice, stage)?)
}

/// Returns a copy of the invoice moved back one stage.
///
/// # Errors
///
/// See [`revert_patch`].
pub fn revert(invoice: &Invoice) -> Result<Invoice, CoreError> {
    patched(invoice, &revert_patch(invoice)?)
}

/// Returns a copy of the invoice with payment requested.
///
/// The stage is unchanged; closed invoices can still be paid.
///
/// # Errors
///
/// See [`payment_request_patch`].
pub fn request_payment(invoice: &Invoice) -> Result<Invoice, CoreError> {
    patched(invoice, &payment_request_patch(invoice)?)
}

/// Returns a copy of the invoice with the validation record attached and
/// payment marked as paid.
///
/// The caller must not validate the same invoice twice; no deduplication
/// happens here.
///
/// # Errors
///
/// Only fails if the stored invoice is internally inconsistent.
pub fn validate_payment(
    invoice: &Invoice,
    record: PaymentValidation,
) -> Result<Invoice, CoreError> {
    patched(
        invoice,
        &InvoicePatch {
            payment_status: Some(PaymentStatus::Paid),
            payment_validation: Some(record),
            ..InvoicePatch::default()
        },
    )
}
