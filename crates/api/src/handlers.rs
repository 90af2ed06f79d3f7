// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations over an [`AppState`].
//!
//! Each write translates the request into a core [`Command`], dispatches it
//! through the store, and refreshes the snapshot before answering. Audit
//! events are returned to the caller, which decides where to record them.

use crate::error::{
    ApiError, storage_failure, translate_domain_error, translate_operation_error,
};
use crate::request_response::{
    AddEvidenceRequest, BulkAction, BulkActionRequest, BulkActionResponse, BulkItemFailure,
    ChangeStageRequest, CreateInvoiceRequest, ImportReconciliationResponse, InvoiceDetail,
    InvoiceResponse, InvoiceSummary, QueueOverviewRequest, QueueOverviewResponse,
    ReconciliationRow, SkippedRow, ValidatePaymentRequest,
};
use crate::state::AppState;
use fincomms::{BulkReport, Command, InvoiceStore, bulk_apply, execute};
use fincomms_audit::{Actor, AuditEvent, Cause};
use fincomms_domain::{
    EvidenceKind, FlowType, Invoice, InvoiceId, InvoiceSource, ListQuery, NewInvoice,
    PaymentValidation, SortDirection, SortKey, SortOrder, Stage, TeamView, counts_by_ap_panel,
    counts_by_view, list_view, validate_new_invoice,
};
use std::collections::HashSet;
use time::OffsetDateTime;
use tracing::{info, warn};

/// The result of an API write that includes both the response and the audit events.
///
/// This ensures that successful API operations always produce an audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// One audit event per invoice changed.
    pub audit_events: Vec<AuditEvent>,
}

fn normalize_number(number: &str) -> String {
    number.trim().to_uppercase()
}

fn invoice_not_found(id: InvoiceId) -> ApiError {
    ApiError::NotFound {
        resource_type: String::from("Invoice"),
        message: format!("Invoice {id} does not exist"),
    }
}

fn find_invoice<S: InvoiceStore>(
    state: &AppState<S>,
    invoice_id: i64,
) -> Result<&Invoice, ApiError> {
    let id: InvoiceId = InvoiceId::new(invoice_id);
    state.invoice(id).ok_or_else(|| invoice_not_found(id))
}

fn number_in_use(invoices: &[Invoice], number: &str) -> bool {
    let wanted: String = normalize_number(number);
    invoices
        .iter()
        .any(|invoice| normalize_number(&invoice.invoice_number) == wanted)
}

fn parse_flow_type(value: &str) -> Result<FlowType, ApiError> {
    value
        .trim()
        .to_ascii_uppercase()
        .parse()
        .map_err(translate_domain_error)
}

/// Lists one team view together with the counts of every view.
///
/// The snapshot is refreshed first so counts and listing come from the
/// same, current collection.
///
/// # Errors
///
/// Returns an error if the view or sort key is unknown, or the store cannot
/// be read.
pub fn queue_overview<S: InvoiceStore>(
    state: &mut AppState<S>,
    request: &QueueOverviewRequest,
) -> Result<QueueOverviewResponse, ApiError> {
    let view: TeamView = match request.view.as_deref() {
        Some(value) => value.parse().map_err(translate_domain_error)?,
        None => TeamView::All,
    };
    let key: SortKey = match request.sort_by.as_deref() {
        Some(value) => value.parse().map_err(translate_domain_error)?,
        None => SortKey::default(),
    };
    let direction: SortDirection = if request.ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };

    state.refresh()?;

    let query: ListQuery = ListQuery {
        view,
        search: request.search.clone(),
        sort: SortOrder { key, direction },
    };
    let invoices: &[Invoice] = state.invoices();

    Ok(QueueOverviewResponse {
        view: view.to_string(),
        counts: counts_by_view(invoices),
        ap_panels: counts_by_ap_panel(invoices),
        invoices: list_view(invoices, &query)
            .into_iter()
            .map(InvoiceSummary::of)
            .collect(),
    })
}

/// Returns the full view of one invoice from the current snapshot.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the invoice is not in the snapshot.
pub fn invoice_detail<S: InvoiceStore>(
    state: &AppState<S>,
    invoice_id: i64,
) -> Result<InvoiceDetail, ApiError> {
    find_invoice(state, invoice_id).map(InvoiceDetail::of)
}

/// Creates an invoice entered by hand.
///
/// The uniqueness check runs against a freshly fetched snapshot.
///
/// # Errors
///
/// Returns an error if:
/// - The flow type is unknown
/// - Any field validation fails
/// - The invoice number is already tracked
/// - The store fails
pub fn create_invoice<S: InvoiceStore>(
    state: &mut AppState<S>,
    request: CreateInvoiceRequest,
    actor: &Actor,
    cause: Cause,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    let flow_type: FlowType = match request.flow_type.as_deref() {
        Some(value) => parse_flow_type(value)?,
        None => FlowType::PoPending,
    };

    let new: NewInvoice = NewInvoice {
        invoice_number: request.invoice_number.trim().to_string(),
        vendor: request.vendor.trim().to_string(),
        amount: request.amount,
        currency: request
            .currency
            .as_deref()
            .map_or(NewInvoice::DEFAULT_CURRENCY, str::trim)
            .to_ascii_uppercase(),
        entity: request.entity.filter(|e| !e.trim().is_empty()),
        detail: request.detail.filter(|d| !d.trim().is_empty()),
        flow_type,
        source: InvoiceSource::Manual,
        created_by: actor.id.clone(),
    };
    validate_new_invoice(&new).map_err(translate_domain_error)?;

    state.refresh()?;
    if number_in_use(state.invoices(), &new.invoice_number) {
        return Err(ApiError::RuleViolation {
            rule: String::from("unique_invoice_number"),
            message: format!("Invoice number '{}' is already tracked", new.invoice_number),
        });
    }

    let invoice: Invoice = state
        .store_mut()
        .create(new)
        .map_err(|e| storage_failure(&e))?;
    state.refresh()?;
    info!(invoice_id = %invoice.id, flow = %invoice.flow_type(), "Created invoice");

    Ok(ApiResult {
        response: InvoiceResponse {
            message: format!(
                "Created invoice '{}' at stage '{}'",
                invoice.invoice_number,
                invoice.current_stage()
            ),
            invoice: InvoiceSummary::of(&invoice),
        },
        audit_events: vec![AuditEvent::created(actor.clone(), cause, &invoice)],
    })
}

/// Imports rows pushed by the vendor reconciliation tool.
///
/// Every row opens in the `MISSING_INVOICE` flow. Rows that fail validation,
/// repeat an invoice number already tracked (or earlier in the batch), or
/// that the store refuses are skipped with a reason; the rest are created.
///
/// # Errors
///
/// Returns `ApiError::StorageFailure` only if the snapshot cannot be
/// refreshed.
pub fn import_reconciliation<S: InvoiceStore>(
    state: &mut AppState<S>,
    rows: Vec<ReconciliationRow>,
    actor: &Actor,
    cause: &Cause,
) -> Result<ApiResult<ImportReconciliationResponse>, ApiError> {
    let mut created: Vec<InvoiceSummary> = Vec::new();
    let mut skipped: Vec<SkippedRow> = Vec::new();
    let mut audit_events: Vec<AuditEvent> = Vec::new();

    state.refresh()?;
    let mut seen: HashSet<String> = state
        .invoices()
        .iter()
        .map(|invoice| normalize_number(&invoice.invoice_number))
        .collect();

    for row in rows {
        let new: NewInvoice = NewInvoice::from_reconciliation(
            &row.invoice_number,
            row.vendor.as_deref(),
            row.entity.as_deref(),
            row.amount,
            row.currency.as_deref(),
            &actor.id,
        );

        let outcome: Result<Invoice, String> = validate_new_invoice(&new)
            .map_err(|e| e.to_string())
            .and_then(|()| {
                if seen.insert(normalize_number(&new.invoice_number)) {
                    Ok(())
                } else {
                    Err(String::from("Invoice number is already tracked"))
                }
            })
            .and_then(|()| state.store_mut().create(new).map_err(|e| e.to_string()));

        match outcome {
            Ok(invoice) => {
                audit_events.push(AuditEvent::created(actor.clone(), cause.clone(), &invoice));
                created.push(InvoiceSummary::of(&invoice));
            }
            Err(reason) => {
                warn!(invoice_number = %row.invoice_number, %reason, "Skipped reconciliation row");
                skipped.push(SkippedRow {
                    invoice_number: row.invoice_number,
                    reason,
                });
            }
        }
    }

    state.refresh()?;
    info!(
        created = created.len(),
        skipped = skipped.len(),
        "Reconciliation import finished"
    );

    Ok(ApiResult {
        response: ImportReconciliationResponse {
            message: format!(
                "Imported {} invoice(s), skipped {}",
                created.len(),
                skipped.len()
            ),
            created,
            skipped,
        },
        audit_events,
    })
}

fn run_command<S: InvoiceStore>(
    state: &mut AppState<S>,
    invoice_id: i64,
    command: Command,
    actor: &Actor,
    cause: Cause,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    let name: &'static str = command.name();
    let executed = execute(
        state.store_mut(),
        InvoiceId::new(invoice_id),
        command,
        actor.clone(),
        cause,
    )
    .map_err(translate_operation_error)?;
    state.refresh()?;

    Ok(ApiResult {
        response: InvoiceResponse {
            message: format!(
                "{name} applied to invoice '{}'",
                executed.invoice.invoice_number
            ),
            invoice: InvoiceSummary::of(&executed.invoice),
        },
        audit_events: vec![executed.audit_event],
    })
}

/// Moves an invoice to the stage with the given label in its flow.
///
/// Any stage of the invoice's own flow is accepted, including skipped or
/// earlier ones. A closed invoice can only leave `Closed` by revert.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be read
/// - The invoice does not exist
/// - The label names no stage of the invoice's flow
/// - The invoice is closed and the stage is open
/// - The store fails
pub fn change_stage<S: InvoiceStore>(
    state: &mut AppState<S>,
    request: &ChangeStageRequest,
    actor: &Actor,
    cause: Cause,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    state.refresh()?;
    let invoice: &Invoice = find_invoice(state, request.invoice_id)?;
    let stage: Stage =
        Stage::from_label(invoice.flow_type(), &request.stage).map_err(translate_domain_error)?;

    run_command(
        state,
        request.invoice_id,
        Command::ApplyStage { stage },
        actor,
        cause,
    )
}

/// Moves an invoice back one stage.
///
/// # Errors
///
/// Returns `ApiError::CannotRevert` at the first stage of the flow,
/// `ApiError::NotFound` for an unknown invoice, or a storage failure.
pub fn revert_stage<S: InvoiceStore>(
    state: &mut AppState<S>,
    invoice_id: i64,
    actor: &Actor,
    cause: Cause,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    run_command(state, invoice_id, Command::Revert, actor, cause)
}

/// Puts an invoice in the payment queue.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown invoice, or a storage failure.
pub fn request_payment<S: InvoiceStore>(
    state: &mut AppState<S>,
    invoice_id: i64,
    actor: &Actor,
    cause: Cause,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    run_command(state, invoice_id, Command::RequestPayment, actor, cause)
}

/// Sets or clears the payment block on an invoice.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown invoice, or a storage failure.
pub fn set_payment_blocked<S: InvoiceStore>(
    state: &mut AppState<S>,
    invoice_id: i64,
    blocked: bool,
    actor: &Actor,
    cause: Cause,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    run_command(
        state,
        invoice_id,
        Command::SetPaymentBlocked { blocked },
        actor,
        cause,
    )
}

/// Confirms a requested payment, attaching the validation record.
///
/// Confirming an invoice twice is refused here; the engine itself does not
/// deduplicate.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be read
/// - The invoice does not exist
/// - The invoice already carries a validation record
/// - The store fails
pub fn validate_payment<S: InvoiceStore>(
    state: &mut AppState<S>,
    request: ValidatePaymentRequest,
    actor: &Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    state.refresh()?;
    let invoice: &Invoice = find_invoice(state, request.invoice_id)?;
    if invoice.payment_validation().is_some() {
        return Err(ApiError::RuleViolation {
            rule: String::from("single_payment_validation"),
            message: format!(
                "Payment for invoice '{}' has already been validated",
                invoice.invoice_number
            ),
        });
    }

    let record: PaymentValidation = PaymentValidation {
        validated_by: actor.id.clone(),
        validated_at: now,
        payment_reference: request.payment_reference,
        notes: request.notes,
    };
    run_command(
        state,
        request.invoice_id,
        Command::ValidatePayment { record },
        actor,
        cause,
    )
}

/// Attaches a note or email to an invoice at its current stage.
///
/// # Errors
///
/// Returns an error if the kind is unknown, the body is empty, the invoice
/// does not exist, or the store fails.
pub fn add_evidence<S: InvoiceStore>(
    state: &mut AppState<S>,
    request: AddEvidenceRequest,
    actor: &Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<InvoiceResponse>, ApiError> {
    let kind: EvidenceKind = request.kind.trim().parse().map_err(translate_domain_error)?;
    let subject: Option<String> = match kind {
        EvidenceKind::Email => request.subject,
        EvidenceKind::Note => None,
    };

    run_command(
        state,
        request.invoice_id,
        Command::AddEvidence {
            kind,
            body: request.body,
            subject,
            author: actor.id.clone(),
            added_at: now,
        },
        actor,
        cause,
    )
}

fn failure_of(invoice_id: InvoiceId, error: &ApiError) -> BulkItemFailure {
    BulkItemFailure {
        invoice_id: invoice_id.value(),
        error: error.to_string(),
        retryable: error.is_retryable(),
    }
}

/// Splits a stage-label bulk request into one command per flow.
///
/// The same label resolves to a different stage in each flow. Ids missing
/// from the snapshot, or whose flow has no stage with the label, are
/// reported as failures.
fn stage_batches<S: InvoiceStore>(
    state: &AppState<S>,
    ids: &[InvoiceId],
    label: &str,
    failed: &mut Vec<BulkItemFailure>,
) -> Vec<(Command, Vec<InvoiceId>)> {
    let mut batches: Vec<(Command, Vec<InvoiceId>)> = Vec::new();

    for flow in FlowType::ALL {
        let members: Vec<InvoiceId> = ids
            .iter()
            .copied()
            .filter(|id| state.invoice(*id).is_some_and(|i| i.flow_type() == flow))
            .collect();
        if members.is_empty() {
            continue;
        }
        match Stage::from_label(flow, label) {
            Ok(stage) => batches.push((Command::ApplyStage { stage }, members)),
            Err(err) => {
                let error: ApiError = translate_domain_error(err);
                failed.extend(members.into_iter().map(|id| failure_of(id, &error)));
            }
        }
    }

    for &id in ids {
        if state.invoice(id).is_none() {
            failed.push(failure_of(id, &invoice_not_found(id)));
        }
    }

    batches
}

/// Applies one action to many invoices.
///
/// Each invoice succeeds or fails on its own; one failure never stops the
/// rest. Repeated ids are processed once.
///
/// # Errors
///
/// Returns `ApiError::StorageFailure` only if the snapshot cannot be
/// refreshed; per-invoice failures are reported in the response.
pub fn bulk_action<S: InvoiceStore>(
    state: &mut AppState<S>,
    request: BulkActionRequest,
    actor: &Actor,
    cause: &Cause,
) -> Result<ApiResult<BulkActionResponse>, ApiError> {
    let mut seen: HashSet<i64> = HashSet::new();
    let ids: Vec<InvoiceId> = request
        .invoice_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .map(InvoiceId::new)
        .collect();
    let requested: usize = ids.len();

    state.refresh()?;
    let mut failed: Vec<BulkItemFailure> = Vec::new();
    let batches: Vec<(Command, Vec<InvoiceId>)> = match request.action {
        BulkAction::ApplyStage { stage } => stage_batches(state, &ids, &stage, &mut failed),
        BulkAction::Revert => vec![(Command::Revert, ids)],
        BulkAction::RequestPayment => vec![(Command::RequestPayment, ids)],
        BulkAction::Block => vec![(Command::SetPaymentBlocked { blocked: true }, ids)],
        BulkAction::Unblock => vec![(Command::SetPaymentBlocked { blocked: false }, ids)],
    };

    let mut succeeded: Vec<i64> = Vec::new();
    let mut audit_events: Vec<AuditEvent> = Vec::new();
    for (command, batch) in batches {
        let report: BulkReport<S::Error> =
            bulk_apply(state.store_mut(), &batch, &command, actor, cause);
        succeeded.extend(report.succeeded.iter().map(InvoiceId::value));
        failed.extend(
            report
                .failed
                .into_iter()
                .map(|f| failure_of(f.id, &translate_operation_error(f.error))),
        );
        audit_events.extend(report.audit_events);
    }

    state.refresh()?;

    Ok(ApiResult {
        response: BulkActionResponse {
            message: format!("{} of {requested} invoice(s) updated", succeeded.len()),
            succeeded,
            failed,
        },
        audit_events,
    })
}
