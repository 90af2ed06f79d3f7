// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    NOW, create_test_actor, create_test_cause, create_test_state, fixed_clock, manual_request,
    reconciliation_row, seed_both_flows,
};
use crate::{
    AddEvidenceRequest, ApiError, ChangeStageRequest, ReconciliationRow, ValidatePaymentRequest,
    add_evidence, change_stage, create_invoice, import_reconciliation, invoice_detail,
    request_payment, revert_stage, set_payment_blocked, validate_payment,
};
use fincomms::InvoiceStore;
use fincomms_domain::{InvoiceId, InvoicePatch, NewInvoice, PaymentStatus, PaymentValidation};
use fincomms_persistence::InMemoryStore;
use rust_decimal::Decimal;

#[test]
fn test_create_invoice_defaults_to_po_pending() {
    let mut state = create_test_state();

    let result = create_invoice(
        &mut state,
        manual_request("PO-1", 5_000),
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let response = result.response;

    assert_eq!(result.audit_events.len(), 1);
    assert_eq!(result.audit_events[0].action.name, "Create");
    assert_eq!(result.audit_events[0].after.stage, "Invoice Received");
    assert_eq!(response.invoice.flow_type, "PO_PENDING");
    assert_eq!(response.invoice.stage, "Invoice Received");
    assert_eq!(response.invoice.currency, "EUR");
    assert_eq!(response.invoice.queue, "AP_PROCESSING");
    assert_eq!(state.invoices().len(), 1);
}

#[test]
fn test_create_invoice_with_explicit_flow() {
    let mut state = create_test_state();
    let mut request = manual_request("MI-1", 5_000);
    request.flow_type = Some(String::from("missing_invoice"));

    let response = create_invoice(&mut state, request, &create_test_actor(), create_test_cause())
        .unwrap()
        .response;

    assert_eq!(response.invoice.stage, "Invoice Missing");
    assert_eq!(response.invoice.queue, "RECONCILIATION");
}

#[test]
fn test_create_invoice_rejects_duplicate_number() {
    let mut state = create_test_state();
    create_invoice(
        &mut state,
        manual_request("PO-1", 5_000),
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let result = create_invoice(
        &mut state,
        manual_request("po-1 ", 7_000),
        &create_test_actor(),
        create_test_cause(),
    );

    let err = result.unwrap_err();
    assert!(matches!(&err, ApiError::RuleViolation { rule, .. } if rule == "unique_invoice_number"));
    assert!(!err.is_retryable());
}

#[test]
fn test_create_invoice_rejects_bad_currency() {
    let mut state = create_test_state();
    let mut request = manual_request("PO-1", 5_000);
    request.currency = Some(String::from("EURO"));

    let result = create_invoice(&mut state, request, &create_test_actor(), create_test_cause());

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "currency"));
    assert!(state.invoices().is_empty());
}

#[test]
fn test_create_invoice_rejects_unknown_flow() {
    let mut state = create_test_state();
    let mut request = manual_request("PO-1", 5_000);
    request.flow_type = Some(String::from("EXPENSE"));

    let result = create_invoice(&mut state, request, &create_test_actor(), create_test_cause());

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "flow_type"));
}

#[test]
fn test_import_reconciliation_skips_duplicates_and_invalid_rows() {
    let mut state = create_test_state();
    create_invoice(
        &mut state,
        manual_request("DUP-1", 5_000),
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let result = import_reconciliation(
        &mut state,
        vec![
            reconciliation_row("REC-1", "Globex", 1_000),
            reconciliation_row("DUP-1", "Globex", 1_000),
            reconciliation_row("REC-2", "Initech", 2_000),
            reconciliation_row("rec-2", "Initech", 2_000),
            reconciliation_row("REC-3", "Hooli", -3_000),
        ],
        &create_test_actor(),
        &create_test_cause(),
    )
    .unwrap();
    assert_eq!(result.audit_events.len(), 2);
    assert!(result.audit_events.iter().all(|e| e.action.name == "Create"));
    let response = result.response;

    let created: Vec<&str> = response
        .created
        .iter()
        .map(|s| s.invoice_number.as_str())
        .collect();
    let skipped: Vec<&str> = response
        .skipped
        .iter()
        .map(|s| s.invoice_number.as_str())
        .collect();

    assert_eq!(created, vec!["REC-1", "REC-2"]);
    assert_eq!(skipped, vec!["DUP-1", "rec-2", "REC-3"]);
    assert!(response.created.iter().all(|s| s.flow_type == "MISSING_INVOICE"));
    assert!(response.created.iter().all(|s| s.queue == "RECONCILIATION"));
    assert_eq!(state.invoices().len(), 3);
}

#[test]
fn test_import_reconciliation_rows_without_vendor() {
    let mut state = create_test_state();
    let rows: Vec<ReconciliationRow> = serde_json::from_str(
        r#"[
            {"invoice_number": "REC-7", "amount": "120.00"},
            {"invoice_number": "REC-8", "vendor": " ", "amount": "80.00", "currency": "usd"}
        ]"#,
    )
    .unwrap();
    assert_eq!(rows[0].vendor, None);

    let response = import_reconciliation(
        &mut state,
        rows,
        &create_test_actor(),
        &create_test_cause(),
    )
    .unwrap();

    assert!(response.response.skipped.is_empty());
    let vendors: Vec<&str> = response
        .response
        .created
        .iter()
        .map(|s| s.vendor.as_str())
        .collect();
    assert_eq!(vendors, vec!["Unknown Vendor", "Unknown Vendor"]);
    assert_eq!(response.response.created[1].currency, "USD");
}

#[test]
fn test_change_stage_resolves_label_in_invoice_flow() {
    let mut state = create_test_state();
    let (po_id, mi_id) = seed_both_flows(&mut state);

    let po = change_stage(
        &mut state,
        &ChangeStageRequest {
            invoice_id: po_id,
            stage: String::from("po created"),
        },
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let mi = change_stage(
        &mut state,
        &ChangeStageRequest {
            invoice_id: mi_id,
            stage: String::from("PO Created"),
        },
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(po.response.invoice.stage, "PO Created");
    assert_eq!(mi.response.invoice.stage, "PO Created");
    assert_eq!(mi.response.invoice.queue, "AP_PROCESSING");
    assert_eq!(po.audit_events.len(), 1);
    assert_eq!(po.audit_events[0].before.stage, "Invoice Received");
}

#[test]
fn test_change_stage_rejects_label_from_other_flow() {
    let mut state = create_test_state();
    let (_, mi_id) = seed_both_flows(&mut state);

    let result = change_stage(
        &mut state,
        &ChangeStageRequest {
            invoice_id: mi_id,
            stage: String::from("EXR Created"),
        },
        &create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::RuleViolation { rule, .. }) if rule == "stage_in_flow"));
    let detail = invoice_detail(&state, mi_id).unwrap();
    assert_eq!(detail.summary.stage, "Invoice Missing");
}

#[test]
fn test_change_stage_rejects_legacy_sent_to_vendor_label() {
    let mut state = create_test_state();
    let (_, mi_id) = seed_both_flows(&mut state);

    let result = change_stage(
        &mut state,
        &ChangeStageRequest {
            invoice_id: mi_id,
            stage: String::from("Sent to Vendor"),
        },
        &create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::RuleViolation { .. })));
}

#[test]
fn test_closed_invoice_only_leaves_closed_by_revert() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);
    let to = |stage: &str| ChangeStageRequest {
        invoice_id: po_id,
        stage: stage.to_string(),
    };
    change_stage(&mut state, &to("Closed"), &create_test_actor(), create_test_cause()).unwrap();

    let reopened = change_stage(
        &mut state,
        &to("PO Email Sent"),
        &create_test_actor(),
        create_test_cause(),
    );
    let reverted = revert_stage(&mut state, po_id, &create_test_actor(), create_test_cause())
        .unwrap();

    assert!(matches!(reopened, Err(ApiError::RuleViolation { rule, .. }) if rule == "closed_invoice"));
    assert_eq!(reverted.response.invoice.stage, "EXR Created");
}

#[test]
fn test_revert_at_initial_stage_cannot_revert() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);

    let err = revert_stage(&mut state, po_id, &create_test_actor(), create_test_cause())
        .unwrap_err();

    assert!(matches!(err, ApiError::CannotRevert { .. }));
    assert!(!err.is_retryable());
    assert!(err.to_string().starts_with("Cannot revert further"));
}

#[test]
fn test_operations_on_unknown_invoice_are_not_found() {
    let mut state = create_test_state();

    let reverted = revert_stage(&mut state, 404, &create_test_actor(), create_test_cause());
    let changed = change_stage(
        &mut state,
        &ChangeStageRequest {
            invoice_id: 404,
            stage: String::from("Closed"),
        },
        &create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(reverted, Err(ApiError::NotFound { .. })));
    assert!(matches!(changed, Err(ApiError::NotFound { .. })));
    assert!(invoice_detail(&state, 404).is_err());
}

#[test]
fn test_payment_request_then_validation() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);

    let requested = request_payment(&mut state, po_id, &create_test_actor(), create_test_cause())
        .unwrap();
    assert_eq!(requested.response.invoice.queue, "PAYMENT_QUEUE");
    assert_eq!(requested.response.invoice.stage, "Invoice Received");

    let validated = validate_payment(
        &mut state,
        ValidatePaymentRequest {
            invoice_id: po_id,
            payment_reference: Some(String::from("PAY-889")),
            notes: None,
        },
        &create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(validated.response.invoice.payment_status, "PAID");
    assert_eq!(validated.response.invoice.queue, "AP_PROCESSING");
    let detail = invoice_detail(&state, po_id).unwrap();
    let record = detail.payment_validation.unwrap();
    assert_eq!(record.validated_by, "analyst-1");
    assert_eq!(record.validated_at, NOW);
}

#[test]
fn test_payment_request_after_validation_is_refused() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);
    request_payment(&mut state, po_id, &create_test_actor(), create_test_cause()).unwrap();
    validate_payment(
        &mut state,
        ValidatePaymentRequest {
            invoice_id: po_id,
            payment_reference: Some(String::from("PAY-889")),
            notes: None,
        },
        &create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let result = request_payment(&mut state, po_id, &create_test_actor(), create_test_cause());

    assert!(matches!(
        result,
        Err(ApiError::RuleViolation { rule, .. }) if rule == "already_paid"
    ));
    assert_eq!(
        invoice_detail(&state, po_id).unwrap().summary.payment_status,
        "PAID"
    );
    assert!(InMemoryStore::from_snapshot(state.store().snapshot(), fixed_clock).is_ok());
}

#[test]
fn test_second_payment_validation_is_refused() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);
    let request = || ValidatePaymentRequest {
        invoice_id: po_id,
        payment_reference: None,
        notes: None,
    };
    validate_payment(
        &mut state,
        request(),
        &create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let result = validate_payment(
        &mut state,
        request(),
        &create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result,
        Err(ApiError::RuleViolation { rule, .. }) if rule == "single_payment_validation"
    ));
}

#[test]
fn test_payment_block_toggles() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);

    let blocked = set_payment_blocked(
        &mut state,
        po_id,
        true,
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert!(blocked.response.invoice.payment_blocked);
    assert_eq!(blocked.audit_events[0].action.name, "SetPaymentBlocked");
}

#[test]
fn test_add_evidence_tags_current_stage() {
    let mut state = create_test_state();
    let (_, mi_id) = seed_both_flows(&mut state);

    add_evidence(
        &mut state,
        AddEvidenceRequest {
            invoice_id: mi_id,
            kind: String::from("email"),
            body: String::from("Vendor confirmed the invoice was never sent"),
            subject: Some(String::from("RE: statement 2026-01")),
        },
        &create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();
    add_evidence(
        &mut state,
        AddEvidenceRequest {
            invoice_id: mi_id,
            kind: String::from("NOTE"),
            body: String::from("Chased by phone"),
            subject: Some(String::from("ignored")),
        },
        &create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let detail = invoice_detail(&state, mi_id).unwrap();
    assert_eq!(detail.evidence.len(), 2);
    assert_eq!(detail.evidence[0].stage.label(), "Invoice Missing");
    assert_eq!(
        detail.evidence[0].subject.as_deref(),
        Some("RE: statement 2026-01")
    );
    assert_eq!(detail.evidence[1].subject, None);
}

#[test]
fn test_add_evidence_rejects_empty_body_and_unknown_kind() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);
    let request = |kind: &str, body: &str| AddEvidenceRequest {
        invoice_id: po_id,
        kind: kind.to_string(),
        body: body.to_string(),
        subject: None,
    };

    let empty = add_evidence(
        &mut state,
        request("NOTE", "   "),
        &create_test_actor(),
        create_test_cause(),
        NOW,
    );
    let unknown = add_evidence(
        &mut state,
        request("FAX", "page 1"),
        &create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(empty, Err(ApiError::InvalidInput { field, .. }) if field == "body"));
    assert!(matches!(unknown, Err(ApiError::InvalidInput { field, .. }) if field == "kind"));
}

#[test]
fn test_invoice_detail_lists_remaining_stages() {
    let mut state = create_test_state();
    let (_, mi_id) = seed_both_flows(&mut state);

    let detail = invoice_detail(&state, mi_id).unwrap();

    assert_eq!(
        detail.remaining_stages,
        vec!["Sent to AP Processing", "PO Created", "Posted", "Closed"]
    );
    assert_eq!(detail.created_by, "analyst-1");
}

#[test]
fn test_change_stage_sees_invoice_created_behind_snapshot() {
    let mut state = create_test_state();
    let created = state
        .store_mut()
        .create(NewInvoice::from_reconciliation(
            "REC-9",
            Some("Globex"),
            None,
            Decimal::new(500, 2),
            None,
            "recon.bot",
        ))
        .unwrap();

    let result = change_stage(
        &mut state,
        &ChangeStageRequest {
            invoice_id: created.id.value(),
            stage: String::from("Sent to AP Processing"),
        },
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.response.invoice.stage, "Sent to AP Processing");
    assert_eq!(result.response.invoice.queue, "AP_PROCESSING");
}

#[test]
fn test_validation_recorded_behind_snapshot_is_refused() {
    let mut state = create_test_state();
    let (po_id, _) = seed_both_flows(&mut state);
    state
        .store_mut()
        .update(
            InvoiceId::new(po_id),
            &InvoicePatch {
                payment_status: Some(PaymentStatus::Paid),
                payment_validation: Some(PaymentValidation {
                    validated_by: String::from("treasury"),
                    validated_at: NOW,
                    payment_reference: Some(String::from("PAY-1")),
                    notes: None,
                }),
                ..InvoicePatch::default()
            },
        )
        .unwrap();

    let result = validate_payment(
        &mut state,
        ValidatePaymentRequest {
            invoice_id: po_id,
            payment_reference: Some(String::from("PAY-2")),
            notes: None,
        },
        &create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result,
        Err(ApiError::RuleViolation { rule, .. }) if rule == "single_payment_validation"
    ));
    let record = invoice_detail(&state, po_id).unwrap().payment_validation.unwrap();
    assert_eq!(record.payment_reference.as_deref(), Some("PAY-1"));
}
