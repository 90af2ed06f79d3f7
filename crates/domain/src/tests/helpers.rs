// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    FlowType, Invoice, InvoiceId, InvoicePatch, InvoiceSource, NewInvoice, PaymentStatus, Stage,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::datetime;

pub const BASE_TIME: OffsetDateTime = datetime!(2026-01-05 08:00 UTC);

pub fn create_test_new_invoice(number: &str, flow: FlowType) -> NewInvoice {
    NewInvoice {
        invoice_number: number.to_string(),
        vendor: String::from("Acme Supplies"),
        amount: Decimal::new(10_000, 2),
        currency: String::from("EUR"),
        entity: Some(String::from("ES01")),
        detail: None,
        flow_type: flow,
        source: match flow {
            FlowType::MissingInvoice => InvoiceSource::ReconciliationImport,
            FlowType::PoPending => InvoiceSource::Manual,
        },
        created_by: String::from("tester"),
    }
}

pub fn create_test_invoice(id: i64, stage: Stage, status: PaymentStatus) -> Invoice {
    let mut invoice = Invoice::create(
        InvoiceId::new(id),
        create_test_new_invoice(&format!("INV-{id}"), stage.flow_type()),
        BASE_TIME,
    );
    invoice
        .apply_patch(&InvoicePatch {
            stage: Some(stage),
            payment_status: Some(status),
            ..InvoicePatch::default()
        })
        .unwrap();
    invoice
}

/// One invoice for every flow, stage and payment status combination.
pub fn every_invoice_shape() -> Vec<Invoice> {
    let statuses = [
        PaymentStatus::None,
        PaymentStatus::Requested,
        PaymentStatus::Paid,
    ];
    let mut invoices = Vec::new();
    let mut id = 0;
    for flow in FlowType::ALL {
        for stage in flow.stages() {
            for status in statuses {
                id += 1;
                invoices.push(create_test_invoice(id, *stage, status));
            }
        }
    }
    invoices
}
