// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fincomms_audit::{Actor, Cause};
use fincomms_persistence::InMemoryStore;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{AppState, CreateInvoiceRequest, ReconciliationRow};

pub const NOW: OffsetDateTime = datetime!(2026-01-12 14:00 UTC);

pub fn fixed_clock() -> OffsetDateTime {
    datetime!(2026-01-05 08:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("analyst-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_test_state() -> AppState<InMemoryStore> {
    AppState::new(InMemoryStore::with_clock(fixed_clock)).unwrap()
}

pub fn manual_request(number: &str, amount: i64) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        invoice_number: number.to_string(),
        vendor: String::from("Acme Supplies"),
        amount: Decimal::new(amount, 2),
        currency: None,
        entity: Some(String::from("ES01")),
        detail: None,
        flow_type: None,
    }
}

pub fn reconciliation_row(number: &str, vendor: &str, amount: i64) -> ReconciliationRow {
    ReconciliationRow {
        invoice_number: number.to_string(),
        vendor: Some(vendor.to_string()),
        entity: None,
        amount: Decimal::new(amount, 2),
        currency: None,
    }
}

/// Creates one manual `PO_PENDING` invoice and one imported
/// `MISSING_INVOICE` invoice, returning their ids in that order.
pub fn seed_both_flows(state: &mut AppState<InMemoryStore>) -> (i64, i64) {
    let manual = crate::create_invoice(
        state,
        manual_request("PO-1", 10_000),
        &create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let imported = crate::import_reconciliation(
        state,
        vec![reconciliation_row("REC-1", "Globex", 20_000)],
        &create_test_actor(),
        &create_test_cause(),
    )
    .unwrap();
    (
        manual.response.invoice.invoice_id,
        imported.response.created[0].invoice_id,
    )
}
