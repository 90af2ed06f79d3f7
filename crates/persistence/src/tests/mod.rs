// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use fincomms_audit::{Actor, Cause};
use fincomms_domain::{FlowType, InvoiceSource, NewInvoice};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::InMemoryStore;

pub fn fixed_clock() -> OffsetDateTime {
    datetime!(2026-01-05 08:00 UTC)
}

pub fn create_test_store() -> InMemoryStore {
    InMemoryStore::with_clock(fixed_clock)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_new_invoice(number: &str, flow_type: FlowType) -> NewInvoice {
    NewInvoice {
        invoice_number: number.to_string(),
        vendor: String::from("Acme Supplies"),
        amount: Decimal::new(25_000, 2),
        currency: String::from("EUR"),
        entity: Some(String::from("ES01")),
        detail: None,
        flow_type,
        source: InvoiceSource::Manual,
        created_by: String::from("ap.user"),
    }
}
