// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::InvoiceStore;
use fincomms_audit::{Actor, Cause};
use fincomms_domain::{
    FlowType, Invoice, InvoiceId, InvoicePatch, InvoiceSource, NewInvoice, PaymentStatus, Stage,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use time::OffsetDateTime;
use time::macros::datetime;

pub const BASE_TIME: OffsetDateTime = datetime!(2026-01-05 08:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("analyst-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Queue action"))
}

pub fn create_test_new_invoice(number: &str, flow: FlowType) -> NewInvoice {
    NewInvoice {
        invoice_number: number.to_string(),
        vendor: String::from("Acme Supplies"),
        amount: Decimal::new(10_000, 2),
        currency: String::from("EUR"),
        entity: None,
        detail: None,
        flow_type: flow,
        source: InvoiceSource::Manual,
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

/// Error raised by [`MockStore`] when a failure is injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStoreError(pub String);

impl std::fmt::Display for MockStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockStoreError {}

/// Minimal store with failure injection and call counting.
#[derive(Debug, Default)]
pub struct MockStore {
    pub invoices: BTreeMap<InvoiceId, Invoice>,
    pub fail_updates_for: HashSet<InvoiceId>,
    pub fail_bulk: bool,
    pub update_calls: usize,
    pub bulk_calls: usize,
}

impl MockStore {
    pub fn with(invoices: Vec<Invoice>) -> Self {
        Self {
            invoices: invoices.into_iter().map(|i| (i.id, i)).collect(),
            ..Self::default()
        }
    }

    pub fn get(&self, id: i64) -> &Invoice {
        &self.invoices[&InvoiceId::new(id)]
    }
}

impl InvoiceStore for MockStore {
    type Error = MockStoreError;

    fn fetch_all(&self) -> Result<Vec<Invoice>, Self::Error> {
        Ok(self.invoices.values().cloned().collect())
    }

    fn fetch(&self, id: InvoiceId) -> Result<Option<Invoice>, Self::Error> {
        Ok(self.invoices.get(&id).cloned())
    }

    fn create(&mut self, new: NewInvoice) -> Result<Invoice, Self::Error> {
        let next = self.invoices.keys().next_back().map_or(1, |id| id.value() + 1);
        let invoice = Invoice::create(InvoiceId::new(next), new, BASE_TIME);
        self.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    fn update(&mut self, id: InvoiceId, patch: &InvoicePatch) -> Result<Invoice, Self::Error> {
        self.update_calls += 1;
        if self.fail_updates_for.contains(&id) {
            return Err(MockStoreError(format!("write refused for {id}")));
        }
        let invoice = self
            .invoices
            .get_mut(&id)
            .ok_or_else(|| MockStoreError(format!("missing {id}")))?;
        invoice
            .apply_patch(patch)
            .map_err(|e| MockStoreError(e.to_string()))?;
        Ok(invoice.clone())
    }

    fn bulk_update(
        &mut self,
        ids: &[InvoiceId],
        patch: &InvoicePatch,
    ) -> Result<usize, Self::Error> {
        self.bulk_calls += 1;
        if self.fail_bulk {
            return Err(MockStoreError(String::from("connection reset")));
        }
        for id in ids {
            let invoice = self
                .invoices
                .get_mut(id)
                .ok_or_else(|| MockStoreError(format!("missing {id}")))?;
            invoice
                .apply_patch(patch)
                .map_err(|e| MockStoreError(e.to_string()))?;
        }
        Ok(ids.len())
    }
}
