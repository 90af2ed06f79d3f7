// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference persistence collaborator for FinComms.
//!
//! [`InMemoryStore`] implements the engine's [`InvoiceStore`] contract and
//! keeps an audit timeline per invoice. State can be loaded from and saved
//! to a JSON snapshot file.
//!
//! The store owns:
//! - Identity assignment (monotonic ids, never reused)
//! - Invoice-number uniqueness
//! - `updated_at` stamping on every write
//!
//! It holds no workflow rule; every stage or payment change it receives has
//! already been validated by the engine.

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

mod error;
mod snapshot;

#[cfg(test)]
mod tests;

use fincomms::InvoiceStore;
use fincomms_audit::AuditEvent;
use fincomms_domain::{Invoice, InvoiceId, InvoicePatch, NewInvoice};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tracing::{debug, info};

pub use error::PersistenceError;
pub use snapshot::StoreSnapshot;

/// Source of write timestamps.
pub type Clock = fn() -> OffsetDateTime;

/// In-memory invoice store.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    invoices: BTreeMap<InvoiceId, Invoice>,
    audit_log: Vec<AuditEvent>,
    next_id: i64,
    clock: Clock,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_number(number: &str) -> String {
    number.trim().to_uppercase()
}

impl InMemoryStore {
    /// Creates an empty store stamped with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(OffsetDateTime::now_utc)
    }

    /// Creates an empty store stamped with the given clock.
    #[must_use]
    pub const fn with_clock(clock: Clock) -> Self {
        Self {
            invoices: BTreeMap::new(),
            audit_log: Vec::new(),
            next_id: 1,
            clock,
        }
    }

    /// Number of stored invoices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Appends an audit event to the log.
    pub fn record_audit_event(&mut self, event: AuditEvent) {
        debug!(
            invoice_id = %event.invoice_id,
            action = %event.action.name,
            "Recorded audit event"
        );
        self.audit_log.push(event);
    }

    /// Returns the audit events of one invoice, oldest first.
    #[must_use]
    pub fn audit_timeline(&self, id: InvoiceId) -> Vec<&AuditEvent> {
        self.audit_log
            .iter()
            .filter(|event| event.invoice_id == id)
            .collect()
    }

    /// Returns every audit event, oldest first.
    #[must_use]
    pub fn audit_log(&self) -> &[AuditEvent] {
        &self.audit_log
    }

    fn number_taken(&self, number: &str) -> bool {
        let wanted: String = normalize_number(number);
        self.invoices
            .values()
            .any(|invoice| normalize_number(&invoice.invoice_number) == wanted)
    }

    fn patched(
        &self,
        id: InvoiceId,
        patch: &InvoicePatch,
        now: OffsetDateTime,
    ) -> Result<Invoice, PersistenceError> {
        let mut invoice: Invoice = self
            .invoices
            .get(&id)
            .cloned()
            .ok_or(PersistenceError::NotFound(id))?;
        invoice
            .apply_patch(patch)
            .map_err(|err| PersistenceError::RejectedWrite {
                invoice_id: id,
                reason: err.to_string(),
            })?;
        invoice.updated_at = now;
        Ok(invoice)
    }
}

impl InvoiceStore for InMemoryStore {
    type Error = PersistenceError;

    fn fetch_all(&self) -> Result<Vec<Invoice>, Self::Error> {
        debug!(count = self.invoices.len(), "Fetching all invoices");
        Ok(self.invoices.values().cloned().collect())
    }

    fn fetch(&self, id: InvoiceId) -> Result<Option<Invoice>, Self::Error> {
        Ok(self.invoices.get(&id).cloned())
    }

    fn create(&mut self, new: NewInvoice) -> Result<Invoice, Self::Error> {
        if self.number_taken(&new.invoice_number) {
            return Err(PersistenceError::DuplicateInvoiceNumber(new.invoice_number));
        }

        let id: InvoiceId = InvoiceId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(PersistenceError::IdsExhausted)?;

        let invoice: Invoice = Invoice::create(id, new, (self.clock)());
        info!(
            invoice_id = %id,
            invoice_number = %invoice.invoice_number,
            flow = %invoice.flow_type(),
            "Created invoice"
        );
        self.invoices.insert(id, invoice.clone());
        Ok(invoice)
    }

    fn update(&mut self, id: InvoiceId, patch: &InvoicePatch) -> Result<Invoice, Self::Error> {
        let invoice: Invoice = self.patched(id, patch, (self.clock)())?;
        debug!(invoice_id = %id, stage = %invoice.current_stage(), "Updated invoice");
        self.invoices.insert(id, invoice.clone());
        Ok(invoice)
    }

    /// All ids are checked before any is written; one bad id rejects the
    /// whole request.
    fn bulk_update(
        &mut self,
        ids: &[InvoiceId],
        patch: &InvoicePatch,
    ) -> Result<usize, Self::Error> {
        let now: OffsetDateTime = (self.clock)();
        let updated: Vec<Invoice> = ids
            .iter()
            .map(|id| self.patched(*id, patch, now))
            .collect::<Result<_, _>>()?;

        let written: usize = updated.len();
        for invoice in updated {
            self.invoices.insert(invoice.id, invoice);
        }
        info!(written, "Bulk updated invoices");
        Ok(written)
    }
}
