// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON snapshot files.
//!
//! A snapshot holds the id counter, every invoice and the audit log. Loading
//! re-checks what the store would otherwise guarantee on write.

use crate::error::PersistenceError;
use crate::{Clock, InMemoryStore, normalize_number};
use fincomms_audit::AuditEvent;
use fincomms_domain::{Invoice, InvoiceId, validate_invoice_record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use time::OffsetDateTime;
use tracing::info;

/// On-disk form of an [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub next_id: i64,
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub audit_log: Vec<AuditEvent>,
}

impl InMemoryStore {
    /// Captures the current state as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            next_id: self.next_id,
            invoices: self.invoices.values().cloned().collect(),
            audit_log: self.audit_log.clone(),
        }
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptSnapshot` if two invoices share an id
    /// or an invoice number, if an id is not below the stored counter, or if
    /// an invoice carries a payment validation record while not paid.
    pub fn from_snapshot(snapshot: StoreSnapshot, clock: Clock) -> Result<Self, PersistenceError> {
        let mut invoices: BTreeMap<InvoiceId, Invoice> = BTreeMap::new();
        let mut numbers: HashSet<String> = HashSet::new();

        for invoice in snapshot.invoices {
            validate_invoice_record(&invoice)?;
            if invoice.id.value() >= snapshot.next_id {
                return Err(PersistenceError::CorruptSnapshot(format!(
                    "Invoice id {} is not below the id counter {}",
                    invoice.id, snapshot.next_id
                )));
            }
            if !numbers.insert(normalize_number(&invoice.invoice_number)) {
                return Err(PersistenceError::CorruptSnapshot(format!(
                    "Invoice number '{}' appears more than once",
                    invoice.invoice_number
                )));
            }
            if let Some(previous) = invoices.insert(invoice.id, invoice) {
                return Err(PersistenceError::CorruptSnapshot(format!(
                    "Invoice id {} appears more than once",
                    previous.id
                )));
            }
        }

        Ok(Self {
            invoices,
            audit_log: snapshot.audit_log,
            next_id: snapshot.next_id.max(1),
            clock,
        })
    }

    /// Loads a store from a JSON snapshot file.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails the checks of [`InMemoryStore::from_snapshot`].
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        if !path.exists() {
            info!(path = %path.display(), "No snapshot file, starting empty");
            return Ok(Self::new());
        }

        let contents: String = std::fs::read_to_string(path)?;
        let snapshot: StoreSnapshot = serde_json::from_str(&contents)?;
        let store: Self = Self::from_snapshot(snapshot, OffsetDateTime::now_utc)?;
        info!(
            path = %path.display(),
            invoices = store.len(),
            "Loaded snapshot"
        );
        Ok(store)
    }

    /// Writes the store to a JSON snapshot file.
    ///
    /// The snapshot is written to a sibling temporary file first and then
    /// renamed over the target.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let contents: String = serde_json::to_string_pretty(&self.snapshot())?;
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, contents)?;
        std::fs::rename(&staging, path)?;
        info!(path = %path.display(), invoices = self.len(), "Saved snapshot");
        Ok(())
    }
}
