// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{ApiError, storage_failure};
use fincomms::InvoiceStore;
use fincomms_domain::{Invoice, InvoiceId};
use tracing::debug;

/// Application state shared by every API operation.
///
/// Holds the store and the invoice collection last fetched from it. Reads
/// are served from that snapshot; every write is followed by a refresh so
/// the snapshot always reflects what the store reports, never a local guess.
#[derive(Debug)]
pub struct AppState<S: InvoiceStore> {
    store: S,
    invoices: Vec<Invoice>,
}

impl<S: InvoiceStore> AppState<S> {
    /// Wraps a store and fetches the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::StorageFailure` if the store cannot be read.
    pub fn new(store: S) -> Result<Self, ApiError> {
        let mut state: Self = Self {
            store,
            invoices: Vec::new(),
        };
        state.refresh()?;
        Ok(state)
    }

    /// Re-fetches the invoice collection from the store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::StorageFailure` if the store cannot be read. The
    /// previous snapshot is kept in that case.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        self.invoices = self.store.fetch_all().map_err(|e| storage_failure(&e))?;
        debug!(count = self.invoices.len(), "Refreshed invoice snapshot");
        Ok(())
    }

    /// The invoice collection as of the last refresh.
    #[must_use]
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Looks up one invoice in the snapshot.
    #[must_use]
    pub fn invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| invoice.id == id)
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Releases the store, dropping the snapshot.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}
