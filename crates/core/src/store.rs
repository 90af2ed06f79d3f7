// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fincomms_domain::{Invoice, InvoiceId, InvoicePatch, NewInvoice};

/// The persistence collaborator.
///
/// The engine only asks the store to read and to write; no business rule
/// lives behind this trait. Implementations own identity assignment,
/// invoice-number uniqueness, timestamps and their own retry policy.
pub trait InvoiceStore {
    /// Opaque failure reported by the store.
    type Error: std::error::Error + Clone;

    /// Fetches every invoice.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the read fails.
    fn fetch_all(&self) -> Result<Vec<Invoice>, Self::Error>;

    /// Fetches one invoice, `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the read fails.
    fn fetch(&self, id: InvoiceId) -> Result<Option<Invoice>, Self::Error>;

    /// Creates an invoice at the first stage of its flow.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write is refused or fails.
    fn create(&mut self, new: NewInvoice) -> Result<Invoice, Self::Error>;

    /// Applies a partial update to one invoice and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write is refused or fails.
    fn update(&mut self, id: InvoiceId, patch: &InvoicePatch) -> Result<Invoice, Self::Error>;

    /// Applies one shared partial update to every listed invoice as a single
    /// request, returning the number of invoices written.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the request is refused or fails.
    fn bulk_update(&mut self, ids: &[InvoiceId], patch: &InvoicePatch)
    -> Result<usize, Self::Error>;
}
