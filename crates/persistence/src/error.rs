// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fincomms_domain::{DomainError, InvoiceId};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The requested invoice was not found.
    NotFound(InvoiceId),
    /// Another invoice already uses this invoice number.
    DuplicateInvoiceNumber(String),
    /// The stored invoice refused the update.
    RejectedWrite {
        invoice_id: InvoiceId,
        reason: String,
    },
    /// The id counter cannot advance any further.
    IdsExhausted,
    /// Reading or writing the snapshot file failed.
    Io(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// The snapshot file holds inconsistent data.
    CorruptSnapshot(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Invoice not found: {id}"),
            Self::DuplicateInvoiceNumber(number) => {
                write!(f, "Invoice number '{number}' already exists")
            }
            Self::RejectedWrite { invoice_id, reason } => {
                write!(f, "Write to invoice {invoice_id} rejected: {reason}")
            }
            Self::IdsExhausted => write!(f, "No invoice ids left to assign"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::CorruptSnapshot(msg) => write!(f, "Corrupt snapshot: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::CorruptSnapshot(err.to_string())
    }
}
