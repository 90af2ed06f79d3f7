// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Single and bulk dispatch of commands through an [`InvoiceStore`].
//!
//! Bulk operations are a sequence of independent writes. A failure on one
//! id is recorded and processing moves on; nothing is rolled back.

use crate::apply::apply;
use crate::command::Command;
use crate::error::CoreError;
use crate::store::InvoiceStore;
use fincomms_audit::{Actor, AuditEvent, Cause};
use fincomms_domain::{Invoice, InvoiceId};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Why an operation on one invoice did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError<E> {
    /// No invoice has this id.
    NotFound(InvoiceId),
    /// The engine refused the command.
    Rejected(CoreError),
    /// The store failed; passed through unchanged.
    Collaborator(E),
}

impl<E: std::fmt::Display> std::fmt::Display for OperationError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Invoice {id} not found"),
            Self::Rejected(err) => write!(f, "{err}"),
            Self::Collaborator(err) => write!(f, "Store error: {err}"),
        }
    }
}

impl<E: std::error::Error> std::error::Error for OperationError<E> {}

impl<E> From<CoreError> for OperationError<E> {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}

/// A command that was applied and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
    /// The invoice as returned by the store after the write.
    pub invoice: Invoice,
    pub audit_event: AuditEvent,
}

/// One id that failed in a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure<E> {
    pub id: InvoiceId,
    pub error: OperationError<E>,
}

/// Outcome of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport<E> {
    /// Ids written, in request order.
    pub succeeded: Vec<InvoiceId>,
    /// Ids that failed, in the order the failures were detected.
    pub failed: Vec<BulkFailure<E>>,
    /// One audit event per succeeded id.
    pub audit_events: Vec<AuditEvent>,
}

impl<E> BulkReport<E> {
    const fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            audit_events: Vec::new(),
        }
    }

    /// Returns true if some, but not all, ids failed.
    #[must_use]
    pub fn is_partial_failure(&self) -> bool {
        !self.failed.is_empty() && !self.succeeded.is_empty()
    }

    /// Returns true if no id failed.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total ids processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    fn fail(&mut self, id: InvoiceId, error: OperationError<E>)
    where
        E: std::fmt::Display,
    {
        warn!(invoice_id = %id, %error, "Bulk item failed");
        self.failed.push(BulkFailure { id, error });
    }
}

fn fetch_existing<S: InvoiceStore>(
    store: &S,
    id: InvoiceId,
) -> Result<Invoice, OperationError<S::Error>> {
    store
        .fetch(id)
        .map_err(OperationError::Collaborator)?
        .ok_or(OperationError::NotFound(id))
}

/// Fetches one invoice, applies a command, and writes the result.
///
/// The returned invoice is the store's copy, which is authoritative.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id, `Rejected` if the engine refuses
/// the command (nothing is written), and `Collaborator` if the store fails.
pub fn execute<S: InvoiceStore>(
    store: &mut S,
    id: InvoiceId,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<Executed, OperationError<S::Error>> {
    let invoice: Invoice = fetch_existing(store, id)?;
    let result = apply(&invoice, command, actor, cause)?;

    let stored: Invoice = store
        .update(id, &result.patch)
        .map_err(OperationError::Collaborator)?;

    info!(
        invoice_id = %id,
        action = %result.audit_event.action.name,
        stage = %stored.current_stage(),
        "Invoice updated"
    );

    Ok(Executed {
        invoice: stored,
        audit_event: result.audit_event,
    })
}

/// Applies one command to many invoices, isolating each id.
///
/// Every id is fetched and validated on its own. Commands with a shared
/// payload (see [`Command::shared_patch`]) are then written in a single
/// bulk update over the ids that passed validation; if that request fails,
/// all of those ids are reported with the store's error. Other commands
/// are written one id at a time. Repeated ids are processed once.
#[must_use]
pub fn bulk_apply<S: InvoiceStore>(
    store: &mut S,
    ids: &[InvoiceId],
    command: &Command,
    actor: &Actor,
    cause: &Cause,
) -> BulkReport<S::Error> {
    let mut report: BulkReport<S::Error> = BulkReport::new();
    let shared = command.shared_patch();
    let mut pending: Vec<(InvoiceId, AuditEvent)> = Vec::new();
    let mut seen: HashSet<InvoiceId> = HashSet::new();

    for &id in ids {
        if !seen.insert(id) {
            debug!(invoice_id = %id, "Skipping repeated id in bulk request");
            continue;
        }

        let invoice: Invoice = match fetch_existing(store, id) {
            Ok(invoice) => invoice,
            Err(error) => {
                report.fail(id, error);
                continue;
            }
        };

        let result = match apply(&invoice, command.clone(), actor.clone(), cause.clone()) {
            Ok(result) => result,
            Err(err) => {
                report.fail(id, OperationError::Rejected(err));
                continue;
            }
        };

        if shared.is_some() {
            pending.push((id, result.audit_event));
            continue;
        }

        match store.update(id, &result.patch) {
            Ok(_) => {
                debug!(invoice_id = %id, "Bulk item written");
                report.succeeded.push(id);
                report.audit_events.push(result.audit_event);
            }
            Err(err) => report.fail(id, OperationError::Collaborator(err)),
        }
    }

    if let Some(patch) = shared
        && !pending.is_empty()
    {
        let pending_ids: Vec<InvoiceId> = pending.iter().map(|(id, _)| *id).collect();
        match store.bulk_update(&pending_ids, &patch) {
            Ok(written) => {
                debug!(written, "Shared bulk update dispatched");
                for (id, event) in pending {
                    report.succeeded.push(id);
                    report.audit_events.push(event);
                }
            }
            Err(err) => {
                for (id, _) in pending {
                    report.fail(id, OperationError::Collaborator(err.clone()));
                }
            }
        }
    }

    info!(
        action = command.name(),
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Bulk operation finished"
    );

    report
}
