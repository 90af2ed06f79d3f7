// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit records for invoice transitions.
//!
//! Every successful engine operation produces exactly one [`AuditEvent`].
//! Evidence (notes and emails) lives on the invoice itself; audit events
//! record who changed what, and why.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use fincomms_domain::{Invoice, InvoiceId, PaymentStatus};
use serde::{Deserialize, Serialize};

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// an analyst, an AP processor, or the reconciliation import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "user", "system", "import").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, batch ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`ApplyStage`", "`Revert`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The workflow-relevant fields of an invoice at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    /// Display label of the stage.
    pub stage: String,
    pub payment_status: PaymentStatus,
    pub payment_blocked: bool,
    pub evidence_count: usize,
}

impl InvoiceSnapshot {
    /// Captures the workflow fields of an invoice.
    #[must_use]
    pub fn of(invoice: &Invoice) -> Self {
        Self {
            stage: invoice.current_stage().label().to_string(),
            payment_status: invoice.payment_status(),
            payment_blocked: invoice.payment_blocked(),
            evidence_count: invoice.evidence().len(),
        }
    }
}

/// An immutable audit event representing one invoice transition.
///
/// Audit events capture:
/// - Which invoice changed
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The invoice before and after the transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub invoice_id: InvoiceId,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: InvoiceSnapshot,
    pub after: InvoiceSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent` from the invoice before and after a change.
    #[must_use]
    pub fn new(actor: Actor, cause: Cause, action: Action, before: &Invoice, after: &Invoice) -> Self {
        Self {
            invoice_id: before.id,
            actor,
            cause,
            action,
            before: InvoiceSnapshot::of(before),
            after: InvoiceSnapshot::of(after),
        }
    }

    /// Creates the event recording an invoice's creation.
    ///
    /// There is no prior state, so both snapshots hold the invoice as created.
    #[must_use]
    pub fn created(actor: Actor, cause: Cause, invoice: &Invoice) -> Self {
        let details: String = format!(
            "{} invoice '{}' at stage {}",
            invoice.source,
            invoice.invoice_number,
            invoice.current_stage().label()
        );
        Self::new(
            actor,
            cause,
            Action::new(String::from("Create"), Some(details)),
            invoice,
            invoice,
        )
    }

    /// Returns true if the stage differs between the two snapshots.
    #[must_use]
    pub fn changed_stage(&self) -> bool {
        self.before.stage != self.after.stage
    }
}
