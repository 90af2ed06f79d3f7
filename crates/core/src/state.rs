// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fincomms_audit::AuditEvent;
use fincomms_domain::{Invoice, InvoicePatch};

/// The result of a successful invoice transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. The input invoice is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The invoice after the transition.
    pub invoice: Invoice,
    /// The partial update to dispatch to the store.
    pub patch: InvoicePatch,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
