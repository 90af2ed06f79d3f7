// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-view counts.
//!
//! Counts are **computed**, not stored, in one pass over a snapshot, using
//! the same classifier that drives view filtering.

use crate::invoice::Invoice;
use crate::team_view::{ApPanel, Queue, TeamView, ap_panel, classify};
use serde::{Deserialize, Serialize};

/// Number of invoices listed under each team view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewCounts {
    pub all: usize,
    pub reconciliation: usize,
    pub ap_processing: usize,
    pub payment_queue: usize,
}

impl ViewCounts {
    /// Returns the count for one view.
    #[must_use]
    pub const fn get(&self, view: TeamView) -> usize {
        match view {
            TeamView::All => self.all,
            TeamView::Reconciliation => self.reconciliation,
            TeamView::ApProcessing => self.ap_processing,
            TeamView::PaymentQueue => self.payment_queue,
        }
    }

    /// Sum of the three team queues.
    ///
    /// Every invoice has exactly one queue, so this always equals `all`.
    #[must_use]
    pub const fn primary_total(&self) -> usize {
        self.reconciliation + self.ap_processing + self.payment_queue
    }
}

/// Split of the AP queue into its two display panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApPanelCounts {
    pub escalated_from_reconciliation: usize,
    pub direct_entry: usize,
}

/// Counts invoices per view in a single pass.
#[must_use]
pub fn counts_by_view(invoices: &[Invoice]) -> ViewCounts {
    invoices
        .iter()
        .fold(ViewCounts::default(), |mut counts, invoice| {
            counts.all += 1;
            match classify(invoice) {
                Queue::Reconciliation => counts.reconciliation += 1,
                Queue::ApProcessing => counts.ap_processing += 1,
                Queue::PaymentQueue => counts.payment_queue += 1,
            }
            counts
        })
}

/// Counts AP-queue invoices per display panel.
#[must_use]
pub fn counts_by_ap_panel(invoices: &[Invoice]) -> ApPanelCounts {
    invoices
        .iter()
        .filter_map(ap_panel)
        .fold(ApPanelCounts::default(), |mut counts, panel| {
            match panel {
                ApPanel::EscalatedFromReconciliation => counts.escalated_from_reconciliation += 1,
                ApPanel::DirectEntry => counts.direct_entry += 1,
            }
            counts
        })
}
