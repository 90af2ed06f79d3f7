// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filtered and sorted per-view invoice lists.

use crate::error::DomainError;
use crate::invoice::Invoice;
use crate::team_view::{TeamView, is_visible_in};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Field an invoice list can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Amount,
    Vendor,
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" | "created" | "date" => Ok(Self::CreatedAt),
            "amount" => Ok(Self::Amount),
            "vendor" => Ok(Self::Vendor),
            _ => Err(DomainError::InvalidSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// What to list: a view, an optional free-text filter, and a sort order.
///
/// The default lists every invoice, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub view: TeamView,
    pub search: Option<String>,
    pub sort: SortOrder,
}

fn matches_search(invoice: &Invoice, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(&invoice.invoice_number)
        || contains(&invoice.vendor)
        || invoice.entity.as_deref().is_some_and(contains)
}

fn compare(a: &Invoice, b: &Invoice, key: SortKey) -> Ordering {
    match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::Vendor => a.vendor.to_lowercase().cmp(&b.vendor.to_lowercase()),
    }
}

/// Lists the invoices of one view.
///
/// View filtering happens first, then the search filter, then a stable sort.
#[must_use]
pub fn list_view<'a>(invoices: &'a [Invoice], query: &ListQuery) -> Vec<&'a Invoice> {
    let needle: Option<String> = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut listed: Vec<&Invoice> = invoices
        .iter()
        .filter(|invoice| is_visible_in(invoice, query.view))
        .filter(|invoice| needle.as_deref().is_none_or(|n| matches_search(invoice, n)))
        .collect();

    listed.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort.key);
        match query.sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    listed
}
