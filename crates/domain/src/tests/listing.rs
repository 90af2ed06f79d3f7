// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Invoice, ListQuery, MissingInvoiceStage, PaymentStatus, PoPendingStage, SortDirection,
    SortKey, SortOrder, Stage, TeamView, list_view,
};
use rust_decimal::Decimal;
use time::Duration;

use super::helpers::{BASE_TIME, create_test_invoice};

fn sample_snapshot() -> Vec<Invoice> {
    let mut first = create_test_invoice(
        1,
        Stage::PoPending(PoPendingStage::InvoiceReceived),
        PaymentStatus::None,
    );
    first.vendor = String::from("Zeta Logistics");
    first.amount = Decimal::new(50_000, 2);
    first.created_at = BASE_TIME;

    let mut second = create_test_invoice(
        2,
        Stage::MissingInvoice(MissingInvoiceStage::SentToApProcessing),
        PaymentStatus::None,
    );
    second.vendor = String::from("acme supplies");
    second.amount = Decimal::new(120_000, 2);
    second.created_at = BASE_TIME + Duration::days(1);

    let mut third = create_test_invoice(
        3,
        Stage::MissingInvoice(MissingInvoiceStage::InvoiceMissing),
        PaymentStatus::None,
    );
    third.vendor = String::from("Beta Foods");
    third.amount = Decimal::new(7_500, 2);
    third.created_at = BASE_TIME + Duration::days(2);
    third.entity = Some(String::from("PT02"));

    let mut fourth = create_test_invoice(
        4,
        Stage::PoPending(PoPendingStage::ExrCreated),
        PaymentStatus::Requested,
    );
    fourth.vendor = String::from("Gamma Tools");
    fourth.amount = Decimal::new(300_000, 2);
    fourth.created_at = BASE_TIME + Duration::days(3);

    vec![first, second, third, fourth]
}

fn ids(listed: &[&Invoice]) -> Vec<i64> {
    listed.iter().map(|i| i.id.value()).collect()
}

#[test]
fn test_default_query_lists_everything_newest_first() {
    let snapshot = sample_snapshot();
    let listed = list_view(&snapshot, &ListQuery::default());
    assert_eq!(ids(&listed), vec![4, 3, 2, 1]);
}

#[test]
fn test_ap_view_sorted_by_amount_ascending() {
    let snapshot = sample_snapshot();
    let query = ListQuery {
        view: TeamView::ApProcessing,
        search: None,
        sort: SortOrder {
            key: SortKey::Amount,
            direction: SortDirection::Ascending,
        },
    };

    let listed = list_view(&snapshot, &query);

    // The payment-requested invoice is excluded even though its stage is an AP stage.
    assert_eq!(ids(&listed), vec![1, 2]);
}

#[test]
fn test_vendor_sort_ignores_case() {
    let snapshot = sample_snapshot();
    let query = ListQuery {
        view: TeamView::All,
        search: None,
        sort: SortOrder {
            key: SortKey::Vendor,
            direction: SortDirection::Ascending,
        },
    };

    let listed = list_view(&snapshot, &query);
    assert_eq!(ids(&listed), vec![2, 3, 4, 1]);
}

#[test]
fn test_search_filters_after_view() {
    let snapshot = sample_snapshot();
    let query = ListQuery {
        view: TeamView::Reconciliation,
        search: Some(String::from(" pt02 ")),
        sort: SortOrder::default(),
    };
    assert_eq!(ids(&list_view(&snapshot, &query)), vec![3]);

    let query = ListQuery {
        view: TeamView::ApProcessing,
        search: Some(String::from("pt02")),
        sort: SortOrder::default(),
    };
    assert!(list_view(&snapshot, &query).is_empty());
}

#[test]
fn test_search_matches_invoice_number() {
    let snapshot = sample_snapshot();
    let query = ListQuery {
        view: TeamView::All,
        search: Some(String::from("inv-2")),
        sort: SortOrder::default(),
    };
    assert_eq!(ids(&list_view(&snapshot, &query)), vec![2]);
}

#[test]
fn test_blank_search_is_ignored() {
    let snapshot = sample_snapshot();
    let query = ListQuery {
        view: TeamView::All,
        search: Some(String::from("   ")),
        sort: SortOrder::default(),
    };
    assert_eq!(list_view(&snapshot, &query).len(), 4);
}
