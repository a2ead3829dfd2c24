// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::engine::{YearMonth, is_active_in_month};
use billfold::models::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ym(y: i32, m: u32) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

fn recurring(start: NaiveDate, end: NaiveDate, excluded: Vec<NaiveDate>) -> Transaction {
    Transaction {
        id: 1,
        name: "Rent".into(),
        category_id: 1,
        currency: "USD".into(),
        amount: Decimal::new(1000, 0),
        is_recurring: true,
        start_date: start,
        end_date: end,
        excluded_dates: excluded,
    }
}

#[test]
fn encode_is_year_times_hundred_plus_month() {
    assert_eq!(ym(2024, 3).encode(), 202403);
    assert_eq!(ym(1999, 12).encode(), 199912);
    assert!(ym(2023, 12).encode() < ym(2024, 1).encode());
}

#[test]
fn rejects_month_out_of_range() {
    assert!(YearMonth::new(2024, 0).is_err());
    assert!(YearMonth::new(2024, 13).is_err());
    assert!(YearMonth::parse("2024-13").is_err());
    assert_eq!(YearMonth::parse(" 2024-03 ").unwrap(), ym(2024, 3));
    assert_eq!(ym(2024, 3).to_string(), "2024-03");
}

#[test]
fn active_on_boundary_months_only_inside_range() {
    // mid-month start and end still count for the whole month
    let tx = recurring(d(2024, 1, 15), d(2024, 6, 10), vec![]);
    assert!(!is_active_in_month(&tx, ym(2023, 12)));
    assert!(is_active_in_month(&tx, ym(2024, 1)));
    assert!(is_active_in_month(&tx, ym(2024, 3)));
    assert!(is_active_in_month(&tx, ym(2024, 6)));
    assert!(!is_active_in_month(&tx, ym(2024, 7)));
}

#[test]
fn range_spanning_year_boundary() {
    let tx = recurring(d(2023, 11, 1), d(2024, 2, 29), vec![]);
    assert!(is_active_in_month(&tx, ym(2023, 12)));
    assert!(is_active_in_month(&tx, ym(2024, 1)));
    assert!(is_active_in_month(&tx, ym(2024, 2)));
    assert!(!is_active_in_month(&tx, ym(2023, 10)));
    assert!(!is_active_in_month(&tx, ym(2024, 3)));
}

#[test]
fn excluded_month_is_skipped() {
    let tx = recurring(d(2024, 1, 1), d(2024, 12, 31), vec![d(2024, 3, 1)]);
    assert!(!is_active_in_month(&tx, ym(2024, 3)));
    assert!(is_active_in_month(&tx, ym(2024, 2)));
    assert!(is_active_in_month(&tx, ym(2024, 4)));
}

#[test]
fn exclusion_matches_exact_year_and_month() {
    let tx = recurring(d(2023, 1, 1), d(2024, 12, 31), vec![d(2023, 3, 20)]);
    assert!(!is_active_in_month(&tx, ym(2023, 3)));
    // same month number in another year stays active
    assert!(is_active_in_month(&tx, ym(2024, 3)));
    // other months of the excluded year stay active
    assert!(is_active_in_month(&tx, ym(2023, 1)));
    assert!(is_active_in_month(&tx, ym(2023, 4)));
}

#[test]
fn one_off_is_active_only_in_its_month() {
    let mut tx = recurring(d(2024, 5, 17), d(2024, 5, 17), vec![]);
    tx.is_recurring = false;
    assert!(is_active_in_month(&tx, ym(2024, 5)));
    assert!(!is_active_in_month(&tx, ym(2024, 4)));
    assert!(!is_active_in_month(&tx, ym(2024, 6)));
    assert!(!is_active_in_month(&tx, ym(2025, 5)));
}
