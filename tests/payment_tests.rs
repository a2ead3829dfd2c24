// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::engine::{YearMonth, resolve_payment, validate_settlement};
use billfold::errors::BudgetError;
use billfold::models::{Payment, RateSnapshot, Transaction};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn expense(id: i64) -> Transaction {
    Transaction {
        id,
        name: "Internet".into(),
        category_id: 1,
        currency: "USD".into(),
        amount: Decimal::new(1000, 0),
        is_recurring: true,
        start_date: d(2024, 1, 1),
        end_date: d(2024, 12, 31),
        excluded_dates: vec![],
    }
}

fn payment(id: i64, tx: i64, date: NaiveDate, amount: i64, modified_min: u32) -> Payment {
    Payment {
        id,
        transaction_id: tx,
        currency: "USD".into(),
        amount: Decimal::new(amount, 0),
        date,
        updated_at: d(2024, 3, 20).and_hms_opt(10, modified_min, 0).unwrap(),
    }
}

#[test]
fn finds_payment_in_same_month_for_same_transaction() {
    let tx = expense(1);
    let payments = vec![
        payment(1, 1, d(2024, 2, 5), 100, 0),
        payment(2, 2, d(2024, 3, 5), 200, 0),
        payment(3, 1, d(2024, 3, 28), 400, 0),
    ];
    let march = YearMonth::new(2024, 3).unwrap();
    let found = resolve_payment(&tx, march, &payments).unwrap();
    assert_eq!(found.id, 3);

    let april = YearMonth::new(2024, 4).unwrap();
    assert!(resolve_payment(&tx, april, &payments).is_none());
}

#[test]
fn duplicates_resolve_to_most_recently_modified() {
    let tx = expense(1);
    let march = YearMonth::new(2024, 3).unwrap();
    let payments = vec![
        payment(10, 1, d(2024, 3, 1), 100, 30),
        payment(11, 1, d(2024, 3, 2), 200, 45),
        payment(12, 1, d(2024, 3, 3), 300, 15),
    ];
    assert_eq!(resolve_payment(&tx, march, &payments).unwrap().id, 11);

    // order of input doesn't matter
    let mut reversed = payments.clone();
    reversed.reverse();
    assert_eq!(resolve_payment(&tx, march, &reversed).unwrap().id, 11);

    // equal timestamps fall back to the highest id
    let tied = vec![
        payment(20, 1, d(2024, 3, 1), 100, 0),
        payment(21, 1, d(2024, 3, 2), 200, 0),
    ];
    assert_eq!(resolve_payment(&tx, march, &tied).unwrap().id, 21);
}

#[test]
fn settlement_within_amount_is_accepted() {
    let tx = expense(1);
    assert!(validate_settlement(&tx, Decimal::new(1000, 0), "USD", None).is_ok());
    assert!(validate_settlement(&tx, Decimal::ZERO, "USD", None).is_ok());
}

#[test]
fn overpayment_is_rejected() {
    let tx = expense(1);
    let err = validate_settlement(&tx, Decimal::new(100001, 2), "USD", None).unwrap_err();
    assert!(matches!(err, BudgetError::Overpayment { transaction_id: 1, .. }));
}

#[test]
fn foreign_currency_settlement_is_converted_before_checking() {
    let tx = expense(1);
    let mut rates = BTreeMap::new();
    rates.insert("PHP".to_string(), Decimal::new(56, 0));
    let snap = RateSnapshot {
        id: 1,
        base: "USD".into(),
        fetched_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        rates,
    };
    // 56000 PHP == 1000 USD
    assert!(validate_settlement(&tx, Decimal::new(56000, 0), "PHP", Some(&snap)).is_ok());
    assert!(validate_settlement(&tx, Decimal::new(56001, 0), "PHP", Some(&snap)).is_err());
    assert_eq!(
        validate_settlement(&tx, Decimal::new(1, 0), "PHP", None).unwrap_err(),
        BudgetError::MissingRateSnapshot
    );
}

#[test]
fn negative_settlement_is_rejected() {
    let tx = expense(1);
    let err = validate_settlement(&tx, Decimal::new(-1, 0), "USD", None).unwrap_err();
    assert_eq!(
        err,
        BudgetError::NegativeSettlement {
            transaction_id: 1,
            amount: Decimal::new(-1, 0),
        }
    );
}
