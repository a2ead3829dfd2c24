// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::commands::{dashboard, doctor, exporter, fx, payments};
use billfold::engine::YearMonth;
use billfold::models::RateSnapshot;
use billfold::store::{self, NewTransaction};
use billfold::{db, utils};
use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn snapshot(at_month: u32, php: &str) -> RateSnapshot {
    let mut rates = BTreeMap::new();
    rates.insert("PHP".to_string(), dec(php));
    RateSnapshot {
        id: 0,
        base: "USD".into(),
        fetched_at: Utc.with_ymd_and_hms(2024, at_month, 1, 0, 0, 0).unwrap(),
        rates,
    }
}

struct Fixture {
    conn: Connection,
    paycheck: i64,
    rent: i64,
    internet: i64,
}

fn setup() -> Fixture {
    let conn = db::open_in_memory().unwrap();
    store::add_currency(&conn, "USD", "US Dollar").unwrap();
    store::add_currency(&conn, "PHP", "Philippine Peso").unwrap();
    let income = store::id_for_type(&conn, "Income").unwrap();
    let expense = store::id_for_type(&conn, "Expense").unwrap();
    let salary = store::add_category(&conn, "Salary", None, income).unwrap();
    let housing = store::add_category(&conn, "Housing", Some("home"), expense).unwrap();
    let bills = store::add_category(&conn, "Bills", Some("bolt"), expense).unwrap();

    let new = |name: &str, category_id: i64, currency: &str, amount: &str| NewTransaction {
        name: name.into(),
        category_id,
        currency: currency.into(),
        amount: dec(amount),
        is_recurring: true,
        start_date: d(2024, 1, 1),
        end_date: d(2024, 12, 31),
    };
    let paycheck = store::add_transaction(&conn, &new("Paycheck", salary, "USD", "3000")).unwrap();
    let rent = store::add_transaction(&conn, &new("Rent", housing, "USD", "1000")).unwrap();
    let internet = store::add_transaction(&conn, &new("Internet", bills, "PHP", "2800")).unwrap();

    store::insert_snapshot(&conn, &snapshot(1, "50")).unwrap();
    store::insert_snapshot(&conn, &snapshot(3, "56")).unwrap();
    Fixture {
        conn,
        paycheck,
        rent,
        internet,
    }
}

#[test]
fn latest_snapshot_is_the_newest() {
    let f = setup();
    let snap = store::latest_snapshot(&f.conn).unwrap().unwrap();
    assert_eq!(snap.rates["PHP"], dec("56"));
    assert_eq!(store::list_snapshots(&f.conn, 1).unwrap()[0].id, snap.id);
}

#[test]
fn payment_upsert_is_idempotent_per_month() {
    let f = setup();
    let first = payments::settle(&f.conn, f.rent, d(2024, 3, 5), dec("400"), None).unwrap();
    let again = payments::settle(&f.conn, f.rent, d(2024, 3, 20), dec("450"), None).unwrap();
    assert_eq!(first, again);

    let march = store::load_payments(&f.conn, YearMonth::new(2024, 3).ok()).unwrap();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].amount, dec("450"));
    assert_eq!(march[0].date, d(2024, 3, 20));

    payments::settle(&f.conn, f.rent, d(2024, 4, 5), dec("100"), None).unwrap();
    assert_eq!(store::load_payments(&f.conn, None).unwrap().len(), 2);
}

#[test]
fn payment_checks() {
    let f = setup();
    let err = payments::settle(&f.conn, f.rent, d(2025, 1, 5), dec("1"), None).unwrap_err();
    assert!(err.to_string().contains("not active"));

    let err = payments::settle(&f.conn, f.rent, d(2024, 3, 5), dec("1000.01"), None).unwrap_err();
    assert!(err.to_string().contains("exceeds"));

    // 56000 PHP == 1000 USD at the latest rate
    payments::settle(&f.conn, f.rent, d(2024, 3, 5), dec("56000"), Some("PHP")).unwrap();
}

#[test]
fn dashboard_from_store() {
    let f = setup();
    payments::settle(&f.conn, f.rent, d(2024, 3, 5), dec("400"), None).unwrap();
    payments::settle(&f.conn, f.internet, d(2024, 3, 9), dec("2800"), None).unwrap();

    let dash = dashboard::build(&f.conn, YearMonth::new(2024, 3).unwrap(), "USD").unwrap();
    assert_eq!(dash.main.budget, dec("3000"));
    assert_eq!(dash.main.total_amount, dec("1050"));
    assert_eq!(dash.main.total_paid_amount, dec("450"));
    assert_eq!(dash.main.balance, dec("2550"));
    assert_eq!(dash.main.extra, dec("1950"));

    let names: Vec<&str> = dash.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Bills", "Housing"]);
    assert_eq!(dash.categories[0].payment_completion_rate, Decimal::ONE);
    assert_eq!(dash.categories[1].payment_completion_rate, dec("0.4"));
}

#[test]
fn dashboard_without_rates_fails() {
    let conn = db::open_in_memory().unwrap();
    let err = dashboard::build(&conn, YearMonth::new(2024, 3).unwrap(), "USD").unwrap_err();
    assert!(format!("{:#}", err).contains("No exchange-rate snapshot"));
}

#[test]
fn display_currency_setting_defaults_to_usd() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(utils::get_display_currency(&conn).unwrap(), "USD");
    utils::set_display_currency(&conn, "PHP").unwrap();
    assert_eq!(utils::get_display_currency(&conn).unwrap(), "PHP");
}

#[test]
fn import_snapshot_from_json_file() {
    let conn = db::open_in_memory().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"base": "usd", "fetched_at": "2030-01-01T00:00:00Z", "rates": {{"PHP": 57.5, "eur": "0.91"}}}}"#
    )
    .unwrap();
    fx::import_snapshot(&conn, file.path()).unwrap();
    let snap = store::latest_snapshot(&conn).unwrap().unwrap();
    assert_eq!(snap.base, "USD");
    assert_eq!(snap.rates["PHP"], dec("57.5"));
    assert_eq!(snap.rates["EUR"], dec("0.91"));
}

#[test]
fn import_rejects_zero_rate() {
    let conn = db::open_in_memory().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"base": "USD", "rates": {{"PHP": 0}}}}"#).unwrap();
    assert!(fx::import_snapshot(&conn, file.path()).is_err());
}

#[test]
fn export_dashboard_csv() {
    let f = setup();
    payments::settle(&f.conn, f.rent, d(2024, 3, 5), dec("400"), None).unwrap();
    let dash = dashboard::build(&f.conn, YearMonth::new(2024, 3).unwrap(), "PHP").unwrap();
    let out = NamedTempFile::new().unwrap();
    exporter::write_dashboard(&dash, "csv", out.path()).unwrap();

    let mut rdr = csv::Reader::from_path(out.path()).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    // Bills/Internet first, then Housing/Rent
    assert_eq!(&rows[0][6], "Internet");
    assert_eq!(&rows[0][7], "2800");
    assert_eq!(&rows[1][0], "Housing");
    assert_eq!(&rows[1][8], "22400");
    assert_eq!(&rows[1][9], "PHP");

    assert!(exporter::write_dashboard(&dash, "xml", out.path()).is_err());
}

#[test]
fn file_backed_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("billfold.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        store::add_currency(&conn, "USD", "US Dollar").unwrap();
    }
    let conn = db::open_at(&path).unwrap();
    assert_eq!(store::list_currencies(&conn).unwrap().len(), 1);
    // types are seeded once
    assert_eq!(store::list_types(&conn).unwrap().len(), 2);
}

#[test]
fn doctor_reports_data_quality_issues() {
    let f = setup();
    assert!(doctor::diagnose(&f.conn).unwrap().is_empty());

    store::add_currency(&f.conn, "GBP", "Pound Sterling").unwrap();
    let other = store::add_type(&f.conn, "Transfer").unwrap();
    let savings = store::add_category(&f.conn, "Savings", None, other).unwrap();
    store::add_transaction(
        &f.conn,
        &NewTransaction {
            name: "Pension".into(),
            category_id: savings,
            currency: "GBP".into(),
            amount: dec("10"),
            is_recurring: false,
            start_date: d(2024, 2, 1),
            end_date: d(2024, 2, 1),
        },
    )
    .unwrap();

    let issues: Vec<String> = doctor::diagnose(&f.conn)
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert!(issues.contains(&"unclassified_category".to_string()));
    assert!(issues.contains(&"missing_fx".to_string()));
}

#[test]
fn income_cannot_be_settled() {
    let f = setup();
    let err = payments::settle(&f.conn, f.paycheck, d(2024, 3, 5), dec("500"), None).unwrap_err();
    assert!(err.to_string().contains("only expenses can be paid"));
    assert!(store::load_payments(&f.conn, None).unwrap().is_empty());
}

#[test]
fn doctor_flags_payments_on_income() {
    let f = setup();
    store::upsert_payment(&f.conn, f.paycheck, d(2024, 3, 5), "USD", dec("500")).unwrap();
    let issues: Vec<String> = doctor::diagnose(&f.conn)
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(issues, ["payment_on_non_expense"]);
}

#[test]
fn removing_categories() {
    let f = setup();
    assert!(store::remove_category(&f.conn, "Nope").is_err());

    let err = store::remove_category(&f.conn, "Housing").unwrap_err();
    assert!(err.to_string().contains("deactivate it instead"));
    assert!(store::transaction_by_id(&f.conn, f.rent).is_ok());

    let expense = store::id_for_type(&f.conn, "Expense").unwrap();
    store::add_category(&f.conn, "Hobbies", None, expense).unwrap();
    store::remove_category(&f.conn, "Hobbies").unwrap();
    assert!(store::id_for_category(&f.conn, "Hobbies").is_err());
}
