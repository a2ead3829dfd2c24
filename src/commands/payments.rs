// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{YearMonth, is_active_in_month, validate_settlement};
use crate::models::FlowKind;
use crate::store;
use crate::utils::{maybe_print_json, parse_currency, parse_date, parse_decimal, parse_month, pretty_table};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let tx_id = *sub.get_one::<i64>("tx").unwrap();
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let currency = match sub.get_one::<String>("currency") {
                Some(c) => Some(parse_currency(c)?),
                None => None,
            };
            let id = settle(conn, tx_id, date, amount, currency.as_deref())?;
            println!(
                "Payment #{} recorded for transaction {} in {}",
                id,
                tx_id,
                YearMonth::of(date)
            );
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::remove_payment(conn, id)?;
            println!("Removed payment {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Validates and upserts a payment against an expense; the month of `date`
/// is the settled period.
pub fn settle(
    conn: &Connection,
    tx_id: i64,
    date: NaiveDate,
    amount: Decimal,
    currency: Option<&str>,
) -> Result<i64> {
    let tx = store::transaction_by_id(conn, tx_id)?;
    let entry_type = store::type_of_category(conn, tx.category_id)?;
    if entry_type.kind() != Some(FlowKind::Expense) {
        bail!(
            "Transaction {} is {}, only expenses can be paid",
            tx_id,
            entry_type.name
        );
    }
    let month = YearMonth::of(date);
    if !is_active_in_month(&tx, month) {
        bail!("Transaction {} is not active in {}", tx_id, month);
    }
    let currency = currency.unwrap_or(&tx.currency).to_string();
    let rates = if currency == tx.currency {
        None
    } else {
        store::latest_snapshot(conn)?
    };
    validate_settlement(&tx, amount, &currency, rates.as_ref())?;
    store::upsert_payment(conn, tx_id, date, &currency, amount)
}

#[derive(Serialize)]
struct PaymentRow {
    id: i64,
    transaction_id: i64,
    date: String,
    amount: String,
    currency: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(raw) => Some(parse_month(raw)?),
        None => None,
    };
    let data: Vec<PaymentRow> = store::load_payments(conn, month)?
        .into_iter()
        .map(|p| PaymentRow {
            id: p.id,
            transaction_id: p.transaction_id,
            date: p.date.to_string(),
            amount: p.amount.to_string(),
            currency: p.currency,
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.transaction_id.to_string(),
                    p.date,
                    p.amount,
                    p.currency,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Transaction", "Date", "Amount", "CCY"], rows)
        );
    }
    Ok(())
}
