// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::is_active_in_month;
use crate::store::{self, NewTransaction};
use crate::utils::{maybe_print_json, parse_currency, parse_date, parse_decimal, parse_month, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("exclude", sub)) => exclude(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::remove_transaction(conn, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let category = sub.get_one::<String>("category").unwrap().trim();
    let currency = parse_currency(sub.get_one::<String>("currency").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let start_date = parse_date(sub.get_one::<String>("start").unwrap())?;
    let is_recurring = sub.get_flag("recurring");
    let end_date = match (is_recurring, sub.get_one::<String>("end")) {
        (true, Some(raw)) => parse_date(raw)?,
        (true, None) => bail!("--recurring requires --end"),
        (false, Some(_)) => bail!("--end only applies to --recurring transactions"),
        (false, None) => start_date,
    };

    let category_id = store::id_for_category(conn, category)?;
    let id = store::add_transaction(
        conn,
        &NewTransaction {
            name: name.clone(),
            category_id,
            currency: currency.clone(),
            amount,
            is_recurring,
            start_date,
            end_date,
        },
    )?;
    if is_recurring {
        println!(
            "Recorded #{} '{}' {} {} monthly {}..{}",
            id, name, amount, currency, start_date, end_date
        );
    } else {
        println!("Recorded #{} '{}' {} {} on {}", id, name, amount, currency, start_date);
    }
    Ok(())
}

fn exclude(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    if store::add_exclusion(conn, id, month)? {
        println!("Transaction {} skips {}", id, month);
    } else {
        println!("Transaction {} already skips {}", id, month);
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.schedule.clone(),
                    r.excluded.join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Category", "Amount", "CCY", "Schedule", "Skipped"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub schedule: String,
    pub excluded: Vec<String>,
}

/// Transactions ordered by name, optionally only those active in `--month`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = match sub.get_one::<String>("month") {
        Some(raw) => Some(parse_month(raw)?),
        None => None,
    };
    let categories: HashMap<i64, String> = store::list_categories(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut data = Vec::new();
    for tx in store::load_transactions(conn)? {
        if let Some(m) = month {
            if !is_active_in_month(&tx, m) {
                continue;
            }
        }
        let schedule = if tx.is_recurring {
            format!("monthly {}..{}", tx.start_date, tx.end_date)
        } else {
            tx.start_date.to_string()
        };
        data.push(TransactionRow {
            id: tx.id,
            name: tx.name,
            category: categories.get(&tx.category_id).cloned().unwrap_or_default(),
            amount: tx.amount.to_string(),
            currency: tx.currency,
            schedule,
            excluded: tx
                .excluded_dates
                .iter()
                .map(|d| d.format("%Y-%m").to_string())
                .collect(),
        });
    }
    Ok(data)
}
