// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{Dashboard, YearMonth, summarize};
use crate::store::LedgerData;
use crate::utils::{
    fmt_money, fmt_rate, get_display_currency, maybe_print_json, parse_currency, parse_month,
    pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(m.get_one::<String>("month").unwrap())?;
    let currency = display_currency(conn, m)?;
    let dash = build(conn, month, &currency)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &dash)? {
        return Ok(());
    }
    print_dashboard(&dash, month);
    Ok(())
}

/// `--currency` if given, else the stored display currency.
pub fn display_currency(conn: &Connection, m: &clap::ArgMatches) -> Result<String> {
    match m.get_one::<String>("currency") {
        Some(c) => parse_currency(c),
        None => get_display_currency(conn),
    }
}

pub fn build(conn: &Connection, month: YearMonth, currency: &str) -> Result<Dashboard> {
    let data = LedgerData::load(conn, month)?;
    let dash = summarize(&data.inputs(), month, currency)
        .with_context(|| format!("Failed to build the {} dashboard in {}", month, currency))?;
    info!(
        %month,
        currency,
        categories = dash.categories.len(),
        "dashboard built"
    );
    Ok(dash)
}

fn print_dashboard(dash: &Dashboard, month: YearMonth) {
    let main = &dash.main;
    let ccy = main.currency.as_str();
    println!(
        "{}",
        pretty_table(
            &["Month", "Budget", "Planned", "Paid", "Balance", "Extra", "Done"],
            vec![vec![
                month.to_string(),
                fmt_money(&main.budget, ccy),
                fmt_money(&main.total_amount, ccy),
                fmt_money(&main.total_paid_amount, ccy),
                fmt_money(&main.balance, ccy),
                fmt_money(&main.extra, ccy),
                fmt_rate(&main.payment_completion_rate),
            ]],
        )
    );

    let mut rows = Vec::new();
    for cat in &dash.categories {
        rows.push(vec![
            cat.name.clone(),
            String::new(),
            fmt_money(&cat.total_amount, ccy),
            fmt_money(&cat.total_paid_amount, ccy),
            fmt_rate(&cat.payment_completion_rate),
        ]);
        for item in &cat.transactions {
            rows.push(vec![
                String::new(),
                item.name.clone(),
                fmt_money(&item.amount, ccy),
                fmt_money(&item.paid_amount, ccy),
                String::new(),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Category", "Expense", "Planned", "Paid", "Done"], rows)
    );
}
