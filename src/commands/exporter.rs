// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::dashboard;
use crate::engine::Dashboard;
use crate::utils::parse_month;
use anyhow::{Result, bail};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => export_dashboard(conn, sub),
        _ => Ok(()),
    }
}

fn export_dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let currency = dashboard::display_currency(conn, sub)?;
    let dash = dashboard::build(conn, month, &currency)?;
    write_dashboard(&dash, &fmt, Path::new(out))?;
    println!("Exported {} dashboard to {}", month, out);
    Ok(())
}

/// csv: one row per expense line, category totals repeated on each row.
/// json: the dashboard document as-is.
pub fn write_dashboard(dash: &Dashboard, fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "category",
                "category_total",
                "category_paid",
                "category_completion",
                "transaction_id",
                "payment_id",
                "name",
                "amount",
                "paid_amount",
                "currency",
            ])?;
            let ccy = dash.main.currency.as_str();
            for cat in &dash.categories {
                for item in &cat.transactions {
                    wtr.write_record([
                        cat.name.clone(),
                        cat.total_amount.round_dp(2).to_string(),
                        cat.total_paid_amount.round_dp(2).to_string(),
                        cat.payment_completion_rate.round_dp(4).to_string(),
                        item.id.clone(),
                        item.payment_id.clone().unwrap_or_default(),
                        item.name.clone(),
                        item.amount.round_dp(2).to_string(),
                        item.paid_amount.round_dp(2).to_string(),
                        ccy.to_string(),
                    ])?;
                }
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(dash)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
