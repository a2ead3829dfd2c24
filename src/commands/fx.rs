// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::convert;
use crate::errors::BudgetError;
use crate::models::RateSnapshot;
use crate::store;
use crate::utils::{parse_currency, parse_decimal, parse_rate_pair, pretty_table, set_display_currency};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-display", sub)) => {
            let ccy = parse_currency(sub.get_one::<String>("currency").unwrap())?;
            set_display_currency(conn, &ccy)?;
            println!("Display currency set to {}", ccy);
        }
        Some(("add", sub)) => add_snapshot(conn, sub)?,
        Some(("import", sub)) => {
            let path = sub.get_one::<String>("file").unwrap();
            let id = import_snapshot(conn, Path::new(path))?;
            println!("Imported rate snapshot #{} from {}", id, path);
        }
        Some(("list", sub)) => {
            let limit: usize = *sub.get_one::<usize>("limit").unwrap_or(&10);
            list_snapshots(conn, limit)?
        }
        Some(("convert", sub)) => convert_amount(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn check_rates(base: &str, rates: &BTreeMap<String, Decimal>) -> Result<()> {
    if rates.is_empty() {
        bail!("A snapshot needs at least one rate");
    }
    for (code, rate) in rates {
        if *rate <= Decimal::ZERO {
            bail!("Rate for {} must be positive, got {}", code, rate);
        }
        if code == base && *rate != Decimal::ONE {
            bail!("Rate for the base currency {} must be 1, got {}", base, rate);
        }
    }
    Ok(())
}

fn add_snapshot(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let base = parse_currency(sub.get_one::<String>("base").unwrap())?;
    let mut rates = BTreeMap::new();
    for raw in sub.get_many::<String>("rate").into_iter().flatten() {
        let (code, rate) = parse_rate_pair(raw)?;
        rates.insert(code, rate);
    }
    let fetched_at = match sub.get_one::<String>("at") {
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .with_context(|| format!("Invalid timestamp '{}', expected RFC3339", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    check_rates(&base, &rates)?;
    let id = store::insert_snapshot(
        conn,
        &RateSnapshot {
            id: 0,
            base: base.clone(),
            fetched_at,
            rates,
        },
    )?;
    println!("Stored rate snapshot #{} (base {})", id, base);
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    base: String,
    #[serde(default)]
    fetched_at: Option<DateTime<Utc>>,
    rates: BTreeMap<String, Decimal>,
}

/// Reads `{"base": "USD", "fetched_at": "...", "rates": {"PHP": 56}}`.
pub fn import_snapshot(conn: &Connection, path: &Path) -> Result<i64> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: SnapshotFile = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid rate snapshot in {}", path.display()))?;
    let base = parse_currency(&file.base)?;
    let mut rates = BTreeMap::new();
    for (code, rate) in file.rates {
        rates.insert(parse_currency(&code)?, rate);
    }
    check_rates(&base, &rates)?;
    store::insert_snapshot(
        conn,
        &RateSnapshot {
            id: 0,
            base,
            fetched_at: file.fetched_at.unwrap_or_else(Utc::now),
            rates,
        },
    )
}

fn list_snapshots(conn: &Connection, limit: usize) -> Result<()> {
    let mut data = Vec::new();
    for snap in store::list_snapshots(conn, limit)? {
        for (quote, rate) in &snap.rates {
            data.push(vec![
                snap.id.to_string(),
                snap.fetched_at.format("%Y-%m-%d %H:%M").to_string(),
                snap.base.clone(),
                quote.clone(),
                rate.to_string(),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Snapshot", "At", "Base", "Quote", "Rate"], data)
    );
    Ok(())
}

fn convert_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = parse_currency(sub.get_one::<String>("from").unwrap())?;
    let to = parse_currency(sub.get_one::<String>("to").unwrap())?;
    let snap = store::latest_snapshot(conn)?.ok_or(BudgetError::MissingRateSnapshot)?;
    let res = convert(amount, &from, &to, &snap)?;
    println!("{} {} -> {:.4} {}", amount, from, res, to);
    Ok(())
}
