// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{YearMonth, is_active_in_month};
use crate::engine::fx::rate_for;
use crate::models::FlowKind;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::{BTreeSet, HashMap};

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Returns `[issue, detail]` pairs for records the dashboard would choke on
/// or silently ignore.
pub fn diagnose(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let transactions = store::load_transactions(conn)?;

    // 1) Schedules
    for tx in &transactions {
        if tx.end_date < tx.start_date {
            rows.push(vec![
                "inverted_range".into(),
                format!("#{} {} ends {} before {}", tx.id, tx.name, tx.end_date, tx.start_date),
            ]);
        }
        if !tx.is_recurring && !tx.excluded_dates.is_empty() {
            rows.push(vec![
                "one_off_with_exclusions".into(),
                format!("#{} {}", tx.id, tx.name),
            ]);
        }
    }

    // 2) Categories the dashboard ignores
    let types: HashMap<i64, _> = store::list_types(conn)?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let mut category_kinds = HashMap::new();
    for c in store::list_categories(conn)? {
        let kind = types.get(&c.type_id).and_then(|t| t.kind());
        if kind.is_none() {
            rows.push(vec!["unclassified_category".into(), c.name]);
        }
        category_kinds.insert(c.id, kind);
    }

    // 3) FX coverage of the latest snapshot
    let mut used: BTreeSet<String> = transactions.iter().map(|t| t.currency.clone()).collect();
    let payments = store::load_payments(conn, None)?;
    used.extend(payments.iter().map(|p| p.currency.clone()));
    match store::latest_snapshot(conn)? {
        Some(snap) => {
            for code in used {
                if let Err(e) = rate_for(&snap, &code) {
                    rows.push(vec!["missing_fx".into(), e.to_string()]);
                }
            }
        }
        None if !used.is_empty() => {
            rows.push(vec!["missing_fx".into(), "no rate snapshot stored".into()]);
        }
        None => {}
    }

    // 4) Payments the dashboard never counts
    let by_id: HashMap<i64, _> = transactions.iter().map(|t| (t.id, t)).collect();
    for p in &payments {
        if let Some(tx) = by_id.get(&p.transaction_id) {
            if category_kinds.get(&tx.category_id).copied().flatten() != Some(FlowKind::Expense) {
                rows.push(vec![
                    "payment_on_non_expense".into(),
                    format!("payment #{} settles #{} {}, which is not an expense", p.id, tx.id, tx.name),
                ]);
            }
            let month = YearMonth::of(p.date);
            if !is_active_in_month(tx, month) {
                rows.push(vec![
                    "orphan_payment".into(),
                    format!("payment #{} settles {} but #{} is not active then", p.id, month, tx.id),
                ]);
            }
        }
    }
    Ok(rows)
}
