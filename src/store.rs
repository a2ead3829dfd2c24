// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Loading and saving the records the budget engine reads.

use crate::engine::{BudgetInputs, YearMonth};
use crate::models::{Category, Currency, EntryType, Payment, RateSnapshot, Transaction};
use crate::utils::parse_date;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};

const UPDATED_AT_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn decimal_col(raw: &str, what: &str, id: i64) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' on record {}", what, raw, id))
}

// Currencies

pub fn add_currency(conn: &Connection, code: &str, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO currencies(code, name) VALUES (?1, ?2)
         ON CONFLICT(code) DO UPDATE SET name=excluded.name",
        params![code, name],
    )?;
    Ok(())
}

pub fn list_currencies(conn: &Connection) -> Result<Vec<Currency>> {
    let mut stmt = conn.prepare("SELECT code, name FROM currencies ORDER BY code")?;
    let rows = stmt.query_map([], |r| {
        Ok(Currency {
            code: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

// Types

pub fn add_type(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO types(name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_types(conn: &Connection) -> Result<Vec<EntryType>> {
    let mut stmt = conn.prepare("SELECT id, name FROM types ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(EntryType {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn id_for_type(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM types WHERE name=?1 COLLATE NOCASE",
        params![name],
        |r| r.get(0),
    )
    .with_context(|| format!("Type '{}' not found", name))
}

// Categories

pub fn add_category(conn: &Connection, name: &str, icon: Option<&str>, type_id: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(name, icon, type_id) VALUES (?1, ?2, ?3)",
        params![name, icon, type_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, icon, type_id, active FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            icon: r.get(2)?,
            type_id: r.get(3)?,
            active: r.get(4)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM categories WHERE name=?1",
        params![name],
        |r| r.get(0),
    )
    .with_context(|| format!("Category '{}' not found", name))
}

/// The type a category rolls up into.
pub fn type_of_category(conn: &Connection, category_id: i64) -> Result<EntryType> {
    conn.query_row(
        "SELECT t.id, t.name FROM categories c JOIN types t ON t.id = c.type_id WHERE c.id=?1",
        params![category_id],
        |r| {
            Ok(EntryType {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )
    .with_context(|| format!("Category {} not found", category_id))
}

/// Deletes an unused category. Categories still referenced by transactions
/// are kept; deactivate those instead.
pub fn remove_category(conn: &Connection, name: &str) -> Result<()> {
    let id = id_for_category(conn, name)?;
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if used > 0 {
        bail!(
            "Category '{}' is used by {} transaction(s); deactivate it instead",
            name,
            used
        );
    }
    let n = conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Category '{}' not found", name);
    }
    debug!(category = id, "category removed");
    Ok(())
}

pub fn set_category_active(conn: &Connection, name: &str, active: bool) -> Result<()> {
    let n = conn.execute(
        "UPDATE categories SET active=?1 WHERE name=?2",
        params![active, name],
    )?;
    if n == 0 {
        bail!("Category '{}' not found", name);
    }
    Ok(())
}

// Transactions

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub name: String,
    pub category_id: i64,
    pub currency: String,
    pub amount: Decimal,
    pub is_recurring: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn add_transaction(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    if tx.amount < Decimal::ZERO {
        bail!("Amount must be non-negative, got {}", tx.amount);
    }
    let end = if tx.is_recurring { tx.end_date } else { tx.start_date };
    if end < tx.start_date {
        bail!("End date {} is before start date {}", end, tx.start_date);
    }
    conn.execute(
        "INSERT INTO transactions(name, category_id, currency, amount, is_recurring, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            tx.name,
            tx.category_id,
            tx.currency,
            tx.amount.to_string(),
            tx.is_recurring,
            tx.start_date.to_string(),
            end.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, name = %tx.name, recurring = tx.is_recurring, "transaction added");
    Ok(id)
}

type TransactionRow = (i64, String, i64, String, String, bool, String, String, String);

fn transaction_from_row(row: TransactionRow) -> Result<Transaction> {
    let (id, name, category_id, currency, amount, is_recurring, start, end, excluded) = row;
    let excluded_raw: Vec<String> = serde_json::from_str(&excluded)
        .with_context(|| format!("Invalid excluded dates on transaction {}", id))?;
    let mut excluded_dates = excluded_raw
        .iter()
        .map(|d| parse_date(d))
        .collect::<Result<Vec<_>>>()?;
    excluded_dates.sort();
    Ok(Transaction {
        id,
        name,
        category_id,
        currency,
        amount: decimal_col(&amount, "amount", id)?,
        is_recurring,
        start_date: parse_date(&start)?,
        end_date: parse_date(&end)?,
        excluded_dates,
    })
}

const TRANSACTION_COLS: &str = "id, name, category_id, currency, amount, is_recurring, start_date, end_date, excluded_dates";

fn map_transaction_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<TransactionRow> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
    ))
}

/// All transactions, ordered by name then id.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let sql = format!("SELECT {} FROM transactions ORDER BY name, id", TRANSACTION_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_transaction_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(transaction_from_row(row?)?);
    }
    Ok(out)
}

pub fn transaction_by_id(conn: &Connection, id: i64) -> Result<Transaction> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", TRANSACTION_COLS);
    let row = conn
        .query_row(&sql, params![id], map_transaction_row)
        .optional()?
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;
    transaction_from_row(row)
}

/// Skips `month` for a recurring transaction. Adding the same month twice is a no-op.
pub fn add_exclusion(conn: &Connection, id: i64, month: YearMonth) -> Result<bool> {
    let tx = transaction_by_id(conn, id)?;
    if !tx.is_recurring {
        bail!("Transaction {} is not recurring; exclusions only apply to recurring transactions", id);
    }
    if tx.excluded_dates.iter().any(|d| month.contains(*d)) {
        return Ok(false);
    }
    let first = month
        .first_day()
        .ok_or_else(|| anyhow!("Invalid month {}", month))?;
    let mut dates = tx.excluded_dates;
    dates.push(first);
    dates.sort();
    let raw: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
    conn.execute(
        "UPDATE transactions SET excluded_dates=?1 WHERE id=?2",
        params![serde_json::to_string(&raw)?, id],
    )?;
    Ok(true)
}

pub fn remove_transaction(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    Ok(())
}

// Payments

/// Records the settlement of `transaction_id` for the month `date` falls in.
/// A second call for the same month replaces the first.
pub fn upsert_payment(
    conn: &Connection,
    transaction_id: i64,
    date: NaiveDate,
    currency: &str,
    amount: Decimal,
) -> Result<i64> {
    let period = YearMonth::of(date).to_string();
    let now = Utc::now().naive_utc().format(UPDATED_AT_FMT).to_string();
    conn.execute(
        "INSERT INTO payments(transaction_id, period, date, currency, amount, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(transaction_id, period) DO UPDATE SET
            date=excluded.date, currency=excluded.currency,
            amount=excluded.amount, updated_at=excluded.updated_at",
        params![transaction_id, period, date.to_string(), currency, amount.to_string(), now],
    )?;
    let id: i64 = conn.query_row(
        "SELECT id FROM payments WHERE transaction_id=?1 AND period=?2",
        params![transaction_id, period],
        |r| r.get(0),
    )?;
    Ok(id)
}

type PaymentRow = (i64, i64, String, String, String, String);

fn map_payment_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<PaymentRow> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

/// Payments, optionally only those settling `month`.
pub fn load_payments(conn: &Connection, month: Option<YearMonth>) -> Result<Vec<Payment>> {
    let mut sql = String::from(
        "SELECT id, transaction_id, currency, amount, date, updated_at FROM payments",
    );
    let period = month.map(|m| m.to_string());
    if period.is_some() {
        sql.push_str(" WHERE period=?1");
    }
    sql.push_str(" ORDER BY date, id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = match &period {
        Some(p) => stmt.query_map(params![p], map_payment_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
        None => stmt.query_map([], map_payment_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
    };
    let mut out = Vec::with_capacity(rows.len());
    for (id, transaction_id, currency, amount, date, updated_at) in rows {
        out.push(Payment {
            id,
            transaction_id,
            currency,
            amount: decimal_col(&amount, "payment amount", id)?,
            date: parse_date(&date)?,
            updated_at: NaiveDateTime::parse_from_str(&updated_at, UPDATED_AT_FMT)
                .with_context(|| format!("Invalid updated_at '{}' on payment {}", updated_at, id))?,
        });
    }
    Ok(out)
}

pub fn remove_payment(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM payments WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Payment {} not found", id);
    }
    Ok(())
}

// Exchange rates

pub fn insert_snapshot(conn: &Connection, snapshot: &RateSnapshot) -> Result<i64> {
    conn.execute(
        "INSERT INTO exchange_rates(base, fetched_at, rates) VALUES (?1, ?2, ?3)",
        params![
            snapshot.base,
            snapshot.fetched_at.to_rfc3339(),
            serde_json::to_string(&snapshot.rates)?
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, base = %snapshot.base, quotes = snapshot.rates.len(), "rate snapshot stored");
    Ok(id)
}

type SnapshotRow = (i64, String, String, String);

fn map_snapshot_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<SnapshotRow> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
}

fn snapshot_from_row((id, base, fetched_at, rates): SnapshotRow) -> Result<RateSnapshot> {
    let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
        .with_context(|| format!("Invalid timestamp '{}' on rate snapshot {}", fetched_at, id))?
        .with_timezone(&Utc);
    let rates: BTreeMap<String, Decimal> = serde_json::from_str(&rates)
        .with_context(|| format!("Invalid rates on snapshot {}", id))?;
    Ok(RateSnapshot {
        id,
        base,
        fetched_at,
        rates,
    })
}

/// Newest snapshots first.
pub fn list_snapshots(conn: &Connection, limit: usize) -> Result<Vec<RateSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT id, base, fetched_at, rates FROM exchange_rates ORDER BY fetched_at DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], map_snapshot_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(snapshot_from_row(row?)?);
    }
    Ok(out)
}

pub fn latest_snapshot(conn: &Connection) -> Result<Option<RateSnapshot>> {
    // rfc3339 strings with differing offsets don't sort lexically, so compare parsed values
    let mut stmt = conn.prepare("SELECT id, base, fetched_at, rates FROM exchange_rates")?;
    let rows = stmt.query_map([], map_snapshot_row)?;
    let mut all = Vec::new();
    for row in rows {
        all.push(snapshot_from_row(row?)?);
    }
    Ok(RateSnapshot::latest(&all).cloned())
}

/// Everything the dashboard needs for one month.
#[derive(Debug, Clone)]
pub struct LedgerData {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub types: Vec<EntryType>,
    pub payments: Vec<Payment>,
    pub rates: Option<RateSnapshot>,
}

impl LedgerData {
    pub fn load(conn: &Connection, month: YearMonth) -> Result<Self> {
        Ok(Self {
            transactions: load_transactions(conn)?,
            categories: list_categories(conn)?,
            types: list_types(conn)?,
            payments: load_payments(conn, Some(month))?,
            rates: latest_snapshot(conn)?,
        })
    }

    pub fn inputs(&self) -> BudgetInputs<'_> {
        BudgetInputs {
            transactions: &self.transactions,
            categories: &self.categories,
            types: &self.types,
            payments: &self.payments,
            rates: self.rates.as_ref(),
        }
    }
}
