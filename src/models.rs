// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

/// Direction of money a category's type stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryType {
    pub id: i64,
    pub name: String,
}

impl EntryType {
    /// Income and Expense are the only types the dashboard understands.
    pub fn kind(&self) -> Option<FlowKind> {
        match self.name.trim().to_ascii_lowercase().as_str() {
            "income" => Some(FlowKind::Income),
            "expense" => Some(FlowKind::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub type_id: i64,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub currency: String,
    pub amount: Decimal,
    pub is_recurring: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate, // == start_date when one-off
    pub excluded_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub transaction_id: i64,
    pub currency: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

/// One timestamped set of rates: units of each currency per 1 unit of `base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(default)]
    pub id: i64,
    pub base: String,
    pub fetched_at: DateTime<Utc>,
    pub rates: BTreeMap<String, Decimal>,
}

impl RateSnapshot {
    /// Picks the snapshot with the highest timestamp; ties go to the higher id.
    pub fn latest(snapshots: &[RateSnapshot]) -> Option<&RateSnapshot> {
        snapshots
            .iter()
            .max_by(|a, b| a.fetched_at.cmp(&b.fetched_at).then(a.id.cmp(&b.id)))
    }
}
