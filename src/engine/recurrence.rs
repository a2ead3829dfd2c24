// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{BudgetError, BudgetResult};
use crate::models::Transaction;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month, comparable through its `year * 100 + month` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> BudgetResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(BudgetError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// March 2024 -> 202403.
    pub fn encode(&self) -> i64 {
        self.year as i64 * 100 + self.month as i64
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Parses `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
        Ok(Self::of(date))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Whether `tx` contributes to `month`.
///
/// The month must sit inside `[start_date, end_date]` by year-month, and no
/// excluded date may fall in that exact year-month. One-off transactions have
/// `start_date == end_date`, so the same rule covers them.
pub fn is_active_in_month(tx: &Transaction, month: YearMonth) -> bool {
    let queried = month.encode();
    let start = YearMonth::of(tx.start_date).encode();
    let end = YearMonth::of(tx.end_date).encode();
    if queried < start || queried > end {
        return false;
    }
    !tx.excluded_dates.iter().any(|d| month.contains(*d))
}
