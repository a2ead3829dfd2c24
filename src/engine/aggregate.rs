// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-category folding of resolved expense lines.
//!
//! Lines are folded into one accumulator per category id. Independent slices
//! can be folded separately and combined with [`merge_partitions`], which
//! gives the same result as folding everything at once.

use crate::errors::{BudgetError, BudgetResult};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// An active expense already converted into the display currency.
#[derive(Debug, Clone)]
pub struct ExpenseLine {
    pub category_id: i64,
    pub category_name: String,
    pub category_icon: Option<String>,
    pub transaction_id: i64,
    pub payment_id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub paid_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_completion_rate: Decimal,
    pub transactions: Vec<LineItem>,
}

/// `paid / total`, or zero when nothing is budgeted.
pub fn completion_rate(paid: Decimal, total: Decimal) -> BudgetResult<Decimal> {
    if total.is_zero() {
        return Ok(Decimal::ZERO);
    }
    paid.checked_div(total).ok_or(BudgetError::AmountOverflow {
        operation: "computing a completion rate",
    })
}

pub(crate) fn checked_add(
    left: Decimal,
    right: Decimal,
    operation: &'static str,
) -> BudgetResult<Decimal> {
    left.checked_add(right).ok_or(BudgetError::AmountOverflow { operation })
}

#[derive(Debug, Clone)]
pub struct CategoryAccumulator {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub total_amount: Decimal,
    pub total_paid_amount: Decimal,
    pub payment_completion_rate: Decimal,
    pub items: Vec<LineItem>,
}

impl CategoryAccumulator {
    pub fn new(id: i64, name: &str, icon: Option<&str>) -> Self {
        Self {
            id,
            name: name.to_string(),
            icon: icon.map(str::to_string),
            total_amount: Decimal::ZERO,
            total_paid_amount: Decimal::ZERO,
            payment_completion_rate: Decimal::ZERO,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, line: &ExpenseLine) -> BudgetResult<()> {
        self.total_amount = checked_add(self.total_amount, line.amount, "totalling a category")?;
        self.total_paid_amount =
            checked_add(self.total_paid_amount, line.paid_amount, "totalling a category")?;
        self.payment_completion_rate =
            completion_rate(self.total_paid_amount, self.total_amount)?;
        self.items.push(LineItem {
            id: line.transaction_id.to_string(),
            payment_id: line.payment_id.map(|p| p.to_string()),
            name: line.name.clone(),
            amount: line.amount,
            paid_amount: line.paid_amount,
        });
        Ok(())
    }

    /// Appends `other`'s lines after this accumulator's own.
    pub fn merge(mut self, other: CategoryAccumulator) -> BudgetResult<Self> {
        self.total_amount =
            checked_add(self.total_amount, other.total_amount, "merging categories")?;
        self.total_paid_amount =
            checked_add(self.total_paid_amount, other.total_paid_amount, "merging categories")?;
        self.payment_completion_rate =
            completion_rate(self.total_paid_amount, self.total_amount)?;
        self.items.extend(other.items);
        Ok(self)
    }

    pub fn into_summary(self) -> CategorySummary {
        CategorySummary {
            id: self.id.to_string(),
            name: self.name,
            icon: self.icon,
            total_amount: self.total_amount,
            total_paid_amount: self.total_paid_amount,
            payment_completion_rate: self.payment_completion_rate,
            transactions: self.items,
        }
    }
}

pub type Partition = BTreeMap<i64, CategoryAccumulator>;

pub fn fold_partition(lines: &[ExpenseLine]) -> BudgetResult<Partition> {
    lines.iter().try_fold(Partition::new(), |mut acc, line| -> BudgetResult<Partition> {
        acc.entry(line.category_id)
            .or_insert_with(|| {
                CategoryAccumulator::new(
                    line.category_id,
                    &line.category_name,
                    line.category_icon.as_deref(),
                )
            })
            .push(line)?;
        Ok(acc)
    })
}

/// Combines partitions in the order given; line order inside a category
/// follows partition order.
pub fn merge_partitions<I>(parts: I) -> BudgetResult<Partition>
where
    I: IntoIterator<Item = Partition>,
{
    let mut out = Partition::new();
    for part in parts {
        for (id, acc) in part {
            let merged = match out.remove(&id) {
                Some(existing) => existing.merge(acc)?,
                None => acc,
            };
            out.insert(id, merged);
        }
    }
    Ok(out)
}

/// Orders categories by name (then id) for output.
pub fn finish(partition: Partition) -> Vec<CategorySummary> {
    let mut accs: Vec<CategoryAccumulator> = partition.into_values().collect();
    accs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    accs.into_iter().map(CategoryAccumulator::into_summary).collect()
}

pub fn aggregate(lines: &[ExpenseLine]) -> BudgetResult<Vec<CategorySummary>> {
    Ok(finish(fold_partition(lines)?))
}
