// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::aggregate::{
    CategorySummary, ExpenseLine, aggregate, checked_add, completion_rate,
};
use crate::engine::fx::convert;
use crate::engine::payments::resolve_payment;
use crate::engine::recurrence::{YearMonth, is_active_in_month};
use crate::errors::{BudgetError, BudgetResult};
use crate::models::{Category, EntryType, FlowKind, Payment, RateSnapshot, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Everything the dashboard reads, already loaded by the caller.
#[derive(Debug, Clone, Copy)]
pub struct BudgetInputs<'a> {
    pub transactions: &'a [Transaction],
    pub categories: &'a [Category],
    pub types: &'a [EntryType],
    pub payments: &'a [Payment],
    pub rates: Option<&'a RateSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainSummary {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub extra: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_completion_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub main: MainSummary,
    pub categories: Vec<CategorySummary>,
}

/// Resolves each transaction's category and flow direction.
fn classify<'a>(
    inputs: &BudgetInputs<'a>,
    tx: &Transaction,
) -> BudgetResult<(&'a Category, Option<FlowKind>)> {
    let category = inputs
        .categories
        .iter()
        .find(|c| c.id == tx.category_id)
        .ok_or(BudgetError::UnknownCategory {
            transaction_id: tx.id,
            category_id: tx.category_id,
        })?;
    let kind = inputs
        .types
        .iter()
        .find(|t| t.id == category.type_id)
        .ok_or(BudgetError::UnknownType {
            category_id: category.id,
            type_id: category.type_id,
        })?
        .kind();
    Ok((category, kind))
}

fn difference(budget: Decimal, spent: Decimal) -> BudgetResult<Decimal> {
    budget.checked_sub(spent).ok_or(BudgetError::AmountOverflow {
        operation: "computing the balance",
    })
}

pub fn summarize(
    inputs: &BudgetInputs<'_>,
    month: YearMonth,
    display_currency: &str,
) -> BudgetResult<Dashboard> {
    let rates = inputs.rates.ok_or(BudgetError::MissingRateSnapshot)?;
    let display_ccy = display_currency.trim().to_uppercase();

    let mut budget = Decimal::ZERO;
    let mut expenses: Vec<(&Transaction, &Category)> = Vec::new();

    for tx in inputs.transactions {
        if !is_active_in_month(tx, month) {
            continue;
        }
        if tx.amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount {
                transaction_id: tx.id,
                amount: tx.amount,
            });
        }
        let (category, kind) = classify(inputs, tx)?;
        match kind {
            Some(FlowKind::Income) => {
                let income = convert(tx.amount, &tx.currency, &display_ccy, rates)?;
                budget = checked_add(budget, income, "totalling income")?;
            }
            Some(FlowKind::Expense) => expenses.push((tx, category)),
            None => debug!(
                transaction = tx.id,
                category = category.id,
                "skipping transaction whose type is neither income nor expense"
            ),
        }
    }

    expenses.sort_by(|a, b| a.0.name.cmp(&b.0.name).then(a.0.id.cmp(&b.0.id)));

    let mut lines = Vec::with_capacity(expenses.len());
    for (tx, category) in expenses {
        let payment = resolve_payment(tx, month, inputs.payments);
        let paid_amount = match payment {
            Some(p) if p.amount < Decimal::ZERO => {
                return Err(BudgetError::NegativePayment {
                    payment_id: p.id,
                    amount: p.amount,
                });
            }
            Some(p) => convert(p.amount, &p.currency, &display_ccy, rates)?,
            None => Decimal::ZERO,
        };
        lines.push(ExpenseLine {
            category_id: category.id,
            category_name: category.name.clone(),
            category_icon: category.icon.clone(),
            transaction_id: tx.id,
            payment_id: payment.map(|p| p.id),
            name: tx.name.clone(),
            amount: convert(tx.amount, &tx.currency, &display_ccy, rates)?,
            paid_amount,
        });
    }

    let mut total_amount = Decimal::ZERO;
    let mut total_paid_amount = Decimal::ZERO;
    for line in &lines {
        total_amount = checked_add(total_amount, line.amount, "totalling expenses")?;
        total_paid_amount = checked_add(total_paid_amount, line.paid_amount, "totalling payments")?;
    }
    let categories = aggregate(&lines)?;

    debug!(
        %month,
        currency = %display_ccy,
        %budget,
        expense_lines = lines.len(),
        "dashboard summarized"
    );

    Ok(Dashboard {
        main: MainSummary {
            currency: display_ccy,
            budget,
            total_amount,
            total_paid_amount,
            balance: difference(budget, total_paid_amount)?,
            extra: difference(budget, total_amount)?,
            payment_completion_rate: completion_rate(total_paid_amount, total_amount)?,
        },
        categories,
    })
}
