// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures raised while resolving and aggregating a monthly budget.
///
/// Every variant aborts the request that produced it; the dashboard fails
/// closed instead of returning partial figures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    #[error("No exchange-rate snapshot available; add or import one with `fx`")]
    MissingRateSnapshot,
    #[error("No rate for '{code}' in the {base} snapshot")]
    UnknownCurrencyRate { code: String, base: String },
    #[error("Rate for '{code}' must be positive, got {rate}")]
    InvalidRate { code: String, rate: Decimal },
    #[error("Transaction {transaction_id} references unknown category {category_id}")]
    UnknownCategory { transaction_id: i64, category_id: i64 },
    #[error("Category {category_id} references unknown type {type_id}")]
    UnknownType { category_id: i64, type_id: i64 },
    #[error("Transaction {transaction_id} has negative amount {amount}")]
    NegativeAmount { transaction_id: i64, amount: Decimal },
    #[error("Payment {payment_id} has negative amount {amount}")]
    NegativePayment { payment_id: i64, amount: Decimal },
    #[error("Payment for transaction {transaction_id} cannot be negative, got {amount}")]
    NegativeSettlement { transaction_id: i64, amount: Decimal },
    #[error("Payment of {paid} exceeds transaction {transaction_id} amount {amount}")]
    Overpayment {
        transaction_id: i64,
        paid: Decimal,
        amount: Decimal,
    },
    #[error("Amount overflow while {operation}")]
    AmountOverflow { operation: &'static str },
    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

pub type BudgetResult<T> = Result<T, BudgetError>;
