// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::fx::convert;
use crate::engine::recurrence::YearMonth;
use crate::errors::{BudgetError, BudgetResult};
use crate::models::{Payment, RateSnapshot, Transaction};
use rust_decimal::Decimal;
use tracing::warn;

/// The payment settling `tx` in `month`, if any.
///
/// Duplicates resolve to the most recently modified record (then highest id)
/// so that repeated aggregation never sums them.
pub fn resolve_payment<'a>(
    tx: &Transaction,
    month: YearMonth,
    payments: &'a [Payment],
) -> Option<&'a Payment> {
    let mut candidates = payments
        .iter()
        .filter(|p| p.transaction_id == tx.id && month.contains(p.date));
    let first = candidates.next()?;
    let mut count = 1;
    let mut chosen = first;
    for p in candidates {
        count += 1;
        if (p.updated_at, p.id) > (chosen.updated_at, chosen.id) {
            chosen = p;
        }
    }
    if count > 1 {
        warn!(
            transaction = tx.id,
            %month,
            candidates = count,
            chosen = chosen.id,
            "ambiguous payments for transaction; using the most recently modified"
        );
    }
    Some(chosen)
}

/// Rejects a settlement worth more than the transaction it pays.
///
/// `rates` is only consulted when the payment currency differs from the
/// transaction currency.
pub fn validate_settlement(
    tx: &Transaction,
    amount: Decimal,
    currency: &str,
    rates: Option<&RateSnapshot>,
) -> BudgetResult<()> {
    if amount < Decimal::ZERO {
        return Err(BudgetError::NegativeSettlement {
            transaction_id: tx.id,
            amount,
        });
    }
    let in_tx_ccy = if currency == tx.currency {
        amount
    } else {
        let rates = rates.ok_or(BudgetError::MissingRateSnapshot)?;
        convert(amount, currency, &tx.currency, rates)?
    };
    if in_tx_ccy > tx.amount {
        return Err(BudgetError::Overpayment {
            transaction_id: tx.id,
            paid: in_tx_ccy.round_dp(2),
            amount: tx.amount,
        });
    }
    Ok(())
}
