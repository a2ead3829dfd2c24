// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{BudgetError, BudgetResult};
use crate::models::RateSnapshot;
use rust_decimal::Decimal;

/// Units of `code` per one unit of the snapshot's base.
pub fn rate_for(rates: &RateSnapshot, code: &str) -> BudgetResult<Decimal> {
    let rate = match rates.rates.get(code) {
        Some(r) => *r,
        None if code == rates.base => Decimal::ONE,
        None => {
            return Err(BudgetError::UnknownCurrencyRate {
                code: code.to_string(),
                base: rates.base.clone(),
            });
        }
    };
    if rate <= Decimal::ZERO {
        return Err(BudgetError::InvalidRate {
            code: code.to_string(),
            rate,
        });
    }
    Ok(rate)
}

fn mul(value: Decimal, rate: Decimal) -> BudgetResult<Decimal> {
    value.checked_mul(rate).ok_or(BudgetError::AmountOverflow {
        operation: "converting from the base currency",
    })
}

fn div(value: Decimal, rate: Decimal) -> BudgetResult<Decimal> {
    value.checked_div(rate).ok_or(BudgetError::AmountOverflow {
        operation: "converting to the base currency",
    })
}

/// Convert `value` from `from` to `to` through the snapshot's base currency.
pub fn convert(value: Decimal, from: &str, to: &str, rates: &RateSnapshot) -> BudgetResult<Decimal> {
    if from == to {
        return Ok(value);
    }
    let hub = rates.base.as_str();
    if from == hub {
        return mul(value, rate_for(rates, to)?);
    }
    if to == hub {
        return div(value, rate_for(rates, from)?);
    }
    let in_base = div(value, rate_for(rates, from)?)?;
    mul(in_base, rate_for(rates, to)?)
}
