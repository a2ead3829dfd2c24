// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly budget resolution: recurrence matching, currency conversion,
//! payment lookup and per-category aggregation. Nothing in here touches the
//! database; callers load the inputs first.

pub mod aggregate;
pub mod fx;
pub mod payments;
pub mod recurrence;
pub mod summary;

pub use aggregate::{CategorySummary, LineItem, aggregate, completion_rate};
pub use fx::convert;
pub use payments::{resolve_payment, validate_settlement};
pub use recurrence::{YearMonth, is_active_in_month};
pub use summary::{BudgetInputs, Dashboard, MainSummary, summarize};
