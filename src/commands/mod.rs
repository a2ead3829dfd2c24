// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod currencies;
pub mod types;
pub mod categories;
pub mod transactions;
pub mod payments;
pub mod fx;
pub mod dashboard;
pub mod exporter;
pub mod doctor;
