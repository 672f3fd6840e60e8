// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod user;
pub mod wallets;
pub mod categories;
pub mod transactions;
pub mod transfers;
pub mod goals;
pub mod budgets;
pub mod planner;
pub mod gamify;
pub mod reports;
pub mod exporter;
pub mod doctor;
