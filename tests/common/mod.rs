// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use walletwise::db;
use walletwise::ledger::Ledger;
use walletwise::models::{NewIncome, NewMeal, NewPurchase, WalletType};
use walletwise::store;

pub fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn ledger() -> Ledger {
    Ledger::new(db::open_in_memory().unwrap(), "alice")
}

pub fn wallet(l: &mut Ledger, name: &str, kind: WalletType, balance: &str) -> i64 {
    l.add_wallet(name, kind, d(balance)).unwrap()
}

pub fn balance(l: &Ledger, id: i64) -> Decimal {
    store::get_wallet(l.conn(), l.owner(), id)
        .unwrap()
        .unwrap()
        .balance
}

pub fn income(wallet_id: i64, amount: &str, on: &str) -> NewIncome {
    NewIncome {
        wallet_id,
        date: day(on),
        amount: d(amount),
        source: "Salary".into(),
    }
}

pub fn meal(wallet_id: i64, amount: &str, on: &str) -> NewMeal {
    NewMeal {
        wallet_id,
        date: day(on),
        amount: d(amount),
        meal_type: "Lunch".into(),
        item: "Thali".into(),
    }
}

pub fn purchase(wallet_id: i64, amount: &str, category: &str, on: &str) -> NewPurchase {
    NewPurchase {
        wallet_id,
        date: day(on),
        amount: d(amount),
        category: category.into(),
        item: "Notebook".into(),
    }
}
