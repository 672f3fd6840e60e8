// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::thread;

use common::*;
use walletwise::db;
use walletwise::ledger::Ledger;
use walletwise::models::{NewTransfer, WalletType};

#[test]
fn concurrent_incomes_never_lose_an_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");

    let mut setup = Ledger::new(db::open_at(&path).unwrap(), "alice");
    let w = wallet(&mut setup, "Shared", WalletType::Asset, "100");

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let mut l = Ledger::new(db::open_at(&path).unwrap(), "alice");
                for _ in 0..25 {
                    l.add_income(income(w, "1.10", "2025-07-01")).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(balance(&setup, w), d("155"));
    assert_eq!(setup.snapshot().unwrap().incomes.len(), 50);
}

#[test]
fn opposing_transfers_conserve_the_total() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");

    let mut setup = Ledger::new(db::open_at(&path).unwrap(), "alice");
    let a = wallet(&mut setup, "A", WalletType::Asset, "500");
    let b = wallet(&mut setup, "B", WalletType::Asset, "500");

    let handles: Vec<_> = [(a, b), (b, a)]
        .into_iter()
        .map(|(from, to)| {
            let path = path.clone();
            thread::spawn(move || {
                let mut l = Ledger::new(db::open_at(&path).unwrap(), "alice");
                for _ in 0..20 {
                    l.add_transfer(NewTransfer {
                        source_id: from,
                        dest_id: to,
                        amount: d("3"),
                        date: day("2025-07-01"),
                    })
                    .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(balance(&setup, a), d("500"));
    assert_eq!(balance(&setup, b), d("500"));
    assert_eq!(setup.snapshot().unwrap().transfers.len(), 40);
}
