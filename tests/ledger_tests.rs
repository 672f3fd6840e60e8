// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use rust_decimal::Decimal;
use walletwise::db;
use walletwise::error::LedgerError;
use walletwise::ledger::{Ledger, aggregator};
use walletwise::models::{NewGoalDeposit, NewRecord, NewTransfer, RecordKind, WalletType};
use walletwise::store;

#[test]
fn income_purchase_scenario() {
    let mut l = ledger();
    let w = wallet(&mut l, "Cash", WalletType::Asset, "1000");

    let inc = l.add_income(income(w, "200", "2025-03-02")).unwrap();
    assert_eq!(balance(&l, w), d("1200"));

    l.add_purchase(purchase(w, "150", "Groceries", "2025-03-03"))
        .unwrap();
    let snap = l.snapshot().unwrap();
    let row = &aggregator::summarize(&snap.wallets, &snap.meals, &snap.purchases)[0];
    assert_eq!(row.wallet.balance, d("1200"));
    assert_eq!(row.spent, d("150"));
    assert_eq!(row.remaining, d("1050"));

    l.delete_income(inc).unwrap();
    let snap = l.snapshot().unwrap();
    let row = &aggregator::summarize(&snap.wallets, &snap.meals, &snap.purchases)[0];
    assert_eq!(row.wallet.balance, d("1000"));
    assert_eq!(row.remaining, d("850"));
}

#[test]
fn create_then_delete_restores_every_balance() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "500");
    let b = wallet(&mut l, "Cash", WalletType::Asset, "20.50");
    let goal = l.add_goal("Laptop", d("1000"), d("100")).unwrap();

    let i = l.add_income(income(a, "75.25", "2025-03-01")).unwrap();
    let t = l
        .add_transfer(NewTransfer {
            source_id: a,
            dest_id: b,
            amount: d("40"),
            date: day("2025-03-02"),
        })
        .unwrap();
    let dep = l
        .deposit_to_goal(NewGoalDeposit {
            goal_id: goal,
            wallet_id: b,
            amount: d("10"),
            date: day("2025-03-03"),
        })
        .unwrap();
    let m = l.add_meal(meal(a, "12", "2025-03-03")).unwrap();

    l.delete_goal_deposit(dep).unwrap();
    l.delete_transfer(t).unwrap();
    l.delete_income(i).unwrap();
    l.delete_meal(m).unwrap();

    assert_eq!(balance(&l, a), d("500"));
    assert_eq!(balance(&l, b), d("20.50"));
    let g = store::get_goal(l.conn(), l.owner(), goal).unwrap().unwrap();
    assert_eq!(g.saved_amount, d("100"));
}

#[test]
fn transfer_moves_exactly_amount() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "300");
    let b = wallet(&mut l, "Cash", WalletType::Asset, "0");
    let before = balance(&l, a) + balance(&l, b);
    l.add_transfer(NewTransfer {
        source_id: a,
        dest_id: b,
        amount: d("120.75"),
        date: day("2025-04-01"),
    })
    .unwrap();
    assert_eq!(balance(&l, a), d("179.25"));
    assert_eq!(balance(&l, b), d("120.75"));
    assert_eq!(balance(&l, a) + balance(&l, b), before);
}

#[test]
fn same_wallet_transfer_is_rejected_without_writes() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "300");
    let err = l
        .add_transfer(NewTransfer {
            source_id: a,
            dest_id: a,
            amount: d("10"),
            date: day("2025-04-01"),
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::SameWallet(id) if id == a));
    assert_eq!(balance(&l, a), d("300"));
    assert!(l.snapshot().unwrap().transfers.is_empty());
}

#[test]
fn income_on_liability_lowers_debt() {
    let mut l = ledger();
    let card = wallet(&mut l, "Credit card", WalletType::Liability, "400");
    let id = l.add_income(income(card, "150", "2025-05-01")).unwrap();
    assert_eq!(balance(&l, card), d("250"));
    l.delete_income(id).unwrap();
    assert_eq!(balance(&l, card), d("400"));
}

#[test]
fn update_income_moves_delta_between_wallets() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "100");
    let card = wallet(&mut l, "Card", WalletType::Liability, "100");
    let id = l.add_income(income(a, "50", "2025-05-01")).unwrap();
    l.update_income(id, income(card, "30", "2025-05-02")).unwrap();
    assert_eq!(balance(&l, a), d("100"));
    assert_eq!(balance(&l, card), d("70"));
}

#[test]
fn expenses_never_touch_stored_balance() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "100");
    let m = l.add_meal(meal(a, "30", "2025-05-01")).unwrap();
    l.update_meal(m, meal(a, "45", "2025-05-01")).unwrap();
    l.add_purchase(purchase(a, "10", "Other", "2025-05-01"))
        .unwrap();
    assert_eq!(balance(&l, a), d("100"));
}

#[test]
fn validation_happens_before_any_write() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "100");

    let err = l.add_income(income(a, "0", "2025-05-01")).unwrap_err();
    assert!(err.is_validation());
    let err = l.add_meal(meal(a, "-1", "2025-05-01")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    let err = l.add_income(income(999, "10", "2025-05-01")).unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotFound(999)));
    let err = l
        .deposit_to_goal(NewGoalDeposit {
            goal_id: 42,
            wallet_id: a,
            amount: d("5"),
            date: day("2025-05-01"),
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::GoalNotFound(42)));

    let snap = l.snapshot().unwrap();
    assert!(snap.incomes.is_empty() && snap.meals.is_empty() && snap.goal_deposits.is_empty());
    assert_eq!(balance(&l, a), d("100"));
}

#[test]
fn deleting_income_of_removed_wallet_skips_compensation() {
    let mut l = ledger();
    let a = wallet(&mut l, "Old", WalletType::Asset, "0");
    let id = l.add_income(income(a, "80", "2025-05-01")).unwrap();
    l.delete_wallet(a).unwrap();
    l.delete_income(id).unwrap();
    assert!(l.snapshot().unwrap().incomes.is_empty());
}

#[test]
fn reclassify_meal_to_income_compensates_once() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "100");
    let m = l.add_meal(meal(a, "25", "2025-06-01")).unwrap();
    let new_id = l
        .reclassify(
            RecordKind::Meal,
            m,
            NewRecord::Income(income(a, "25", "2025-06-01")),
        )
        .unwrap();
    let snap = l.snapshot().unwrap();
    assert!(snap.meals.is_empty());
    assert_eq!(snap.incomes.len(), 1);
    assert_eq!(snap.incomes[0].id, new_id);
    assert_eq!(balance(&l, a), d("125"));

    // And back again: the income's delta is reversed by the delete half.
    l.reclassify(
        RecordKind::Income,
        new_id,
        NewRecord::Purchase(purchase(a, "25", "Other", "2025-06-01")),
    )
    .unwrap();
    assert_eq!(balance(&l, a), d("100"));
    assert_eq!(l.snapshot().unwrap().purchases.len(), 1);
}

#[test]
fn reclassify_rolls_back_delete_when_create_fails() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "100");
    let inc = l.add_income(income(a, "40", "2025-06-01")).unwrap();

    // The create half targets a wallet that does not exist.
    let err = l
        .reclassify(
            RecordKind::Income,
            inc,
            NewRecord::Meal(meal(777, "40", "2025-06-01")),
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotFound(777)));

    let snap = l.snapshot().unwrap();
    assert_eq!(snap.incomes.len(), 1);
    assert_eq!(snap.incomes[0].id, inc);
    assert!(snap.meals.is_empty());
    assert_eq!(balance(&l, a), d("140"));
}

#[test]
fn reclassify_within_kind_is_an_update() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "0");
    let p = l
        .add_purchase(purchase(a, "9", "Stationery", "2025-06-01"))
        .unwrap();
    let id = l
        .reclassify(
            RecordKind::Purchase,
            p,
            NewRecord::Purchase(purchase(a, "11", "Other", "2025-06-02")),
        )
        .unwrap();
    assert_eq!(id, p);
    let got = store::get_purchase(l.conn(), l.owner(), p).unwrap().unwrap();
    assert_eq!(got.amount, d("11"));
    assert_eq!(got.category, "Other");
}

#[test]
fn deleting_category_removes_its_budget() {
    let mut l = ledger();
    assert_eq!(l.seed_default_categories().unwrap(), 6);
    assert_eq!(l.seed_default_categories().unwrap(), 0);
    l.set_budget("Travel", d("300")).unwrap();
    l.set_budget("Food", d("200")).unwrap();
    l.set_budget("Travel", d("350")).unwrap();
    assert_eq!(l.snapshot().unwrap().budgets.len(), 2);

    l.delete_category("Travel").unwrap();
    let snap = l.snapshot().unwrap();
    assert!(snap.categories.iter().all(|c| c.id != "Travel"));
    assert_eq!(snap.budgets.len(), 1);
    assert_eq!(snap.budgets[0].category_id, "Food");
}

#[test]
fn category_id_strips_whitespace() {
    let mut l = ledger();
    let c = l.add_category("Eating Out", "🍕", "#ff0000").unwrap();
    assert_eq!(c.id, "EatingOut");
    l.set_budget("EatingOut", d("50")).unwrap();
    assert!(l.set_budget("Nope", d("1")).unwrap_err().is_validation());
}

#[test]
fn owners_sharing_a_database_do_not_see_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite");
    let mut alice = Ledger::new(db::open_at(&path).unwrap(), "alice");
    let mut bob = Ledger::new(db::open_at(&path).unwrap(), "bob");

    let a = wallet(&mut alice, "Bank", WalletType::Asset, "10");
    assert!(bob.snapshot().unwrap().wallets.is_empty());
    // Bob cannot post against Alice's wallet id.
    let err = bob.add_income(income(a, "5", "2025-01-01")).unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotFound(_)));
    assert_eq!(balance(&alice, a), Decimal::from(10));
}

#[test]
fn underscore_owners_keep_separate_categories_and_budgets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite");
    let mut a = Ledger::new(db::open_at(&path).unwrap(), "a");
    let mut ab = Ledger::new(db::open_at(&path).unwrap(), "a_b");

    // "a" + "b_c" and "a_b" + "c" would share the joined label "a_b_c".
    a.add_category("b_c", "x", "#000000").unwrap();
    a.set_budget("b_c", d("40")).unwrap();
    ab.add_category("c", "y", "#111111").unwrap();
    ab.set_budget("c", d("15")).unwrap();

    let mine = a.snapshot().unwrap();
    assert_eq!(mine.categories.len(), 1);
    assert_eq!(mine.categories[0].label, "b_c");
    assert_eq!(mine.categories[0].icon, "x");
    assert_eq!(mine.budgets[0].limit, d("40"));
    let theirs = ab.snapshot().unwrap();
    assert_eq!(theirs.categories.len(), 1);
    assert_eq!(theirs.categories[0].id, "c");
    assert_eq!(theirs.budgets[0].limit, d("15"));

    ab.delete_budget("c").unwrap();
    ab.delete_category("c").unwrap();
    let mine = a.snapshot().unwrap();
    assert_eq!(mine.categories.len(), 1);
    assert_eq!(mine.budgets.len(), 1);
    assert_eq!(mine.budgets[0].limit, d("40"));

    // Another owner's category is simply not found.
    assert!(matches!(
        ab.delete_category("b_c").unwrap_err(),
        LedgerError::RecordNotFound { .. }
    ));
    assert!(matches!(
        ab.delete_budget("b_c").unwrap_err(),
        LedgerError::RecordNotFound { .. }
    ));
}

#[test]
fn balance_overflow_is_an_error_and_writes_nothing() {
    let mut l = ledger();
    let max = Decimal::MAX.to_string();
    let a = wallet(&mut l, "Vault", WalletType::Asset, &max);
    let b = wallet(&mut l, "Cash", WalletType::Asset, "10");

    let err = l.add_income(income(a, "1", "2025-07-01")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    assert!(l.snapshot().unwrap().incomes.is_empty());
    assert_eq!(balance(&l, a), Decimal::MAX);

    // The debit half lands before the overflowing credit; both roll back.
    let err = l
        .add_transfer(NewTransfer {
            source_id: b,
            dest_id: a,
            amount: d("5"),
            date: day("2025-07-01"),
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    assert_eq!(balance(&l, b), d("10"));
    assert!(l.snapshot().unwrap().transfers.is_empty());
}

#[test]
fn deleting_transfer_after_one_wallet_is_gone_restores_the_other() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "200");
    let b = wallet(&mut l, "Cash", WalletType::Asset, "5");
    let out = l
        .add_transfer(NewTransfer {
            source_id: a,
            dest_id: b,
            amount: d("60"),
            date: day("2025-07-02"),
        })
        .unwrap();
    let back = l
        .add_transfer(NewTransfer {
            source_id: b,
            dest_id: a,
            amount: d("25"),
            date: day("2025-07-03"),
        })
        .unwrap();

    l.delete_wallet(b).unwrap();
    l.delete_transfer(out).unwrap();
    assert_eq!(balance(&l, a), d("225"));
    l.delete_transfer(back).unwrap();
    assert_eq!(balance(&l, a), d("200"));
    assert!(l.snapshot().unwrap().transfers.is_empty());
}

#[test]
fn deleting_deposit_after_goal_is_gone_refunds_wallet() {
    let mut l = ledger();
    let a = wallet(&mut l, "Bank", WalletType::Asset, "300");
    let goal = l.add_goal("Bike", d("500"), d("0")).unwrap();
    let dep = l
        .deposit_to_goal(NewGoalDeposit {
            goal_id: goal,
            wallet_id: a,
            amount: d("120"),
            date: day("2025-07-04"),
        })
        .unwrap();
    assert_eq!(balance(&l, a), d("180"));

    l.delete_goal(goal).unwrap();
    l.delete_goal_deposit(dep).unwrap();
    assert_eq!(balance(&l, a), d("300"));
    assert!(l.snapshot().unwrap().goal_deposits.is_empty());
}

#[test]
fn update_income_from_removed_wallet_only_credits_the_new_one() {
    let mut l = ledger();
    let old = wallet(&mut l, "Old", WalletType::Asset, "0");
    let new = wallet(&mut l, "New", WalletType::Asset, "10");
    let id = l.add_income(income(old, "50", "2025-07-05")).unwrap();
    l.delete_wallet(old).unwrap();

    l.update_income(id, income(new, "30", "2025-07-06")).unwrap();
    assert_eq!(balance(&l, new), d("40"));
    let stored = store::get_income(l.conn(), l.owner(), id).unwrap().unwrap();
    assert_eq!(stored.wallet_id, new);
    assert_eq!(stored.amount, d("30"));
}
