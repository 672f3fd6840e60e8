// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Finance write path. Every public operation is one store unit: the record
//! write and its wallet/goal compensation commit together or not at all,
//! and each create has a delete that is its exact inverse.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use tracing::warn;

use super::Ledger;
use super::feed::Collection;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, Income, NewGoalDeposit, NewIncome, NewMeal, NewPurchase, NewRecord, NewTransfer,
    RecordKind, WalletType,
};
use crate::store::{self, budget_label};

/// Categories created for an owner that has none.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str, &str); 6] = [
    ("Food", "Food & Meals", "🍲", "#3b82f6"),
    ("Groceries", "Groceries", "🛒", "#10b981"),
    ("Travel", "Travel & Transport", "🚌", "#f59e0b"),
    ("Medicine", "Health & Medicine", "💊", "#ef4444"),
    ("Stationery", "Education & Stationery", "📚", "#8b5cf6"),
    ("Other", "Miscellaneous", "📦", "#64748b"),
];

fn require_positive(what: &'static str, amount: Decimal) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount { what, amount });
    }
    Ok(())
}

fn require_non_negative(what: &'static str, amount: Decimal) -> LedgerResult<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount { what, amount });
    }
    Ok(())
}

fn require_text(what: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn require_wallet(conn: &Connection, owner: &str, id: i64) -> LedgerResult<WalletType> {
    store::get_wallet(conn, owner, id)?
        .map(|w| w.r#type)
        .ok_or(LedgerError::WalletNotFound(id))
}

/// Balance change an income applies to its wallet. On a liability wallet
/// income settles debt, so the stored balance goes down.
pub fn income_delta(kind: WalletType, amount: Decimal) -> Decimal {
    match kind {
        WalletType::Asset => amount,
        WalletType::Liability => -amount,
    }
}

/// Applies a compensation to a wallet that may have been deleted since the
/// record was written. A missing wallet is tolerated and logged.
fn compensate_wallet(conn: &Connection, owner: &str, wallet_id: i64, delta: Decimal) -> LedgerResult<()> {
    if store::apply_wallet_delta(conn, owner, wallet_id, delta)?.is_none() {
        warn!(wallet_id, %delta, "wallet gone, skipping balance compensation");
    }
    Ok(())
}

fn compensate_goal(conn: &Connection, owner: &str, goal_id: i64, delta: Decimal) -> LedgerResult<()> {
    if store::apply_goal_delta(conn, owner, goal_id, delta)?.is_none() {
        warn!(goal_id, %delta, "goal gone, skipping saved amount compensation");
    }
    Ok(())
}

fn validate_record(new: &NewRecord) -> LedgerResult<()> {
    match new {
        NewRecord::Meal(m) => require_non_negative("meal", m.amount),
        NewRecord::Purchase(p) => require_non_negative("purchase", p.amount),
        NewRecord::Income(i) => require_positive("income", i.amount),
    }
}

fn collection_of(kind: RecordKind) -> Collection {
    match kind {
        RecordKind::Meal => Collection::Meals,
        RecordKind::Purchase => Collection::Purchases,
        RecordKind::Income => Collection::Incomes,
    }
}

// Unit bodies. These assume validation of the payload already happened and
// run inside the caller's transaction.

fn insert_meal(conn: &Connection, owner: &str, m: &NewMeal) -> LedgerResult<i64> {
    require_wallet(conn, owner, m.wallet_id)?;
    conn.execute(
        "INSERT INTO meals(owner_id, wallet_id, date, amount, meal_type, item)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![owner, m.wallet_id, m.date, m.amount.to_string(), m.meal_type, m.item],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_purchase(conn: &Connection, owner: &str, p: &NewPurchase) -> LedgerResult<i64> {
    require_wallet(conn, owner, p.wallet_id)?;
    conn.execute(
        "INSERT INTO purchases(owner_id, wallet_id, date, amount, category, item)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![owner, p.wallet_id, p.date, p.amount.to_string(), p.category, p.item],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_income(conn: &Connection, owner: &str, i: &NewIncome) -> LedgerResult<i64> {
    let kind = require_wallet(conn, owner, i.wallet_id)?;
    conn.execute(
        "INSERT INTO incomes(owner_id, wallet_id, date, amount, source)
         VALUES (?1,?2,?3,?4,?5)",
        params![owner, i.wallet_id, i.date, i.amount.to_string(), i.source],
    )?;
    let id = conn.last_insert_rowid();
    store::apply_wallet_delta(conn, owner, i.wallet_id, income_delta(kind, i.amount))?;
    Ok(id)
}

fn insert_record(conn: &Connection, owner: &str, new: &NewRecord) -> LedgerResult<i64> {
    match new {
        NewRecord::Meal(m) => insert_meal(conn, owner, m),
        NewRecord::Purchase(p) => insert_purchase(conn, owner, p),
        NewRecord::Income(i) => insert_income(conn, owner, i),
    }
}

fn delete_row(conn: &Connection, table: &'static str, kind: &'static str, owner: &str, id: i64) -> LedgerResult<()> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE id=?1 AND owner_id=?2", table),
        params![id, owner],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found(kind, id));
    }
    Ok(())
}

fn remove_income(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Income> {
    let income = store::get_income(conn, owner, id)?
        .ok_or_else(|| LedgerError::not_found("income", id))?;
    delete_row(conn, "incomes", "income", owner, id)?;
    reverse_income(conn, owner, &income)?;
    Ok(income)
}

/// Takes a stored income's delta back out of its wallet. The sign depends
/// on the wallet's type, so a missing wallet is skipped and logged.
fn reverse_income(conn: &Connection, owner: &str, income: &Income) -> LedgerResult<()> {
    match store::get_wallet(conn, owner, income.wallet_id)? {
        Some(w) => compensate_wallet(conn, owner, w.id, -income_delta(w.r#type, income.amount)),
        None => {
            warn!(
                income = income.id,
                wallet_id = income.wallet_id,
                "wallet gone, skipping income reversal"
            );
            Ok(())
        }
    }
}

fn remove_record(conn: &Connection, owner: &str, kind: RecordKind, id: i64) -> LedgerResult<()> {
    match kind {
        RecordKind::Meal => delete_row(conn, "meals", "meal", owner, id),
        RecordKind::Purchase => delete_row(conn, "purchases", "purchase", owner, id),
        RecordKind::Income => remove_income(conn, owner, id).map(|_| ()),
    }
}

impl Ledger {
    // Wallets

    pub fn add_wallet(&mut self, name: &str, kind: WalletType, balance: Decimal) -> LedgerResult<i64> {
        require_text("wallet name", name)?;
        let name = name.trim().to_string();
        self.unit("add_wallet", &[Collection::Wallets], |tx, owner| {
            tx.execute(
                "INSERT INTO wallets(owner_id, name, type, balance, opening_balance)
                 VALUES (?1,?2,?3,?4,?4)",
                params![owner, name, kind.as_str(), balance.to_string()],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    pub fn rename_wallet(&mut self, id: i64, name: &str) -> LedgerResult<()> {
        require_text("wallet name", name)?;
        let name = name.trim().to_string();
        self.unit("rename_wallet", &[Collection::Wallets], |tx, owner| {
            let n = tx.execute(
                "UPDATE wallets SET name=?1 WHERE id=?2 AND owner_id=?3",
                params![name, id, owner],
            )?;
            if n == 0 {
                return Err(LedgerError::WalletNotFound(id));
            }
            Ok(())
        })
    }

    /// Removes the wallet document only. Records that point at it stay and
    /// keep counting toward global spend.
    pub fn delete_wallet(&mut self, id: i64) -> LedgerResult<()> {
        self.unit("delete_wallet", &[Collection::Wallets], |tx, owner| {
            delete_row(tx, "wallets", "wallet", owner, id)
        })
    }

    // Expenses

    pub fn add_meal(&mut self, meal: NewMeal) -> LedgerResult<i64> {
        require_non_negative("meal", meal.amount)?;
        self.unit("add_meal", &[Collection::Meals], |tx, owner| insert_meal(tx, owner, &meal))
    }

    pub fn update_meal(&mut self, id: i64, meal: NewMeal) -> LedgerResult<()> {
        require_non_negative("meal", meal.amount)?;
        self.unit("update_meal", &[Collection::Meals], |tx, owner| {
            require_wallet(tx, owner, meal.wallet_id)?;
            let n = tx.execute(
                "UPDATE meals SET wallet_id=?1, date=?2, amount=?3, meal_type=?4, item=?5
                 WHERE id=?6 AND owner_id=?7",
                params![
                    meal.wallet_id,
                    meal.date,
                    meal.amount.to_string(),
                    meal.meal_type,
                    meal.item,
                    id,
                    owner
                ],
            )?;
            if n == 0 {
                return Err(LedgerError::not_found("meal", id));
            }
            Ok(())
        })
    }

    pub fn delete_meal(&mut self, id: i64) -> LedgerResult<()> {
        self.unit("delete_meal", &[Collection::Meals], |tx, owner| {
            delete_row(tx, "meals", "meal", owner, id)
        })
    }

    pub fn add_purchase(&mut self, purchase: NewPurchase) -> LedgerResult<i64> {
        require_non_negative("purchase", purchase.amount)?;
        self.unit("add_purchase", &[Collection::Purchases], |tx, owner| {
            insert_purchase(tx, owner, &purchase)
        })
    }

    pub fn update_purchase(&mut self, id: i64, purchase: NewPurchase) -> LedgerResult<()> {
        require_non_negative("purchase", purchase.amount)?;
        self.unit("update_purchase", &[Collection::Purchases], |tx, owner| {
            require_wallet(tx, owner, purchase.wallet_id)?;
            let n = tx.execute(
                "UPDATE purchases SET wallet_id=?1, date=?2, amount=?3, category=?4, item=?5
                 WHERE id=?6 AND owner_id=?7",
                params![
                    purchase.wallet_id,
                    purchase.date,
                    purchase.amount.to_string(),
                    purchase.category,
                    purchase.item,
                    id,
                    owner
                ],
            )?;
            if n == 0 {
                return Err(LedgerError::not_found("purchase", id));
            }
            Ok(())
        })
    }

    pub fn delete_purchase(&mut self, id: i64) -> LedgerResult<()> {
        self.unit("delete_purchase", &[Collection::Purchases], |tx, owner| {
            delete_row(tx, "purchases", "purchase", owner, id)
        })
    }

    // Incomes

    pub fn add_income(&mut self, income: NewIncome) -> LedgerResult<i64> {
        require_positive("income", income.amount)?;
        self.unit(
            "add_income",
            &[Collection::Incomes, Collection::Wallets],
            |tx, owner| insert_income(tx, owner, &income),
        )
    }

    /// Rewrites an income in place: the old delta is reversed on the old
    /// wallet and the new one applied to the (possibly different) new wallet.
    pub fn update_income(&mut self, id: i64, income: NewIncome) -> LedgerResult<()> {
        require_positive("income", income.amount)?;
        self.unit(
            "update_income",
            &[Collection::Incomes, Collection::Wallets],
            |tx, owner| {
                let new_kind = require_wallet(tx, owner, income.wallet_id)?;
                let old = store::get_income(tx, owner, id)?
                    .ok_or_else(|| LedgerError::not_found("income", id))?;
                reverse_income(tx, owner, &old)?;
                tx.execute(
                    "UPDATE incomes SET wallet_id=?1, date=?2, amount=?3, source=?4
                     WHERE id=?5 AND owner_id=?6",
                    params![
                        income.wallet_id,
                        income.date,
                        income.amount.to_string(),
                        income.source,
                        id,
                        owner
                    ],
                )?;
                store::apply_wallet_delta(
                    tx,
                    owner,
                    income.wallet_id,
                    income_delta(new_kind, income.amount),
                )?;
                Ok(())
            },
        )
    }

    pub fn delete_income(&mut self, id: i64) -> LedgerResult<Income> {
        self.unit(
            "delete_income",
            &[Collection::Incomes, Collection::Wallets],
            |tx, owner| remove_income(tx, owner, id),
        )
    }

    // Transfers

    pub fn add_transfer(&mut self, transfer: NewTransfer) -> LedgerResult<i64> {
        if transfer.source_id == transfer.dest_id {
            return Err(LedgerError::SameWallet(transfer.source_id));
        }
        require_positive("transfer", transfer.amount)?;
        self.unit(
            "add_transfer",
            &[Collection::Transfers, Collection::Wallets],
            |tx, owner| {
                require_wallet(tx, owner, transfer.source_id)?;
                require_wallet(tx, owner, transfer.dest_id)?;
                store::apply_wallet_delta(tx, owner, transfer.source_id, -transfer.amount)?;
                store::apply_wallet_delta(tx, owner, transfer.dest_id, transfer.amount)?;
                tx.execute(
                    "INSERT INTO transfers(owner_id, source_id, dest_id, amount, date)
                     VALUES (?1,?2,?3,?4,?5)",
                    params![
                        owner,
                        transfer.source_id,
                        transfer.dest_id,
                        transfer.amount.to_string(),
                        transfer.date
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            },
        )
    }

    pub fn delete_transfer(&mut self, id: i64) -> LedgerResult<()> {
        self.unit(
            "delete_transfer",
            &[Collection::Transfers, Collection::Wallets],
            |tx, owner| {
                let t = store::get_transfer(tx, owner, id)?
                    .ok_or_else(|| LedgerError::not_found("transfer", id))?;
                delete_row(tx, "transfers", "transfer", owner, id)?;
                compensate_wallet(tx, owner, t.source_id, t.amount)?;
                compensate_wallet(tx, owner, t.dest_id, -t.amount)?;
                Ok(())
            },
        )
    }

    // Goals

    pub fn add_goal(&mut self, name: &str, target: Decimal, saved: Decimal) -> LedgerResult<i64> {
        require_text("goal name", name)?;
        require_positive("goal target", target)?;
        require_non_negative("goal saved amount", saved)?;
        let name = name.trim().to_string();
        self.unit("add_goal", &[Collection::Goals], |tx, owner| {
            tx.execute(
                "INSERT INTO goals(owner_id, name, target_amount, saved_amount, opening_saved)
                 VALUES (?1,?2,?3,?4,?4)",
                params![owner, name, target.to_string(), saved.to_string()],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Renames or retargets a goal. The saved amount is owned by deposits
    /// and cannot be edited here.
    pub fn update_goal(&mut self, id: i64, name: &str, target: Decimal) -> LedgerResult<()> {
        require_text("goal name", name)?;
        require_positive("goal target", target)?;
        let name = name.trim().to_string();
        self.unit("update_goal", &[Collection::Goals], |tx, owner| {
            let n = tx.execute(
                "UPDATE goals SET name=?1, target_amount=?2 WHERE id=?3 AND owner_id=?4",
                params![name, target.to_string(), id, owner],
            )?;
            if n == 0 {
                return Err(LedgerError::GoalNotFound(id));
            }
            Ok(())
        })
    }

    pub fn delete_goal(&mut self, id: i64) -> LedgerResult<()> {
        self.unit("delete_goal", &[Collection::Goals], |tx, owner| {
            delete_row(tx, "goals", "goal", owner, id)
        })
    }

    pub fn deposit_to_goal(&mut self, deposit: NewGoalDeposit) -> LedgerResult<i64> {
        require_positive("goal deposit", deposit.amount)?;
        self.unit(
            "deposit_to_goal",
            &[Collection::GoalDeposits, Collection::Goals, Collection::Wallets],
            |tx, owner| {
                if store::get_goal(tx, owner, deposit.goal_id)?.is_none() {
                    return Err(LedgerError::GoalNotFound(deposit.goal_id));
                }
                require_wallet(tx, owner, deposit.wallet_id)?;
                tx.execute(
                    "INSERT INTO goal_deposits(owner_id, goal_id, wallet_id, amount, date)
                     VALUES (?1,?2,?3,?4,?5)",
                    params![
                        owner,
                        deposit.goal_id,
                        deposit.wallet_id,
                        deposit.amount.to_string(),
                        deposit.date
                    ],
                )?;
                let id = tx.last_insert_rowid();
                store::apply_goal_delta(tx, owner, deposit.goal_id, deposit.amount)?;
                store::apply_wallet_delta(tx, owner, deposit.wallet_id, -deposit.amount)?;
                Ok(id)
            },
        )
    }

    pub fn delete_goal_deposit(&mut self, id: i64) -> LedgerResult<()> {
        self.unit(
            "delete_goal_deposit",
            &[Collection::GoalDeposits, Collection::Goals, Collection::Wallets],
            |tx, owner| {
                let dep = store::get_goal_deposit(tx, owner, id)?
                    .ok_or_else(|| LedgerError::not_found("goal deposit", id))?;
                delete_row(tx, "goal_deposits", "goal deposit", owner, id)?;
                compensate_wallet(tx, owner, dep.wallet_id, dep.amount)?;
                compensate_goal(tx, owner, dep.goal_id, -dep.amount)?;
                Ok(())
            },
        )
    }

    // Cross-kind edits

    /// Moves a record to another kind (or rewrites it within its kind).
    ///
    /// Across kinds the old record goes through its kind's delete and the
    /// new one through the new kind's create, inside one unit: if the create
    /// fails the delete is rolled back with it. Returns the id of the
    /// resulting record.
    pub fn reclassify(&mut self, kind: RecordKind, id: i64, new: NewRecord) -> LedgerResult<i64> {
        validate_record(&new)?;
        match (&new, kind) {
            (NewRecord::Meal(m), RecordKind::Meal) => return self.update_meal(id, m.clone()).map(|_| id),
            (NewRecord::Purchase(p), RecordKind::Purchase) => {
                return self.update_purchase(id, p.clone()).map(|_| id);
            }
            (NewRecord::Income(i), RecordKind::Income) => {
                return self.update_income(id, i.clone()).map(|_| id);
            }
            _ => {}
        }
        let mut touched = vec![collection_of(kind), collection_of(new.kind())];
        if kind == RecordKind::Income || new.kind() == RecordKind::Income {
            touched.push(Collection::Wallets);
        }
        self.unit("reclassify", &touched, |tx, owner| {
            remove_record(tx, owner, kind, id)?;
            insert_record(tx, owner, &new)
        })
    }

    // Categories and budgets

    pub fn add_category(&mut self, label: &str, icon: &str, color: &str) -> LedgerResult<Category> {
        require_text("category label", label)?;
        let id: String = label.split_whitespace().collect();
        let category = Category {
            id: id.clone(),
            owner_id: self.owner.clone(),
            label: label.trim().to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            is_default: false,
        };
        self.unit("add_category", &[Collection::Categories], |tx, owner| {
            upsert_category(tx, owner, &category)
        })?;
        Ok(category)
    }

    /// Creates the default categories when the owner has none yet. Returns
    /// how many were created.
    pub fn seed_default_categories(&mut self) -> LedgerResult<usize> {
        self.unit("seed_default_categories", &[Collection::Categories], |tx, owner| {
            if !store::list_categories(tx, owner)?.is_empty() {
                return Ok(0);
            }
            for (id, label, icon, color) in DEFAULT_CATEGORIES {
                upsert_category(
                    tx,
                    owner,
                    &Category {
                        id: id.to_string(),
                        owner_id: owner.to_string(),
                        label: label.to_string(),
                        icon: icon.to_string(),
                        color: color.to_string(),
                        is_default: true,
                    },
                )?;
            }
            Ok(DEFAULT_CATEGORIES.len())
        })
    }

    /// Deletes a category together with its budget.
    pub fn delete_category(&mut self, id: &str) -> LedgerResult<()> {
        self.unit(
            "delete_category",
            &[Collection::Categories, Collection::Budgets],
            |tx, owner| {
                let n = tx.execute(
                    "DELETE FROM categories WHERE owner_id=?1 AND id=?2",
                    params![owner, id],
                )?;
                if n == 0 {
                    return Err(LedgerError::not_found("category", id));
                }
                tx.execute(
                    "DELETE FROM budgets WHERE owner_id=?1 AND category_id=?2",
                    params![owner, id],
                )?;
                Ok(())
            },
        )
    }

    pub fn set_budget(&mut self, category_id: &str, limit: Decimal) -> LedgerResult<()> {
        require_non_negative("budget limit", limit)?;
        self.unit("set_budget", &[Collection::Budgets], |tx, owner| {
            if store::get_category(tx, owner, category_id)?.is_none() {
                return Err(LedgerError::Validation(format!(
                    "Unknown category '{}'",
                    category_id
                )));
            }
            tx.execute(
                "INSERT INTO budgets(id, owner_id, category_id, limit_amount) VALUES (?1,?2,?3,?4)
                 ON CONFLICT(owner_id, category_id) DO UPDATE SET limit_amount=excluded.limit_amount",
                params![
                    budget_label(owner, category_id),
                    owner,
                    category_id,
                    limit.to_string()
                ],
            )?;
            Ok(())
        })
    }

    pub fn delete_budget(&mut self, category_id: &str) -> LedgerResult<()> {
        self.unit("delete_budget", &[Collection::Budgets], |tx, owner| {
            let n = tx.execute(
                "DELETE FROM budgets WHERE owner_id=?1 AND category_id=?2",
                params![owner, category_id],
            )?;
            if n == 0 {
                return Err(LedgerError::not_found("budget", category_id));
            }
            Ok(())
        })
    }
}

fn upsert_category(conn: &Connection, owner: &str, c: &Category) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO categories(owner_id, id, label, icon, color, is_default)
         VALUES (?1,?2,?3,?4,?5,?6)
         ON CONFLICT(owner_id, id) DO UPDATE SET label=excluded.label, icon=excluded.icon, color=excluded.color",
        params![
            owner,
            c.id,
            c.label,
            c.icon,
            c.color,
            c.is_default
        ],
    )?;
    Ok(())
}
