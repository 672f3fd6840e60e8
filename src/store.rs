// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped reads over the record store and the two compensating
//! primitives (`apply_wallet_delta`, `apply_goal_delta`).
//!
//! Every function takes a plain `&Connection`, so it works the same on a
//! bare connection and inside a `rusqlite::Transaction`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Budget, Category, GamifyProfile, Goal, GoalDeposit, Habit, Income, Meal, Note, Priority,
    Purchase, Task, Transfer, Wallet, WalletType,
};

/// Parses a stored amount, counting malformed text as zero.
pub fn lenient_amount(raw: &str, table: &'static str, id: i64) -> Decimal {
    match raw.trim().parse::<Decimal>() {
        Ok(d) => d,
        Err(_) => {
            warn!(table, id, value = raw, "malformed amount, counting as 0");
            Decimal::ZERO
        }
    }
}

/// Parses a stored amount that is about to be written back. Unlike
/// [`lenient_amount`], a malformed value is an error here.
pub fn strict_amount(raw: &str, table: &'static str, column: &'static str) -> LedgerResult<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| LedgerError::Corrupt {
            table,
            column,
            value: raw.to_string(),
        })
}

fn conversion_err(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}

fn query_owned<T>(
    conn: &Connection,
    sql: &str,
    owner: &str,
    f: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> LedgerResult<Vec<T>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params![owner], f)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn query_one<T>(
    conn: &Connection,
    sql: &str,
    owner: &str,
    id: &dyn ToSql,
    f: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> LedgerResult<Option<T>> {
    let mut stmt = conn.prepare_cached(sql)?;
    Ok(stmt.query_row(params![owner, id], f).optional()?)
}

// Wallets

fn wallet_from_row(r: &Row<'_>) -> rusqlite::Result<Wallet> {
    let id: i64 = r.get(0)?;
    let kind: String = r.get(3)?;
    let balance: String = r.get(4)?;
    let opening: String = r.get(5)?;
    Ok(Wallet {
        id,
        owner_id: r.get(1)?,
        name: r.get(2)?,
        r#type: kind.parse::<WalletType>().map_err(|e| conversion_err(3, e))?,
        balance: lenient_amount(&balance, "wallets", id),
        opening_balance: lenient_amount(&opening, "wallets", id),
    })
}

pub fn list_wallets(conn: &Connection, owner: &str) -> LedgerResult<Vec<Wallet>> {
    query_owned(
        conn,
        "SELECT id, owner_id, name, type, balance, opening_balance FROM wallets
         WHERE owner_id=?1 ORDER BY id",
        owner,
        wallet_from_row,
    )
}

pub fn get_wallet(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Wallet>> {
    query_one(
        conn,
        "SELECT id, owner_id, name, type, balance, opening_balance FROM wallets
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        wallet_from_row,
    )
}

/// Adds `delta` to the wallet's stored balance and returns the new value,
/// or `None` when the wallet does not exist for this owner. A sum outside
/// the decimal range is an `InvalidAmount` and nothing is written.
pub fn apply_wallet_delta(
    conn: &Connection,
    owner: &str,
    wallet_id: i64,
    delta: Decimal,
) -> LedgerResult<Option<Decimal>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT balance FROM wallets WHERE id=?1 AND owner_id=?2",
            params![wallet_id, owner],
            |r| r.get(0),
        )
        .optional()?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let next = strict_amount(&raw, "wallets", "balance")?
        .checked_add(delta)
        .ok_or(LedgerError::InvalidAmount {
            what: "wallet balance",
            amount: delta,
        })?;
    conn.execute(
        "UPDATE wallets SET balance=?1 WHERE id=?2 AND owner_id=?3",
        params![next.to_string(), wallet_id, owner],
    )?;
    Ok(Some(next))
}

// Expense and income records

fn meal_from_row(r: &Row<'_>) -> rusqlite::Result<Meal> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(4)?;
    Ok(Meal {
        id,
        owner_id: r.get(1)?,
        wallet_id: r.get(2)?,
        date: r.get(3)?,
        amount: lenient_amount(&amount, "meals", id),
        meal_type: r.get(5)?,
        item: r.get(6)?,
    })
}

pub fn list_meals(conn: &Connection, owner: &str) -> LedgerResult<Vec<Meal>> {
    query_owned(
        conn,
        "SELECT id, owner_id, wallet_id, date, amount, meal_type, item FROM meals
         WHERE owner_id=?1 ORDER BY date DESC, id DESC",
        owner,
        meal_from_row,
    )
}

pub fn get_meal(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Meal>> {
    query_one(
        conn,
        "SELECT id, owner_id, wallet_id, date, amount, meal_type, item FROM meals
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        meal_from_row,
    )
}

fn purchase_from_row(r: &Row<'_>) -> rusqlite::Result<Purchase> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(4)?;
    Ok(Purchase {
        id,
        owner_id: r.get(1)?,
        wallet_id: r.get(2)?,
        date: r.get(3)?,
        amount: lenient_amount(&amount, "purchases", id),
        category: r.get(5)?,
        item: r.get(6)?,
    })
}

pub fn list_purchases(conn: &Connection, owner: &str) -> LedgerResult<Vec<Purchase>> {
    query_owned(
        conn,
        "SELECT id, owner_id, wallet_id, date, amount, category, item FROM purchases
         WHERE owner_id=?1 ORDER BY date DESC, id DESC",
        owner,
        purchase_from_row,
    )
}

pub fn get_purchase(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Purchase>> {
    query_one(
        conn,
        "SELECT id, owner_id, wallet_id, date, amount, category, item FROM purchases
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        purchase_from_row,
    )
}

fn income_from_row(r: &Row<'_>) -> rusqlite::Result<Income> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(4)?;
    Ok(Income {
        id,
        owner_id: r.get(1)?,
        wallet_id: r.get(2)?,
        date: r.get(3)?,
        amount: lenient_amount(&amount, "incomes", id),
        source: r.get(5)?,
    })
}

pub fn list_incomes(conn: &Connection, owner: &str) -> LedgerResult<Vec<Income>> {
    query_owned(
        conn,
        "SELECT id, owner_id, wallet_id, date, amount, source FROM incomes
         WHERE owner_id=?1 ORDER BY date DESC, id DESC",
        owner,
        income_from_row,
    )
}

pub fn get_income(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Income>> {
    query_one(
        conn,
        "SELECT id, owner_id, wallet_id, date, amount, source FROM incomes
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        income_from_row,
    )
}

fn transfer_from_row(r: &Row<'_>) -> rusqlite::Result<Transfer> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(4)?;
    Ok(Transfer {
        id,
        owner_id: r.get(1)?,
        source_id: r.get(2)?,
        dest_id: r.get(3)?,
        amount: lenient_amount(&amount, "transfers", id),
        date: r.get(5)?,
    })
}

pub fn list_transfers(conn: &Connection, owner: &str) -> LedgerResult<Vec<Transfer>> {
    query_owned(
        conn,
        "SELECT id, owner_id, source_id, dest_id, amount, date FROM transfers
         WHERE owner_id=?1 ORDER BY date DESC, id DESC",
        owner,
        transfer_from_row,
    )
}

pub fn get_transfer(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Transfer>> {
    query_one(
        conn,
        "SELECT id, owner_id, source_id, dest_id, amount, date FROM transfers
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        transfer_from_row,
    )
}

// Goals

fn goal_from_row(r: &Row<'_>) -> rusqlite::Result<Goal> {
    let id: i64 = r.get(0)?;
    let target: String = r.get(3)?;
    let saved: String = r.get(4)?;
    let opening: String = r.get(5)?;
    Ok(Goal {
        id,
        owner_id: r.get(1)?,
        name: r.get(2)?,
        target_amount: lenient_amount(&target, "goals", id),
        saved_amount: lenient_amount(&saved, "goals", id),
        opening_saved: lenient_amount(&opening, "goals", id),
    })
}

pub fn list_goals(conn: &Connection, owner: &str) -> LedgerResult<Vec<Goal>> {
    query_owned(
        conn,
        "SELECT id, owner_id, name, target_amount, saved_amount, opening_saved FROM goals
         WHERE owner_id=?1 ORDER BY id",
        owner,
        goal_from_row,
    )
}

pub fn get_goal(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Goal>> {
    query_one(
        conn,
        "SELECT id, owner_id, name, target_amount, saved_amount, opening_saved FROM goals
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        goal_from_row,
    )
}

/// Goal counterpart of [`apply_wallet_delta`].
pub fn apply_goal_delta(
    conn: &Connection,
    owner: &str,
    goal_id: i64,
    delta: Decimal,
) -> LedgerResult<Option<Decimal>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT saved_amount FROM goals WHERE id=?1 AND owner_id=?2",
            params![goal_id, owner],
            |r| r.get(0),
        )
        .optional()?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let next = strict_amount(&raw, "goals", "saved_amount")?
        .checked_add(delta)
        .ok_or(LedgerError::InvalidAmount {
            what: "goal saved amount",
            amount: delta,
        })?;
    conn.execute(
        "UPDATE goals SET saved_amount=?1 WHERE id=?2 AND owner_id=?3",
        params![next.to_string(), goal_id, owner],
    )?;
    Ok(Some(next))
}

fn deposit_from_row(r: &Row<'_>) -> rusqlite::Result<GoalDeposit> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(4)?;
    Ok(GoalDeposit {
        id,
        owner_id: r.get(1)?,
        goal_id: r.get(2)?,
        wallet_id: r.get(3)?,
        amount: lenient_amount(&amount, "goal_deposits", id),
        date: r.get(5)?,
    })
}

pub fn list_goal_deposits(conn: &Connection, owner: &str) -> LedgerResult<Vec<GoalDeposit>> {
    query_owned(
        conn,
        "SELECT id, owner_id, goal_id, wallet_id, amount, date FROM goal_deposits
         WHERE owner_id=?1 ORDER BY date DESC, id DESC",
        owner,
        deposit_from_row,
    )
}

pub fn get_goal_deposit(
    conn: &Connection,
    owner: &str,
    id: i64,
) -> LedgerResult<Option<GoalDeposit>> {
    query_one(
        conn,
        "SELECT id, owner_id, goal_id, wallet_id, amount, date FROM goal_deposits
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        deposit_from_row,
    )
}

// Categories and budgets

/// Exported budget id. Rows are keyed by `(owner_id, category_id)`; this
/// string is only the label collaborators see and is not unique.
pub fn budget_label(owner: &str, category_id: &str) -> String {
    format!("{}_{}", owner, category_id)
}

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        label: r.get(2)?,
        icon: r.get(3)?,
        color: r.get(4)?,
        is_default: r.get(5)?,
    })
}

pub fn list_categories(conn: &Connection, owner: &str) -> LedgerResult<Vec<Category>> {
    query_owned(
        conn,
        "SELECT id, owner_id, label, icon, color, is_default FROM categories
         WHERE owner_id=?1 ORDER BY created_at, rowid",
        owner,
        category_from_row,
    )
}

pub fn get_category(conn: &Connection, owner: &str, id: &str) -> LedgerResult<Option<Category>> {
    query_one(
        conn,
        "SELECT id, owner_id, label, icon, color, is_default FROM categories
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        category_from_row,
    )
}

fn budget_from_row(r: &Row<'_>) -> rusqlite::Result<Budget> {
    let limit: String = r.get(3)?;
    Ok(Budget {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        category_id: r.get(2)?,
        limit: lenient_amount(&limit, "budgets", 0),
    })
}

pub fn list_budgets(conn: &Connection, owner: &str) -> LedgerResult<Vec<Budget>> {
    query_owned(
        conn,
        "SELECT id, owner_id, category_id, limit_amount FROM budgets
         WHERE owner_id=?1 ORDER BY category_id",
        owner,
        budget_from_row,
    )
}

// Productivity

fn habit_from_row(r: &Row<'_>) -> rusqlite::Result<Habit> {
    let dates_json: String = r.get(4)?;
    let completed_dates: BTreeSet<NaiveDate> =
        serde_json::from_str(&dates_json).map_err(|e| conversion_err(4, e.to_string()))?;
    Ok(Habit {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        name: r.get(2)?,
        color: r.get(3)?,
        completed_dates,
        streak: r.get(5)?,
    })
}

pub fn list_habits(conn: &Connection, owner: &str) -> LedgerResult<Vec<Habit>> {
    query_owned(
        conn,
        "SELECT id, owner_id, name, color, completed_dates, streak FROM habits
         WHERE owner_id=?1 ORDER BY id",
        owner,
        habit_from_row,
    )
}

pub fn get_habit(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Habit>> {
    query_one(
        conn,
        "SELECT id, owner_id, name, color, completed_dates, streak FROM habits
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        habit_from_row,
    )
}

fn task_from_row(r: &Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = r.get(3)?;
    Ok(Task {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        title: r.get(2)?,
        priority: priority
            .parse::<Priority>()
            .map_err(|e| conversion_err(3, e))?,
        due_date: r.get(4)?,
        completed: r.get(5)?,
    })
}

pub fn list_tasks(conn: &Connection, owner: &str) -> LedgerResult<Vec<Task>> {
    query_owned(
        conn,
        "SELECT id, owner_id, title, priority, due_date, completed FROM tasks
         WHERE owner_id=?1 ORDER BY due_date IS NULL, due_date, id",
        owner,
        task_from_row,
    )
}

pub fn get_task(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Task>> {
    query_one(
        conn,
        "SELECT id, owner_id, title, priority, due_date, completed FROM tasks
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        task_from_row,
    )
}

fn note_from_row(r: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        title: r.get(2)?,
        content: r.get(3)?,
        color: r.get(4)?,
        pinned: r.get(5)?,
    })
}

/// Pinned notes first, newest first within each group.
pub fn list_notes(conn: &Connection, owner: &str) -> LedgerResult<Vec<Note>> {
    query_owned(
        conn,
        "SELECT id, owner_id, title, content, color, pinned FROM notes
         WHERE owner_id=?1 ORDER BY pinned DESC, id DESC",
        owner,
        note_from_row,
    )
}

pub fn get_note(conn: &Connection, owner: &str, id: i64) -> LedgerResult<Option<Note>> {
    query_one(
        conn,
        "SELECT id, owner_id, title, content, color, pinned FROM notes
         WHERE owner_id=?1 AND id=?2",
        owner,
        &id,
        note_from_row,
    )
}

pub fn get_profile(conn: &Connection, owner: &str) -> LedgerResult<Option<GamifyProfile>> {
    let mut stmt = conn.prepare_cached(
        "SELECT owner_id, points, level, badges, login_streak, last_login_date FROM gamify
         WHERE owner_id=?1",
    )?;
    let row = stmt
        .query_row(params![owner], |r| {
            let badges_json: String = r.get(3)?;
            let badges: BTreeSet<String> = serde_json::from_str(&badges_json)
                .map_err(|e| conversion_err(3, e.to_string()))?;
            Ok(GamifyProfile {
                owner_id: r.get(0)?,
                points: r.get(1)?,
                level: r.get(2)?,
                badges,
                login_streak: r.get(4)?,
                last_login_date: r.get(5)?,
            })
        })
        .optional()?;
    Ok(row)
}

pub fn save_profile(conn: &Connection, profile: &GamifyProfile) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO gamify(owner_id, points, level, badges, login_streak, last_login_date)
         VALUES (?1,?2,?3,?4,?5,?6)
         ON CONFLICT(owner_id) DO UPDATE SET
            points=excluded.points,
            level=excluded.level,
            badges=excluded.badges,
            login_streak=excluded.login_streak,
            last_login_date=excluded.last_login_date",
        params![
            profile.owner_id,
            profile.points,
            profile.level,
            serde_json::to_string(&profile.badges)?,
            profile.login_streak,
            profile.last_login_date,
        ],
    )?;
    Ok(())
}

/// Everything the derived views are computed from, read in one pass.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub wallets: Vec<Wallet>,
    pub meals: Vec<Meal>,
    pub purchases: Vec<Purchase>,
    pub incomes: Vec<Income>,
    pub transfers: Vec<Transfer>,
    pub goals: Vec<Goal>,
    pub goal_deposits: Vec<GoalDeposit>,
    pub budgets: Vec<Budget>,
    pub categories: Vec<Category>,
    pub habits: Vec<Habit>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
}

impl Snapshot {
    pub fn load(conn: &Connection, owner: &str) -> LedgerResult<Self> {
        Ok(Snapshot {
            wallets: list_wallets(conn, owner)?,
            meals: list_meals(conn, owner)?,
            purchases: list_purchases(conn, owner)?,
            incomes: list_incomes(conn, owner)?,
            transfers: list_transfers(conn, owner)?,
            goals: list_goals(conn, owner)?,
            goal_deposits: list_goal_deposits(conn, owner)?,
            budgets: list_budgets(conn, owner)?,
            categories: list_categories(conn, owner)?,
            habits: list_habits(conn, owner)?,
            tasks: list_tasks(conn, owner)?,
            notes: list_notes(conn, owner)?,
        })
    }
}
