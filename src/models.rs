// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Asset,
    Liability,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Asset => "asset",
            WalletType::Liability => "liability",
        }
    }
}

impl FromStr for WalletType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(WalletType::Asset),
            "liability" => Ok(WalletType::Liability),
            other => Err(format!("Unknown wallet type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub r#type: WalletType,
    pub balance: Decimal,
    pub opening_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: i64,
    pub owner_id: String,
    pub wallet_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub meal_type: String,
    pub item: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub owner_id: String,
    pub wallet_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub item: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: i64,
    pub owner_id: String,
    pub wallet_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: i64,
    pub owner_id: String,
    pub source_id: i64,
    pub dest_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub opening_saved: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDeposit {
    pub id: i64,
    pub owner_id: String,
    pub goal_id: i64,
    pub wallet_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// One limit per category per owner; `id` is `<owner>_<category>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub owner_id: String,
    pub category_id: String,
    pub limit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub owner_id: String,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub color: String,
    pub completed_dates: BTreeSet<NaiveDate>,
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

/// Sticky note. Pinned notes list first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub color: String,
    pub pinned: bool,
}

/// Partial note edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub pinned: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamifyProfile {
    pub owner_id: String,
    pub points: i64,
    pub level: u32,
    pub badges: BTreeSet<String>,
    pub login_streak: u32,
    pub last_login_date: Option<NaiveDate>,
}

impl GamifyProfile {
    /// Profile for an owner seen for the first time on `today`.
    pub fn fresh(owner_id: &str, today: NaiveDate) -> Self {
        GamifyProfile {
            owner_id: owner_id.to_string(),
            points: 0,
            level: 1,
            badges: BTreeSet::new(),
            login_streak: 1,
            last_login_date: Some(today),
        }
    }
}

/// Transaction kinds that can be edited into one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Meal,
    Purchase,
    Income,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Meal => "meal",
            RecordKind::Purchase => "purchase",
            RecordKind::Income => "income",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "meal" => Ok(RecordKind::Meal),
            "purchase" => Ok(RecordKind::Purchase),
            "income" => Ok(RecordKind::Income),
            other => Err(format!("Unknown record kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub wallet_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub meal_type: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub wallet_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub wallet_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub source_id: i64,
    pub dest_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGoalDeposit {
    pub goal_id: i64,
    pub wallet_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Payload for the create half of a cross-kind edit.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Meal(NewMeal),
    Purchase(NewPurchase),
    Income(NewIncome),
}

impl NewRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            NewRecord::Meal(_) => RecordKind::Meal,
            NewRecord::Purchase(_) => RecordKind::Purchase,
            NewRecord::Income(_) => RecordKind::Income,
        }
    }
}
