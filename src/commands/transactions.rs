// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::models::{Income, Meal, NewIncome, NewMeal, NewPurchase, NewRecord, Purchase, RecordKind};
use crate::store;
use crate::utils::{
    arg, fmt_money, id_arg, maybe_print_json, parse_date, parse_decimal, parse_month,
    pretty_table, today,
};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        Some(("reclassify", sub)) => reclassify(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn kind_of(sub: &clap::ArgMatches, name: &str) -> Result<RecordKind> {
    arg(sub, name)?
        .parse::<RecordKind>()
        .map_err(|e| anyhow!(e))
}

/// Loose field set for meals, purchases and incomes. Edits overlay the
/// flags given on the command line onto the stored record; a cross-kind
/// edit then reads whichever fields the new kind needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    pub wallet_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub item: Option<String>,
    pub meal_type: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
}

impl RecordFields {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        let text = |name: &str| sub.get_one::<String>(name).cloned();
        Ok(RecordFields {
            wallet_id: sub.get_one::<i64>("wallet").copied(),
            date: text("date").map(|s| parse_date(&s)).transpose()?,
            amount: text("amount").map(|s| parse_decimal(&s)).transpose()?,
            item: text("item"),
            meal_type: text("meal-type"),
            category: text("category"),
            source: text("source"),
        })
    }

    pub fn from_meal(m: &Meal) -> Self {
        RecordFields {
            wallet_id: Some(m.wallet_id),
            date: Some(m.date),
            amount: Some(m.amount),
            item: Some(m.item.clone()),
            meal_type: Some(m.meal_type.clone()),
            ..Default::default()
        }
    }

    pub fn from_purchase(p: &Purchase) -> Self {
        RecordFields {
            wallet_id: Some(p.wallet_id),
            date: Some(p.date),
            amount: Some(p.amount),
            item: Some(p.item.clone()),
            category: Some(p.category.clone()),
            ..Default::default()
        }
    }

    pub fn from_income(i: &Income) -> Self {
        RecordFields {
            wallet_id: Some(i.wallet_id),
            date: Some(i.date),
            amount: Some(i.amount),
            source: Some(i.source.clone()),
            ..Default::default()
        }
    }

    /// Fields set in `top` win.
    pub fn overlay(self, top: RecordFields) -> RecordFields {
        RecordFields {
            wallet_id: top.wallet_id.or(self.wallet_id),
            date: top.date.or(self.date),
            amount: top.amount.or(self.amount),
            item: top.item.or(self.item),
            meal_type: top.meal_type.or(self.meal_type),
            category: top.category.or(self.category),
            source: top.source.or(self.source),
        }
    }

    pub fn into_record(self, kind: RecordKind, today: NaiveDate) -> Result<NewRecord> {
        let wallet_id = self.wallet_id.context("--wallet is required")?;
        let amount = self.amount.context("--amount is required")?;
        let date = self.date.unwrap_or(today);
        // An income's source doubles as the label of a meal or purchase.
        let label = self
            .item
            .clone()
            .or_else(|| self.source.clone())
            .unwrap_or_default();
        Ok(match kind {
            RecordKind::Meal => NewRecord::Meal(NewMeal {
                wallet_id,
                date,
                amount,
                meal_type: self.meal_type.unwrap_or_else(|| "Snack".to_string()),
                item: label,
            }),
            RecordKind::Purchase => NewRecord::Purchase(NewPurchase {
                wallet_id,
                date,
                amount,
                category: self.category.unwrap_or_else(|| "Other".to_string()),
                item: label,
            }),
            RecordKind::Income => NewRecord::Income(NewIncome {
                wallet_id,
                date,
                amount,
                source: self
                    .source
                    .or(self.item)
                    .unwrap_or_else(|| "Salary".to_string()),
            }),
        })
    }
}

pub fn load_fields(ledger: &Ledger, kind: RecordKind, id: i64) -> Result<RecordFields> {
    let (conn, owner) = (ledger.conn(), ledger.owner());
    let fields = match kind {
        RecordKind::Meal => store::get_meal(conn, owner, id)?.map(|m| RecordFields::from_meal(&m)),
        RecordKind::Purchase => {
            store::get_purchase(conn, owner, id)?.map(|p| RecordFields::from_purchase(&p))
        }
        RecordKind::Income => {
            store::get_income(conn, owner, id)?.map(|i| RecordFields::from_income(&i))
        }
    };
    fields.ok_or_else(|| LedgerError::not_found(kind.as_str(), id).into())
}

fn add(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let kind = kind_of(sub, "kind")?;
    let record = RecordFields::from_matches(sub)?.into_record(kind, today())?;
    let id = match record {
        NewRecord::Meal(m) => ledger.add_meal(m)?,
        NewRecord::Purchase(p) => ledger.add_purchase(p)?,
        NewRecord::Income(i) => ledger.add_income(i)?,
    };
    println!("Recorded {} #{}", kind, id);
    Ok(())
}

fn edit(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let kind = kind_of(sub, "kind")?;
    let id = id_arg(sub, "id")?;
    let fields = load_fields(ledger, kind, id)?.overlay(RecordFields::from_matches(sub)?);
    match fields.into_record(kind, today())? {
        NewRecord::Meal(m) => ledger.update_meal(id, m)?,
        NewRecord::Purchase(p) => ledger.update_purchase(id, p)?,
        NewRecord::Income(i) => ledger.update_income(id, i)?,
    }
    println!("Updated {} #{}", kind, id);
    Ok(())
}

fn rm(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let kind = kind_of(sub, "kind")?;
    let id = id_arg(sub, "id")?;
    match kind {
        RecordKind::Meal => ledger.delete_meal(id)?,
        RecordKind::Purchase => ledger.delete_purchase(id)?,
        RecordKind::Income => {
            ledger.delete_income(id)?;
        }
    }
    println!("Removed {} #{}", kind, id);
    Ok(())
}

fn reclassify(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let kind = kind_of(sub, "kind")?;
    let to = kind_of(sub, "to")?;
    let id = id_arg(sub, "id")?;
    let fields = load_fields(ledger, kind, id)?.overlay(RecordFields::from_matches(sub)?);
    let new_id = ledger
        .reclassify(kind, id, fields.into_record(to, today())?)
        .with_context(|| format!("Reclassify {} #{} as {}", kind, id, to))?;
    println!("{} #{} is now {} #{}", kind, id, to, new_id);
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRow {
    pub kind: RecordKind,
    pub id: i64,
    pub date: NaiveDate,
    pub wallet_id: i64,
    pub amount: Decimal,
    pub label: String,
    /// Meal type, purchase category, or empty for incomes.
    pub detail: String,
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<TxRow>> {
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| k.parse::<RecordKind>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let wants = |k: RecordKind| kind.is_none_or(|want| want == k);

    let (conn, owner) = (ledger.conn(), ledger.owner());
    let mut rows = Vec::new();
    if wants(RecordKind::Meal) {
        rows.extend(store::list_meals(conn, owner)?.into_iter().map(|m| TxRow {
            kind: RecordKind::Meal,
            id: m.id,
            date: m.date,
            wallet_id: m.wallet_id,
            amount: m.amount,
            label: m.item,
            detail: m.meal_type,
        }));
    }
    if wants(RecordKind::Purchase) {
        rows.extend(store::list_purchases(conn, owner)?.into_iter().map(|p| TxRow {
            kind: RecordKind::Purchase,
            id: p.id,
            date: p.date,
            wallet_id: p.wallet_id,
            amount: p.amount,
            label: p.item,
            detail: p.category,
        }));
    }
    if wants(RecordKind::Income) {
        rows.extend(store::list_incomes(conn, owner)?.into_iter().map(|i| TxRow {
            kind: RecordKind::Income,
            id: i.id,
            date: i.date,
            wallet_id: i.wallet_id,
            amount: i.amount,
            label: i.source,
            detail: String::new(),
        }));
    }
    if let Some(month) = month {
        rows.retain(|r| r.date.format("%Y-%m").to_string() == month);
    }
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    r.kind.to_string(),
                    r.id.to_string(),
                    r.wallet_id.to_string(),
                    fmt_money(&r.amount),
                    r.label.clone(),
                    r.detail.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Kind", "ID", "Wallet", "Amount", "Label", "Detail"],
                rows,
            )
        );
    }
    Ok(())
}
