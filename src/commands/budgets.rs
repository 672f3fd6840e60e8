// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::store;
use crate::utils::{arg, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rm", sub)) => {
            let cat = arg(sub, "category")?;
            ledger.delete_budget(cat)?;
            println!("Removed budget for {}", cat);
        }
        _ => {}
    }
    Ok(())
}

fn set(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let cat = arg(sub, "category")?;
    let limit = parse_decimal(arg(sub, "limit")?)?;
    ledger.set_budget(cat, limit)?;
    println!("Budget set for {} = {}", cat, limit);
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    pub category_id: String,
    pub label: String,
    pub limit: Decimal,
}

pub fn budget_rows(ledger: &Ledger) -> Result<Vec<BudgetRow>> {
    let (conn, owner) = (ledger.conn(), ledger.owner());
    let cats = store::list_categories(conn, owner)?;
    let rows = store::list_budgets(conn, owner)?
        .into_iter()
        .map(|b| {
            let label = cats
                .iter()
                .find(|c| c.id == b.category_id)
                .map(|c| c.label.clone())
                .unwrap_or_else(|| "(deleted)".to_string());
            BudgetRow {
                category_id: b.category_id,
                label,
                limit: b.limit,
            }
        })
        .collect();
    Ok(rows)
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let rows = budget_rows(ledger)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| vec![r.category_id.clone(), r.label.clone(), fmt_money(&r.limit)])
            .collect();
        println!("{}", pretty_table(&["Category", "Label", "Limit"], data));
    }
    Ok(())
}
