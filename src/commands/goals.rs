// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::models::NewGoalDeposit;
use crate::store;
use crate::utils::{
    arg, date_or_today, fmt_money, id_arg, maybe_print_json, parse_decimal, pretty_table,
};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg(sub, "name")?;
            let target = parse_decimal(arg(sub, "target")?)?;
            let saved = parse_decimal(arg(sub, "saved")?)?;
            let id = ledger.add_goal(name, target, saved)?;
            println!("Added goal #{} '{}' (target {})", id, name, target);
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => {
            let id = id_arg(sub, "id")?;
            let goal = store::get_goal(ledger.conn(), ledger.owner(), id)?
                .ok_or(LedgerError::GoalNotFound(id))?;
            let name = sub
                .get_one::<String>("name")
                .cloned()
                .unwrap_or(goal.name);
            let target = match sub.get_one::<String>("target") {
                Some(t) => parse_decimal(t)?,
                None => goal.target_amount,
            };
            ledger.update_goal(id, &name, target)?;
            println!("Updated goal #{}", id);
        }
        Some(("rm", sub)) => {
            let id = id_arg(sub, "id")?;
            ledger.delete_goal(id)?;
            println!("Removed goal #{}", id);
        }
        Some(("deposit", sub)) => {
            let deposit = NewGoalDeposit {
                goal_id: id_arg(sub, "goal")?,
                wallet_id: id_arg(sub, "wallet")?,
                amount: parse_decimal(arg(sub, "amount")?)?,
                date: date_or_today(sub)?,
            };
            let id = ledger.deposit_to_goal(deposit.clone())?;
            println!(
                "Deposit #{}: {} from wallet #{} into goal #{}",
                id, deposit.amount, deposit.wallet_id, deposit.goal_id
            );
        }
        Some(("deposits", sub)) => {
            let goal = sub.get_one::<i64>("goal").copied();
            let rows: Vec<_> = store::list_goal_deposits(ledger.conn(), ledger.owner())?
                .into_iter()
                .filter(|d| goal.is_none_or(|g| g == d.goal_id))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|d| {
                        vec![
                            d.id.to_string(),
                            d.date.to_string(),
                            d.goal_id.to_string(),
                            d.wallet_id.to_string(),
                            fmt_money(&d.amount),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "Goal", "Wallet", "Amount"], data)
                );
            }
        }
        Some(("undeposit", sub)) => {
            let id = id_arg(sub, "id")?;
            ledger.delete_goal_deposit(id)?;
            println!("Reversed and removed deposit #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let goals = store::list_goals(ledger.conn(), ledger.owner())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
        let data = goals
            .iter()
            .map(|g| {
                let pct = if g.target_amount.is_zero() {
                    Decimal::ZERO
                } else {
                    g.saved_amount / g.target_amount * Decimal::ONE_HUNDRED
                };
                vec![
                    g.id.to_string(),
                    g.name.clone(),
                    fmt_money(&g.saved_amount),
                    fmt_money(&g.target_amount),
                    format!("{}%", pct.round_dp(0)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Goal", "Saved", "Target", "Progress"], data)
        );
    }
    Ok(())
}
