// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{Ledger, aggregator};
use crate::models::WalletType;
use crate::utils::{arg, fmt_money, id_arg, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg(sub, "name")?;
            let kind = arg(sub, "type")?
                .parse::<WalletType>()
                .map_err(|e| anyhow!(e))?;
            let balance = parse_decimal(arg(sub, "balance")?)?;
            let id = ledger.add_wallet(name, kind, balance)?;
            println!("Added wallet #{} '{}' ({}, {})", id, name, kind.as_str(), balance);
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rename", sub)) => {
            let id = id_arg(sub, "id")?;
            let name = arg(sub, "name")?;
            ledger.rename_wallet(id, name)?;
            println!("Renamed wallet #{} to '{}'", id, name);
        }
        Some(("rm", sub)) => {
            let id = id_arg(sub, "id")?;
            ledger.delete_wallet(id)?;
            println!("Removed wallet #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let snap = ledger.snapshot()?;
    let rows = aggregator::summarize(&snap.wallets, &snap.meals, &snap.purchases);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.wallet.id.to_string(),
                    r.wallet.name.clone(),
                    r.wallet.r#type.as_str().to_string(),
                    fmt_money(&r.wallet.balance),
                    fmt_money(&r.spent),
                    fmt_money(&r.remaining),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Type", "Balance", "Spent", "Remaining"],
                data
            )
        );
    }
    Ok(())
}
