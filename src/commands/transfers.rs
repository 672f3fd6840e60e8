// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::NewTransfer;
use crate::store;
use crate::utils::{
    arg, date_or_today, fmt_money, id_arg, maybe_print_json, parse_decimal, pretty_table,
};
use anyhow::Result;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let transfer = NewTransfer {
                source_id: id_arg(sub, "from")?,
                dest_id: id_arg(sub, "to")?,
                amount: parse_decimal(arg(sub, "amount")?)?,
                date: date_or_today(sub)?,
            };
            let id = ledger.add_transfer(transfer.clone())?;
            println!(
                "Transfer #{}: {} from wallet #{} to wallet #{}",
                id, transfer.amount, transfer.source_id, transfer.dest_id
            );
        }
        Some(("list", sub)) => {
            let rows = store::list_transfers(ledger.conn(), ledger.owner())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.date.to_string(),
                            t.source_id.to_string(),
                            t.dest_id.to_string(),
                            fmt_money(&t.amount),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "From", "To", "Amount"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = id_arg(sub, "id")?;
            ledger.delete_transfer(id)?;
            println!("Reversed and removed transfer #{}", id);
        }
        _ => {}
    }
    Ok(())
}
