// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::store;
use crate::utils::{arg, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let c = ledger.add_category(arg(sub, "label")?, arg(sub, "icon")?, arg(sub, "color")?)?;
            println!("Added category '{}' (id {})", c.label, c.id);
        }
        Some(("list", sub)) => {
            let cats = store::list_categories(ledger.conn(), ledger.owner())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| {
                        vec![
                            c.id,
                            format!("{} {}", c.icon, c.label),
                            c.color,
                            if c.is_default { "yes" } else { "" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Color", "Default"], data));
            }
        }
        Some(("seed", _)) => {
            let n = ledger.seed_default_categories()?;
            if n == 0 {
                println!("Categories already present, nothing seeded");
            } else {
                println!("Seeded {} default categories", n);
            }
        }
        Some(("rm", sub)) => {
            let id = arg(sub, "id")?;
            ledger.delete_category(id)?;
            println!("Removed category '{}' and its budget", id);
        }
        _ => {}
    }
    Ok(())
}
