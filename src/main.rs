// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::info;

use walletwise::ledger::Ledger;
use walletwise::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    if let Some(("user", sub)) = matches.subcommand() {
        return commands::user::handle(&conn, sub);
    }

    let owner = utils::current_owner(&conn)?;
    let mut ledger = Ledger::new(conn, owner);

    let login = ledger.process_login(utils::today())?;
    if let Some(bonus) = &login.bonus {
        info!(streak = login.streak, points = bonus.granted, "login streak bonus");
        println!(
            "🔥 {}-day login streak: badge 'On Fire' and +{} pts",
            login.streak, bonus.granted
        );
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            let seeded = ledger.seed_default_categories()?;
            println!("Database initialized at {}", db::db_path()?.display());
            if seeded > 0 {
                println!("Created {} default categories for '{}'", seeded, ledger.owner());
            }
        }
        Some(("wallet", sub)) => commands::wallets::handle(&mut ledger, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut ledger, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("transfer", sub)) => commands::transfers::handle(&mut ledger, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&mut ledger, sub)?,
        Some(("habit", sub)) => commands::planner::handle_habit(&mut ledger, sub)?,
        Some(("task", sub)) => commands::planner::handle_task(&mut ledger, sub)?,
        Some(("note", sub)) => commands::planner::handle_note(&mut ledger, sub)?,
        Some(("gamify", sub)) => commands::gamify::handle(&ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ledger, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
