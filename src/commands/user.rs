// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{arg, current_owner, set_current_owner};
use anyhow::Result;
use rusqlite::Connection;

/// Runs before a ledger is opened, since switching changes whose ledger
/// that would be.
pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("switch", sub)) => {
            let owner = arg(sub, "owner")?;
            set_current_owner(conn, owner)?;
            println!("Now recording as '{}'", owner.trim());
        }
        _ => println!("{}", current_owner(conn)?),
    }
    Ok(())
}
