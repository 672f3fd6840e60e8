// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::ledger::streaks::{HOT_STREAK_DAYS, LEVEL_STEP, MAX_LEVEL};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("status", sub)) = m.subcommand() {
        let Some(p) = ledger.profile()? else {
            println!("No profile yet");
            return Ok(());
        };
        if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
            return Ok(());
        }
        let next = if p.level >= MAX_LEVEL {
            "max level".to_string()
        } else {
            format!("{} pts", i64::from(p.level) * LEVEL_STEP)
        };
        let streak = if p.login_streak >= HOT_STREAK_DAYS {
            format!("{} days (x2 points)", p.login_streak)
        } else {
            format!("{} days", p.login_streak)
        };
        let badges = p.badges.iter().cloned().collect::<Vec<_>>().join(", ");
        let rows = vec![
            vec!["Points".to_string(), p.points.to_string()],
            vec!["Level".to_string(), p.level.to_string()],
            vec!["Next level at".to_string(), next],
            vec!["Login streak".to_string(), streak],
            vec!["Badges".to_string(), badges],
        ];
        println!("{}", pretty_table(&["", ""], rows));
    }
    Ok(())
}
