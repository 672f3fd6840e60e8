// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{HashMap, HashSet};

use crate::ledger::Ledger;
use crate::ledger::recorder::income_delta;
use crate::store::Snapshot;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

fn issue(kind: &'static str, detail: String) -> Issue {
    Issue { kind, detail }
}

/// Replays the balance-moving history over every wallet and goal and
/// reports where the stored value disagrees, plus records pointing at
/// wallets, goals or categories that no longer exist.
pub fn find_issues(snap: &Snapshot) -> Vec<Issue> {
    let mut out = Vec::new();

    let mut expected: HashMap<i64, Decimal> = snap
        .wallets
        .iter()
        .map(|w| (w.id, w.opening_balance))
        .collect();
    let kinds: HashMap<i64, _> = snap.wallets.iter().map(|w| (w.id, w.r#type)).collect();

    for i in &snap.incomes {
        match (expected.get_mut(&i.wallet_id), kinds.get(&i.wallet_id)) {
            (Some(e), Some(k)) => *e = e.saturating_add(income_delta(*k, i.amount)),
            _ => out.push(issue(
                "orphan_income",
                format!("income #{} -> wallet #{}", i.id, i.wallet_id),
            )),
        }
    }
    for t in &snap.transfers {
        for (wallet, delta) in [(t.source_id, -t.amount), (t.dest_id, t.amount)] {
            match expected.get_mut(&wallet) {
                Some(e) => *e = e.saturating_add(delta),
                None => out.push(issue(
                    "orphan_transfer",
                    format!("transfer #{} -> wallet #{}", t.id, wallet),
                )),
            }
        }
    }

    let mut saved: HashMap<i64, Decimal> = snap
        .goals
        .iter()
        .map(|g| (g.id, g.opening_saved))
        .collect();
    for d in &snap.goal_deposits {
        match expected.get_mut(&d.wallet_id) {
            Some(e) => *e = e.saturating_sub(d.amount),
            None => out.push(issue(
                "orphan_deposit",
                format!("deposit #{} -> wallet #{}", d.id, d.wallet_id),
            )),
        }
        match saved.get_mut(&d.goal_id) {
            Some(s) => *s = s.saturating_add(d.amount),
            None => out.push(issue(
                "orphan_deposit",
                format!("deposit #{} -> goal #{}", d.id, d.goal_id),
            )),
        }
    }

    for w in &snap.wallets {
        let want = expected.get(&w.id).copied().unwrap_or(w.opening_balance);
        if want != w.balance {
            out.push(issue(
                "wallet_drift",
                format!("wallet #{} '{}': stored {}, history says {}", w.id, w.name, w.balance, want),
            ));
        }
    }
    for g in &snap.goals {
        let want = saved.get(&g.id).copied().unwrap_or(g.opening_saved);
        if want != g.saved_amount {
            out.push(issue(
                "goal_drift",
                format!("goal #{} '{}': stored {}, deposits say {}", g.id, g.name, g.saved_amount, want),
            ));
        }
    }

    for m in snap.meals.iter().filter(|m| !kinds.contains_key(&m.wallet_id)) {
        out.push(issue(
            "orphan_meal",
            format!("meal #{} -> wallet #{}", m.id, m.wallet_id),
        ));
    }
    for p in snap.purchases.iter().filter(|p| !kinds.contains_key(&p.wallet_id)) {
        out.push(issue(
            "orphan_purchase",
            format!("purchase #{} -> wallet #{}", p.id, p.wallet_id),
        ));
    }

    let categories: HashSet<&str> = snap.categories.iter().map(|c| c.id.as_str()).collect();
    for b in snap
        .budgets
        .iter()
        .filter(|b| !categories.contains(b.category_id.as_str()))
    {
        out.push(issue(
            "budget_no_category",
            format!("budget {} -> category '{}'", b.id, b.category_id),
        ));
    }
    out
}

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let issues = find_issues(&ledger.snapshot()?);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &issues)? {
        return Ok(());
    }
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
