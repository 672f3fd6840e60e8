// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::feed::{Coordinator, Views};
use crate::ledger::projector::{self, BudgetReport};
use crate::ledger::{Ledger, aggregator, streaks};
use crate::utils::{fmt_money, maybe_print_json, month_end, pretty_table, today};
use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(ledger, sub)?,
        Some(("budget", sub)) => budget(ledger, sub)?,
        Some(("recents", sub)) => recents(ledger, sub)?,
        Some(("stats", sub)) => stats(ledger, sub)?,
        Some(("daily", sub)) => daily(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

/// Finance views as of `today`, computed through the change-feed coordinator.
pub fn current_views(ledger: &mut Ledger, today: NaiveDate) -> Result<Views> {
    let mut coord = Coordinator::attach(ledger);
    coord.refresh(ledger, today)?;
    coord
        .views()
        .cloned()
        .context("Finance views were not computed")
}

fn balances(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let views = current_views(ledger, today())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views.wallets)? {
        return Ok(());
    }
    let mut data: Vec<Vec<String>> = views
        .wallets
        .iter()
        .map(|w| {
            vec![
                w.wallet.name.clone(),
                w.wallet.r#type.as_str().to_string(),
                fmt_money(&w.wallet.balance),
                fmt_money(&w.spent),
                fmt_money(&w.remaining),
            ]
        })
        .collect();
    data.push(vec![
        "TOTAL".to_string(),
        String::new(),
        fmt_money(&views.stats.total_balance),
        fmt_money(&views.stats.total_spent),
        fmt_money(&views.stats.total_remaining),
    ]);
    println!(
        "{}",
        pretty_table(&["Wallet", "Type", "Balance", "Spent", "Remaining"], data)
    );
    Ok(())
}

/// Budget projection for `--month` (as of its last day) or the current month.
pub fn budget_report(ledger: &mut Ledger, month: Option<&str>) -> Result<BudgetReport> {
    let now = today();
    let as_of = match month {
        Some(m) if m != now.format("%Y-%m").to_string() => month_end(m)?,
        _ => return Ok(current_views(ledger, now)?.budget),
    };
    let snap = ledger.snapshot()?;
    Ok(projector::project(
        &snap.categories,
        &snap.budgets,
        &snap.meals,
        &snap.purchases,
        &snap.incomes,
        as_of,
    ))
}

fn budget(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let report = budget_report(ledger, sub.get_one::<String>("month").map(String::as_str))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let data = report
        .categories
        .iter()
        .map(|c| {
            let mut flags = Vec::new();
            if c.is_over {
                flags.push("over");
            }
            if c.is_spending_fast {
                flags.push("fast");
            }
            vec![
                c.label.clone(),
                fmt_money(&c.spent),
                fmt_money(&c.limit),
                fmt_money(&c.remaining),
                format!("{}%", c.progress_pct.round_dp(0)),
                fmt_money(&c.daily_safe_spend),
                flags.join(","),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Spent", "Limit", "Remaining", "Used", "Safe/day", "Flags"],
            data
        )
    );
    println!(
        "{}: spent {} of {} ({} days left), projected {}{}",
        report.month,
        fmt_money(&report.total_spent),
        fmt_money(&report.total_limit),
        report.clock.days_left,
        fmt_money(&report.projected_spend),
        if report.is_projected_over { " ⚠ over budget" } else { "" }
    );
    if !report.monthly_income.is_zero() {
        println!(
            "Income {} this month, {}% allocated to budgets",
            fmt_money(&report.monthly_income),
            report.income_allocation_pct
        );
    }
    Ok(())
}

fn recents(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(10);
    let snap = ledger.snapshot()?;
    let rows = aggregator::smart_recents(&snap.meals, &snap.purchases, limit);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.label.clone(),
                    fmt_money(&r.amount),
                    r.kind.to_string(),
                    r.category.clone(),
                    r.count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Item", "Amount", "Kind", "Category", "Times"], data)
        );
    }
    Ok(())
}

fn stats(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let s = current_views(ledger, today())?.stats;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Total balance", "Total spent", "Total remaining"],
                vec![vec![
                    fmt_money(&s.total_balance),
                    fmt_money(&s.total_spent),
                    fmt_money(&s.total_remaining),
                ]],
            )
        );
    }
    Ok(())
}

fn daily(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let snap = ledger.snapshot()?;
    let s = streaks::daily_stats(&snap.tasks, &snap.habits, today());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "Tasks due today: {}/{} done ({:.0}%)",
            s.completed_tasks, s.total_tasks, s.task_progress_pct
        );
        println!(
            "Habits: {}/{} done ({:.0}%)",
            s.completed_habits, s.total_habits, s.habit_progress_pct
        );
    }
    Ok(())
}
