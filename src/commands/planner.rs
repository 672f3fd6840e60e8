// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::ledger::productivity::Toggle;
use crate::ledger::streaks::habit_streak;
use crate::models::{NoteUpdate, Priority};
use crate::store;
use crate::utils::{
    arg, date_or_today, id_arg, maybe_print_json, parse_date, pretty_table, today,
};
use anyhow::{Result, anyhow};

fn print_award(toggle: &Toggle) {
    if let Some(a) = &toggle.award {
        print!(" +{} pts", a.granted);
        if a.multiplier > 1 {
            print!(" (x{} streak bonus)", a.multiplier);
        }
        if a.leveled_up {
            print!(", level up!");
        }
        for b in &a.new_badges {
            print!(", badge '{}'", b);
        }
    }
    println!();
}

pub fn handle_habit(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg(sub, "name")?;
            let id = ledger.add_habit(name, arg(sub, "color")?)?;
            println!("Added habit #{} '{}'", id, name);
        }
        Some(("list", sub)) => {
            let today = today();
            let mut habits = store::list_habits(ledger.conn(), ledger.owner())?;
            // The stored streak is as of the last toggle; show it as of today.
            for h in &mut habits {
                h.streak = habit_streak(&h.completed_dates, today);
            }
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &habits)? {
                let data = habits
                    .iter()
                    .map(|h| {
                        vec![
                            h.id.to_string(),
                            h.name.clone(),
                            h.streak.to_string(),
                            if h.completed_dates.contains(&today) { "✔" } else { "" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Habit", "Streak", "Today"], data));
            }
        }
        Some(("toggle", sub)) => {
            let id = id_arg(sub, "id")?;
            let day = date_or_today(sub)?;
            let t = ledger.toggle_habit(id, day, today())?;
            print!(
                "Habit #{} {} for {} (streak {})",
                id,
                if t.completed { "done" } else { "undone" },
                day,
                t.streak
            );
            print_award(&t);
        }
        Some(("rm", sub)) => {
            let id = id_arg(sub, "id")?;
            ledger.delete_habit(id)?;
            println!("Removed habit #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_task(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = arg(sub, "title")?;
            let priority = arg(sub, "priority")?
                .parse::<Priority>()
                .map_err(|e| anyhow!(e))?;
            let due = sub
                .get_one::<String>("due")
                .map(|d| parse_date(d))
                .transpose()?;
            let id = ledger.add_task(title, priority, due)?;
            println!("Added task #{} '{}'", id, title);
        }
        Some(("list", sub)) => {
            let tasks = store::list_tasks(ledger.conn(), ledger.owner())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tasks)? {
                let data = tasks
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.title.clone(),
                            t.priority.as_str().to_string(),
                            t.due_date.map(|d| d.to_string()).unwrap_or_default(),
                            if t.completed { "✔" } else { "" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Task", "Priority", "Due", "Done"], data)
                );
            }
        }
        Some(("toggle", sub)) => {
            let id = id_arg(sub, "id")?;
            let t = ledger.toggle_task(id, today())?;
            print!(
                "Task #{} {}",
                id,
                if t.completed { "completed" } else { "reopened" }
            );
            print_award(&t);
        }
        Some(("rm", sub)) => {
            let id = id_arg(sub, "id")?;
            ledger.delete_task(id)?;
            println!("Removed task #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_note(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = arg(sub, "title")?;
            let id = ledger.add_note(title, arg(sub, "content")?, arg(sub, "color")?)?;
            println!("Added note #{} '{}'", id, title);
        }
        Some(("list", sub)) => {
            let notes = store::list_notes(ledger.conn(), ledger.owner())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &notes)? {
                let data = notes
                    .iter()
                    .map(|n| {
                        vec![
                            n.id.to_string(),
                            if n.pinned { "📌" } else { "" }.to_string(),
                            n.title.clone(),
                            n.content.lines().next().unwrap_or_default().to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Pin", "Title", "Content"], data));
            }
        }
        Some(("edit", sub)) => {
            let id = id_arg(sub, "id")?;
            let text = |name: &str| sub.get_one::<String>(name).cloned();
            ledger.update_note(
                id,
                NoteUpdate {
                    title: text("title"),
                    content: text("content"),
                    color: text("color"),
                    pinned: None,
                },
            )?;
            println!("Updated note #{}", id);
        }
        Some(("pin", sub)) => {
            let id = id_arg(sub, "id")?;
            let pinned = ledger.toggle_note_pin(id)?;
            println!("Note #{} {}", id, if pinned { "pinned" } else { "unpinned" });
        }
        Some(("rm", sub)) => {
            let id = id_arg(sub, "id")?;
            ledger.delete_note(id)?;
            println!("Removed note #{}", id);
        }
        _ => {}
    }
    Ok(())
}
