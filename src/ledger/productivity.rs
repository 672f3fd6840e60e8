// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Habits, tasks, notes and the gamification profile. Completing something
//! and being paid for it land in the same unit.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::debug;

use super::Ledger;
use super::feed::Collection;
use super::streaks::{self, Award, HABIT_POINTS, LoginOutcome, TASK_POINTS};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{GamifyProfile, NoteUpdate, Priority};
use crate::store;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggle {
    pub completed: bool,
    /// Habit streak after the toggle; always zero for tasks.
    pub streak: u32,
    pub award: Option<Award>,
}

/// Note colour when none is given.
pub const DEFAULT_NOTE_COLOR: &str = "#ffffff";

fn load_profile(conn: &Connection, owner: &str, today: NaiveDate) -> LedgerResult<GamifyProfile> {
    Ok(store::get_profile(conn, owner)?.unwrap_or_else(|| GamifyProfile::fresh(owner, today)))
}

fn pay(conn: &Connection, owner: &str, base: i64, today: NaiveDate) -> LedgerResult<Award> {
    let mut profile = load_profile(conn, owner, today)?;
    let award = streaks::award(&mut profile, base);
    store::save_profile(conn, &profile)?;
    debug!(granted = award.granted, points = profile.points, level = profile.level, "points awarded");
    Ok(award)
}

impl Ledger {
    pub fn add_habit(&mut self, name: &str, color: &str) -> LedgerResult<i64> {
        if name.trim().is_empty() {
            return Err(LedgerError::Validation("habit name must not be empty".into()));
        }
        let name = name.trim().to_string();
        self.unit("add_habit", &[Collection::Habits], |tx, owner| {
            tx.execute(
                "INSERT INTO habits(owner_id, name, color, completed_dates, streak)
                 VALUES (?1,?2,?3,'[]',0)",
                params![owner, name, color],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Flips `day` for the habit. Ticking a day pays [`HABIT_POINTS`];
    /// unticking it does not take them back.
    pub fn toggle_habit(&mut self, id: i64, day: NaiveDate, today: NaiveDate) -> LedgerResult<Toggle> {
        self.unit(
            "toggle_habit",
            &[Collection::Habits, Collection::Gamify],
            |tx, owner| {
                let mut habit = store::get_habit(tx, owner, id)?
                    .ok_or_else(|| LedgerError::not_found("habit", id))?;
                let completed = streaks::toggle_day(&mut habit, day, today);
                tx.execute(
                    "UPDATE habits SET completed_dates=?1, streak=?2 WHERE id=?3 AND owner_id=?4",
                    params![
                        serde_json::to_string(&habit.completed_dates)?,
                        habit.streak,
                        id,
                        owner
                    ],
                )?;
                let award = if completed {
                    Some(pay(tx, owner, HABIT_POINTS, today)?)
                } else {
                    None
                };
                Ok(Toggle {
                    completed,
                    streak: habit.streak,
                    award,
                })
            },
        )
    }

    pub fn delete_habit(&mut self, id: i64) -> LedgerResult<()> {
        self.unit("delete_habit", &[Collection::Habits], |tx, owner| {
            let n = tx.execute(
                "DELETE FROM habits WHERE id=?1 AND owner_id=?2",
                params![id, owner],
            )?;
            if n == 0 {
                return Err(LedgerError::not_found("habit", id));
            }
            Ok(())
        })
    }

    pub fn add_task(
        &mut self,
        title: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> LedgerResult<i64> {
        if title.trim().is_empty() {
            return Err(LedgerError::Validation("task title must not be empty".into()));
        }
        let title = title.trim().to_string();
        self.unit("add_task", &[Collection::Tasks], |tx, owner| {
            tx.execute(
                "INSERT INTO tasks(owner_id, title, priority, due_date, completed)
                 VALUES (?1,?2,?3,?4,0)",
                params![owner, title, priority.as_str(), due_date],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Flips the task's completion. Completing pays [`TASK_POINTS`].
    pub fn toggle_task(&mut self, id: i64, today: NaiveDate) -> LedgerResult<Toggle> {
        self.unit(
            "toggle_task",
            &[Collection::Tasks, Collection::Gamify],
            |tx, owner| {
                let task = store::get_task(tx, owner, id)?
                    .ok_or_else(|| LedgerError::not_found("task", id))?;
                let completed = !task.completed;
                tx.execute(
                    "UPDATE tasks SET completed=?1 WHERE id=?2 AND owner_id=?3",
                    params![completed, id, owner],
                )?;
                let award = if completed {
                    Some(pay(tx, owner, TASK_POINTS, today)?)
                } else {
                    None
                };
                Ok(Toggle {
                    completed,
                    streak: 0,
                    award,
                })
            },
        )
    }

    pub fn delete_task(&mut self, id: i64) -> LedgerResult<()> {
        self.unit("delete_task", &[Collection::Tasks], |tx, owner| {
            let n = tx.execute(
                "DELETE FROM tasks WHERE id=?1 AND owner_id=?2",
                params![id, owner],
            )?;
            if n == 0 {
                return Err(LedgerError::not_found("task", id));
            }
            Ok(())
        })
    }

    /// Adds an unpinned note. A note needs a title or some content.
    pub fn add_note(&mut self, title: &str, content: &str, color: &str) -> LedgerResult<i64> {
        if title.trim().is_empty() && content.trim().is_empty() {
            return Err(LedgerError::Validation("note must have a title or content".into()));
        }
        let color = if color.trim().is_empty() { DEFAULT_NOTE_COLOR } else { color.trim() };
        let (title, content, color) = (title.trim().to_string(), content.to_string(), color.to_string());
        self.unit("add_note", &[Collection::Notes], |tx, owner| {
            tx.execute(
                "INSERT INTO notes(owner_id, title, content, color, pinned)
                 VALUES (?1,?2,?3,?4,0)",
                params![owner, title, content, color],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    pub fn update_note(&mut self, id: i64, update: NoteUpdate) -> LedgerResult<()> {
        self.unit("update_note", &[Collection::Notes], |tx, owner| {
            let mut note = store::get_note(tx, owner, id)?
                .ok_or_else(|| LedgerError::not_found("note", id))?;
            if let Some(title) = &update.title {
                note.title = title.trim().to_string();
            }
            if let Some(content) = &update.content {
                note.content = content.clone();
            }
            if let Some(color) = &update.color {
                note.color = color.trim().to_string();
            }
            if let Some(pinned) = update.pinned {
                note.pinned = pinned;
            }
            if note.title.trim().is_empty() && note.content.trim().is_empty() {
                return Err(LedgerError::Validation("note must have a title or content".into()));
            }
            tx.execute(
                "UPDATE notes SET title=?1, content=?2, color=?3, pinned=?4
                 WHERE id=?5 AND owner_id=?6",
                params![note.title, note.content, note.color, note.pinned, id, owner],
            )?;
            Ok(())
        })
    }

    /// Flips the pin and returns the new state.
    pub fn toggle_note_pin(&mut self, id: i64) -> LedgerResult<bool> {
        self.unit("toggle_note_pin", &[Collection::Notes], |tx, owner| {
            let note = store::get_note(tx, owner, id)?
                .ok_or_else(|| LedgerError::not_found("note", id))?;
            tx.execute(
                "UPDATE notes SET pinned=?1 WHERE id=?2 AND owner_id=?3",
                params![!note.pinned, id, owner],
            )?;
            Ok(!note.pinned)
        })
    }

    pub fn delete_note(&mut self, id: i64) -> LedgerResult<()> {
        self.unit("delete_note", &[Collection::Notes], |tx, owner| {
            let n = tx.execute(
                "DELETE FROM notes WHERE id=?1 AND owner_id=?2",
                params![id, owner],
            )?;
            if n == 0 {
                return Err(LedgerError::not_found("note", id));
            }
            Ok(())
        })
    }

    /// Daily login bookkeeping. The first login ever creates the profile
    /// with a streak of one.
    pub fn process_login(&mut self, today: NaiveDate) -> LedgerResult<LoginOutcome> {
        self.unit("process_login", &[Collection::Gamify], |tx, owner| {
            let Some(mut profile) = store::get_profile(tx, owner)? else {
                let profile = GamifyProfile::fresh(owner, today);
                store::save_profile(tx, &profile)?;
                return Ok(LoginOutcome {
                    processed: true,
                    streak: profile.login_streak,
                    bonus: None,
                });
            };
            let outcome = streaks::process_login(&mut profile, today);
            if outcome.processed {
                store::save_profile(tx, &profile)?;
            }
            Ok(outcome)
        })
    }

    pub fn award_points(&mut self, base: i64, today: NaiveDate) -> LedgerResult<Award> {
        if base < 0 {
            return Err(LedgerError::Validation(format!(
                "points must not be negative (got {})",
                base
            )));
        }
        self.unit("award_points", &[Collection::Gamify], |tx, owner| {
            pay(tx, owner, base, today)
        })
    }

    pub fn profile(&self) -> LedgerResult<Option<GamifyProfile>> {
        store::get_profile(&self.conn, &self.owner)
    }
}
