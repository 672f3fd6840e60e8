// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Habit streaks, the daily login streak, and the points/level/badge
//! progression. Everything here is a pure transition on in-memory values;
//! persistence lives in `ledger::productivity`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{GamifyProfile, Habit, Task};

pub const LEVEL_STEP: i64 = 500;
pub const MAX_LEVEL: u32 = 10;
pub const HOT_STREAK_DAYS: u32 = 7;
pub const HOT_STREAK_MULTIPLIER: i64 = 2;
pub const ON_FIRE_BADGE: &str = "On Fire";
pub const ON_FIRE_BONUS: i64 = 100;
pub const HABIT_POINTS: i64 = 10;
pub const TASK_POINTS: i64 = 50;

/// Point badges, granted the first time the total reaches the threshold.
pub const POINT_BADGES: [(&str, i64); 4] = [
    ("Bronze", 500),
    ("Silver", 1500),
    ("Gold", 3000),
    ("Platinum", 5000),
];

/// Consecutive completed days ending today, or ending yesterday when today
/// is not (yet) completed.
pub fn habit_streak(completed: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = u32::from(completed.contains(&today));
    let mut cursor = today.pred_opt();
    while let Some(day) = cursor {
        if !completed.contains(&day) {
            break;
        }
        count += 1;
        cursor = day.pred_opt();
    }
    count
}

/// Flips `day` in the habit's completion set and restores the stored streak.
/// Returns true when the day is now completed.
pub fn toggle_day(habit: &mut Habit, day: NaiveDate, today: NaiveDate) -> bool {
    let completed = if habit.completed_dates.remove(&day) {
        false
    } else {
        habit.completed_dates.insert(day);
        true
    };
    habit.streak = habit_streak(&habit.completed_dates, today);
    completed
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub base: i64,
    pub multiplier: i64,
    pub granted: i64,
    pub leveled_up: bool,
    pub new_badges: Vec<String>,
}

/// Adds `base` points (doubled during a hot login streak), bumps the level
/// by at most one, and grants any point badges now reached.
///
/// A single award never raises the level by more than one even if the new
/// total passes several thresholds; the next award picks up the slack.
pub fn award(profile: &mut GamifyProfile, base: i64) -> Award {
    let multiplier = if profile.login_streak >= HOT_STREAK_DAYS {
        HOT_STREAK_MULTIPLIER
    } else {
        1
    };
    let granted = base.saturating_mul(multiplier);
    profile.points = profile.points.saturating_add(granted);

    let threshold = i64::from(profile.level) * LEVEL_STEP;
    let leveled_up = profile.level < MAX_LEVEL && profile.points >= threshold;
    if leveled_up {
        profile.level += 1;
    }

    let mut new_badges = Vec::new();
    for (name, min) in POINT_BADGES {
        if profile.points >= min && profile.badges.insert(name.to_string()) {
            new_badges.push(name.to_string());
        }
    }

    Award {
        base,
        multiplier,
        granted,
        leveled_up,
        new_badges,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    /// False when today had already been processed.
    pub processed: bool,
    pub streak: u32,
    pub bonus: Option<Award>,
}

/// Daily login transition. Same day is a no-op; a login the day after the
/// last one extends the streak, anything else restarts it at 1. Reaching
/// the hot streak grants "On Fire" and its bonus once.
pub fn process_login(profile: &mut GamifyProfile, today: NaiveDate) -> LoginOutcome {
    if profile.last_login_date == Some(today) {
        return LoginOutcome {
            processed: false,
            streak: profile.login_streak,
            bonus: None,
        };
    }

    let continued = profile.last_login_date.is_some() && profile.last_login_date == today.pred_opt();
    profile.login_streak = if continued {
        profile.login_streak.saturating_add(1)
    } else {
        1
    };

    let mut bonus = None;
    if profile.login_streak >= HOT_STREAK_DAYS && !profile.badges.contains(ON_FIRE_BADGE) {
        profile.badges.insert(ON_FIRE_BADGE.to_string());
        bonus = Some(award(profile, ON_FIRE_BONUS));
    }
    profile.last_login_date = Some(today);

    LoginOutcome {
        processed: true,
        streak: profile.login_streak,
        bonus,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub task_progress_pct: f64,
    pub total_habits: usize,
    pub completed_habits: usize,
    pub habit_progress_pct: f64,
}

fn share(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}

/// Progress for `today`: tasks due today and habits ticked today.
pub fn daily_stats(tasks: &[Task], habits: &[Habit], today: NaiveDate) -> DailyStats {
    let due: Vec<&Task> = tasks.iter().filter(|t| t.due_date == Some(today)).collect();
    let completed_tasks = due.iter().filter(|t| t.completed).count();
    let completed_habits = habits
        .iter()
        .filter(|h| h.completed_dates.contains(&today))
        .count();
    DailyStats {
        total_tasks: due.len(),
        completed_tasks,
        task_progress_pct: share(completed_tasks, due.len()),
        total_habits: habits.len(),
        completed_habits,
        habit_progress_pct: share(completed_habits, habits.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn profile(points: i64, level: u32, streak: u32, last: Option<NaiveDate>) -> GamifyProfile {
        GamifyProfile {
            owner_id: "u".into(),
            points,
            level,
            badges: BTreeSet::new(),
            login_streak: streak,
            last_login_date: last,
        }
    }

    #[test]
    fn streak_counts_back_from_today() {
        let dates: BTreeSet<_> = [today(), ago(1), ago(2)].into_iter().collect();
        assert_eq!(habit_streak(&dates, today()), 3);
    }

    #[test]
    fn gap_yesterday_leaves_today_only() {
        let dates: BTreeSet<_> = [today(), ago(3)].into_iter().collect();
        assert_eq!(habit_streak(&dates, today()), 1);
    }

    #[test]
    fn streak_survives_until_today_is_ticked() {
        // Crosses the month boundary on the way back.
        let dates: BTreeSet<_> = [ago(1), ago(2)].into_iter().collect();
        assert_eq!(habit_streak(&dates, today()), 2);
        assert_eq!(habit_streak(&BTreeSet::new(), today()), 0);
    }

    #[test]
    fn huge_award_clamps_points() {
        let mut p = profile(i64::MAX - 5, 10, 7, Some(today()));
        let a = award(&mut p, i64::MAX);
        assert_eq!(a.granted, i64::MAX);
        assert_eq!(p.points, i64::MAX);
        assert_eq!(p.level, MAX_LEVEL);
    }

    #[test]
    fn toggle_twice_restores_streak() {
        let mut habit = Habit {
            id: 1,
            owner_id: "u".into(),
            name: "Read".into(),
            color: String::new(),
            completed_dates: [ago(1)].into_iter().collect(),
            streak: 1,
        };
        assert!(toggle_day(&mut habit, today(), today()));
        assert_eq!(habit.streak, 2);
        assert!(!toggle_day(&mut habit, today(), today()));
        assert_eq!(habit.streak, 1);
    }

    #[test]
    fn login_after_gap_resets_to_one() {
        let mut p = profile(0, 1, 5, Some(ago(2)));
        let out = process_login(&mut p, today());
        assert!(out.processed);
        assert_eq!(p.login_streak, 1);
        assert_eq!(p.last_login_date, Some(today()));
    }

    #[test]
    fn same_day_login_is_noop() {
        let mut p = profile(0, 1, 3, Some(today()));
        let before = p.clone();
        let out = process_login(&mut p, today());
        assert!(!out.processed);
        assert_eq!(p, before);
    }

    #[test]
    fn seventh_day_grants_on_fire_once() {
        let mut p = profile(0, 1, 6, Some(ago(1)));
        let out = process_login(&mut p, today());
        assert_eq!(out.streak, 7);
        let bonus = out.bonus.unwrap();
        assert_eq!(bonus.multiplier, 2);
        assert_eq!(p.points, 200);
        assert!(p.badges.contains(ON_FIRE_BADGE));

        let tomorrow = today().succ_opt().unwrap();
        let again = process_login(&mut p, tomorrow);
        assert_eq!(again.streak, 8);
        assert!(again.bonus.is_none());
        assert_eq!(p.points, 200);
    }

    #[test]
    fn hot_streak_doubles_awards() {
        let mut p = profile(0, 1, 7, Some(today()));
        assert_eq!(award(&mut p, HABIT_POINTS).granted, 20);
        let mut cold = profile(0, 1, 2, Some(today()));
        assert_eq!(award(&mut cold, HABIT_POINTS).granted, 10);
    }

    #[test]
    fn level_rises_once_per_award() {
        let mut p = profile(0, 1, 1, None);
        let a = award(&mut p, 1200);
        assert!(a.leveled_up);
        assert_eq!(p.level, 2);
        // Still past the level-2 threshold: the next award catches up one step.
        let b = award(&mut p, 0);
        assert!(b.leveled_up);
        assert_eq!(p.level, 3);
        let c = award(&mut p, 0);
        assert!(!c.leveled_up);
        assert_eq!(p.level, 3);
    }

    #[test]
    fn level_caps_at_ten() {
        let mut p = profile(100_000, MAX_LEVEL, 1, None);
        assert!(!award(&mut p, 50).leveled_up);
        assert_eq!(p.level, MAX_LEVEL);
    }

    #[test]
    fn badges_are_granted_once_and_kept() {
        let mut p = profile(1400, 2, 1, None);
        let a = award(&mut p, 200);
        assert_eq!(a.new_badges, vec!["Bronze".to_string(), "Silver".to_string()]);
        let b = award(&mut p, 10);
        assert!(b.new_badges.is_empty());
        assert!(p.badges.contains("Bronze"));
    }

    #[test]
    fn daily_stats_handle_empty_lists() {
        let s = daily_stats(&[], &[], today());
        assert_eq!(s.task_progress_pct, 0.0);
        assert_eq!(s.habit_progress_pct, 0.0);
    }
}
