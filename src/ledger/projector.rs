// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregator::saturating_sum;
use crate::models::{Budget, Category, Income, Meal, Purchase};
use crate::utils::days_in_month;

/// Meals are not categorised individually; they all land here.
pub const MEAL_CATEGORY: &str = "Food";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthClock {
    pub days_in_month: u32,
    pub days_passed: u32,
    /// Includes today.
    pub days_left: u32,
}

impl MonthClock {
    pub fn for_date(today: NaiveDate) -> Self {
        let days_in_month = days_in_month(today.year(), today.month());
        let days_passed = today.day();
        MonthClock {
            days_in_month,
            days_passed,
            days_left: (days_in_month + 1).saturating_sub(days_passed),
        }
    }

    fn elapsed_pct(&self) -> Decimal {
        pct(
            Decimal::from(self.days_passed),
            Decimal::from(self.days_in_month),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProjection {
    pub category_id: String,
    pub label: String,
    pub spent: Decimal,
    pub limit: Decimal,
    pub remaining: Decimal,
    pub progress_pct: Decimal,
    pub daily_safe_spend: Decimal,
    pub is_over: bool,
    pub is_spending_fast: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub month: String,
    pub clock: MonthClock,
    pub categories: Vec<CategoryProjection>,
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub monthly_income: Decimal,
    pub projected_spend: Decimal,
    pub is_projected_over: bool,
    pub income_allocation_pct: Decimal,
}

/// `num / den * 100`, or zero when `den` is zero. Clamps at the decimal
/// range.
fn pct(num: Decimal, den: Decimal) -> Decimal {
    if den.is_zero() {
        return Decimal::ZERO;
    }
    num.checked_div(den)
        .map(|q| q.saturating_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

fn same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Per-category projection for a single category.
pub fn project_category(
    category: &Category,
    spent: Decimal,
    limit: Decimal,
    clock: MonthClock,
) -> CategoryProjection {
    let remaining = limit.saturating_sub(spent);
    let daily_safe_spend = if clock.days_left == 0 {
        Decimal::ZERO
    } else {
        remaining.max(Decimal::ZERO) / Decimal::from(clock.days_left)
    };
    let progress_pct = pct(spent, limit);
    CategoryProjection {
        category_id: category.id.clone(),
        label: category.label.clone(),
        spent,
        limit,
        remaining,
        progress_pct,
        daily_safe_spend,
        is_over: remaining < Decimal::ZERO,
        is_spending_fast: limit > Decimal::ZERO && progress_pct > clock.elapsed_pct(),
    }
}

/// Month-to-date budget view for the month containing `today`.
///
/// Spend only counts toward categories that exist; purchases tagged with an
/// unknown category and budgets for deleted categories are ignored.
pub fn project(
    categories: &[Category],
    budgets: &[Budget],
    meals: &[Meal],
    purchases: &[Purchase],
    incomes: &[Income],
    today: NaiveDate,
) -> BudgetReport {
    let clock = MonthClock::for_date(today);

    let mut spent: HashMap<&str, Decimal> = categories
        .iter()
        .map(|c| (c.id.as_str(), Decimal::ZERO))
        .collect();
    for m in meals.iter().filter(|m| same_month(m.date, today)) {
        if let Some(s) = spent.get_mut(MEAL_CATEGORY) {
            *s = s.saturating_add(m.amount);
        }
    }
    for p in purchases.iter().filter(|p| same_month(p.date, today)) {
        if let Some(s) = spent.get_mut(p.category.as_str()) {
            *s = s.saturating_add(p.amount);
        }
    }

    let limits: HashMap<&str, Decimal> = budgets
        .iter()
        .filter(|b| spent.contains_key(b.category_id.as_str()))
        .map(|b| (b.category_id.as_str(), b.limit))
        .collect();

    let rows: Vec<CategoryProjection> = categories
        .iter()
        .map(|c| {
            let s = spent.get(c.id.as_str()).copied().unwrap_or(Decimal::ZERO);
            let l = limits.get(c.id.as_str()).copied().unwrap_or(Decimal::ZERO);
            project_category(c, s, l, clock)
        })
        .collect();

    let total_limit = saturating_sum(limits.values().copied());
    let total_spent = saturating_sum(rows.iter().map(|r| r.spent));
    let monthly_income = saturating_sum(
        incomes
            .iter()
            .filter(|i| same_month(i.date, today))
            .map(|i| i.amount),
    );

    let projected_spend = if clock.days_passed == 0 {
        Decimal::ZERO
    } else {
        (total_spent / Decimal::from(clock.days_passed))
            .saturating_mul(Decimal::from(clock.days_in_month))
    };

    BudgetReport {
        month: today.format("%Y-%m").to_string(),
        clock,
        categories: rows,
        total_limit,
        total_spent,
        monthly_income,
        projected_spend,
        is_projected_over: total_limit > Decimal::ZERO && projected_spend > total_limit,
        income_allocation_pct: pct(total_limit, monthly_income).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cat(id: &str) -> Category {
        Category {
            id: id.into(),
            owner_id: "u".into(),
            label: id.into(),
            icon: String::new(),
            color: String::new(),
            is_default: true,
        }
    }

    fn budget(category: &str, limit: &str) -> Budget {
        Budget {
            id: format!("u_{}", category),
            owner_id: "u".into(),
            category_id: category.into(),
            limit: d(limit),
        }
    }

    fn purchase(category: &str, amount: &str, on: NaiveDate) -> Purchase {
        Purchase {
            id: 0,
            owner_id: "u".into(),
            wallet_id: 1,
            date: on,
            amount: d(amount),
            category: category.into(),
            item: "x".into(),
        }
    }

    #[test]
    fn month_clock_counts_today_as_left() {
        let c = MonthClock::for_date(date(2024, 2, 10));
        assert_eq!(c.days_in_month, 29);
        assert_eq!(c.days_passed, 10);
        assert_eq!(c.days_left, 20);
        let last = MonthClock::for_date(date(2025, 4, 30));
        assert_eq!(last.days_left, 1);
    }

    #[test]
    fn zero_limit_never_divides() {
        let clock = MonthClock::for_date(date(2025, 6, 15));
        let p = project_category(&cat("Travel"), d("40"), Decimal::ZERO, clock);
        assert_eq!(p.remaining, d("-40"));
        assert_eq!(p.daily_safe_spend, Decimal::ZERO);
        assert_eq!(p.progress_pct, Decimal::ZERO);
        assert!(!p.is_spending_fast);
        assert!(p.is_over);
    }

    #[test]
    fn zero_days_left_yields_zero_daily_spend() {
        let clock = MonthClock {
            days_in_month: 30,
            days_passed: 31,
            days_left: 0,
        };
        let p = project_category(&cat("Food"), d("10"), d("100"), clock);
        assert_eq!(p.daily_safe_spend, Decimal::ZERO);
    }

    #[test]
    fn burn_rate_ahead_of_calendar_is_fast() {
        // Day 10 of 30: a third of the month; half the budget gone.
        let clock = MonthClock::for_date(date(2025, 6, 10));
        let fast = project_category(&cat("Food"), d("50"), d("100"), clock);
        assert!(fast.is_spending_fast);
        assert_eq!(fast.daily_safe_spend, d("50") / d("21"));
        let slow = project_category(&cat("Food"), d("20"), d("100"), clock);
        assert!(!slow.is_spending_fast);
    }

    #[test]
    fn run_rate_projection_and_totals() {
        let today = date(2025, 6, 10);
        let cats = vec![cat("Food"), cat("Groceries"), cat("Travel")];
        let budgets = vec![budget("Groceries", "200"), budget("Gone", "999")];
        let meals = vec![Meal {
            id: 1,
            owner_id: "u".into(),
            wallet_id: 1,
            date: date(2025, 6, 2),
            amount: d("30"),
            meal_type: "Lunch".into(),
            item: "Dal".into(),
        }];
        let purchases = vec![
            purchase("Groceries", "70", date(2025, 6, 3)),
            purchase("Groceries", "500", date(2025, 5, 30)),
            purchase("Unknown", "12", date(2025, 6, 4)),
        ];
        let incomes = vec![Income {
            id: 1,
            owner_id: "u".into(),
            wallet_id: 1,
            date: date(2025, 6, 1),
            amount: d("800"),
            source: "Salary".into(),
        }];
        let report = project(&cats, &budgets, &meals, &purchases, &incomes, today);
        assert_eq!(report.month, "2025-06");
        assert_eq!(report.total_spent, d("100"));
        assert_eq!(report.total_limit, d("200"));
        assert_eq!(report.projected_spend, d("300"));
        assert!(report.is_projected_over);
        assert_eq!(report.monthly_income, d("800"));
        assert_eq!(report.income_allocation_pct, d("25"));
        let food = &report.categories[0];
        assert_eq!(food.spent, d("30"));
        assert_eq!(food.limit, Decimal::ZERO);
        assert!(!food.is_spending_fast);
    }

    #[test]
    fn no_budgets_never_projects_over() {
        let today = date(2025, 6, 10);
        let report = project(
            &[cat("Groceries")],
            &[],
            &[],
            &[purchase("Groceries", "900", today)],
            &[],
            today,
        );
        assert_eq!(report.total_limit, Decimal::ZERO);
        assert!(!report.is_projected_over);
        assert_eq!(report.income_allocation_pct, Decimal::ZERO);
    }
}
