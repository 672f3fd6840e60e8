// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Meal, Purchase, Wallet};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub spent: Decimal,
    pub remaining: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_balance: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
}

/// Sum that clamps at the decimal range instead of panicking.
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

/// Sums meal and purchase amounts per wallet id.
pub fn spent_by_wallet(meals: &[Meal], purchases: &[Purchase]) -> HashMap<i64, Decimal> {
    let mut spent: HashMap<i64, Decimal> = HashMap::new();
    let pairs = meals
        .iter()
        .map(|m| (m.wallet_id, m.amount))
        .chain(purchases.iter().map(|p| (p.wallet_id, p.amount)));
    for (wallet_id, amount) in pairs {
        let total = spent.entry(wallet_id).or_insert(Decimal::ZERO);
        *total = total.saturating_add(amount);
    }
    spent
}

pub fn summarize(wallets: &[Wallet], meals: &[Meal], purchases: &[Purchase]) -> Vec<WalletSummary> {
    let spent = spent_by_wallet(meals, purchases);
    wallets
        .iter()
        .map(|w| {
            let s = spent.get(&w.id).copied().unwrap_or(Decimal::ZERO);
            WalletSummary {
                wallet: w.clone(),
                spent: s,
                remaining: w.balance.saturating_sub(s),
            }
        })
        .collect()
}

/// Totals across every wallet. Spend on wallets that no longer exist still
/// counts toward `total_spent`.
pub fn global_stats(wallets: &[Wallet], meals: &[Meal], purchases: &[Purchase]) -> GlobalStats {
    let total_balance = saturating_sum(wallets.iter().map(|w| w.balance));
    let total_spent = saturating_sum(
        meals
            .iter()
            .map(|m| m.amount)
            .chain(purchases.iter().map(|p| p.amount)),
    );
    GlobalStats {
        total_balance,
        total_spent,
        total_remaining: total_balance.saturating_sub(total_spent),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recent {
    pub label: String,
    pub amount: Decimal,
    pub kind: &'static str,
    pub category: String,
    pub count: usize,
}

/// Most frequent `(item, amount)` pairs across meals and purchases, for
/// one-tap re-entry. Ties keep first-seen order.
pub fn smart_recents(meals: &[Meal], purchases: &[Purchase], limit: usize) -> Vec<Recent> {
    let mut order: Vec<Recent> = Vec::new();
    let mut index: HashMap<(String, Decimal), usize> = HashMap::new();
    let history = meals
        .iter()
        .map(|m| (m.item.clone(), m.amount, "meal", "Food".to_string()))
        .chain(
            purchases
                .iter()
                .map(|p| (p.item.clone(), p.amount, "purchase", p.category.clone())),
        );
    for (label, amount, kind, category) in history {
        let key = (label.clone(), amount.normalize());
        match index.get(&key) {
            Some(&i) => order[i].count += 1,
            None => {
                index.insert(key, order.len());
                order.push(Recent {
                    label,
                    amount,
                    kind,
                    category,
                    count: 1,
                });
            }
        }
    }
    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.truncate(limit);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WalletType;
    use chrono::NaiveDate;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn wallet(id: i64, balance: &str) -> Wallet {
        Wallet {
            id,
            owner_id: "u".into(),
            name: format!("W{}", id),
            r#type: WalletType::Asset,
            balance: d(balance),
            opening_balance: d(balance),
        }
    }

    fn meal(wallet_id: i64, amount: &str, item: &str) -> Meal {
        Meal {
            id: 0,
            owner_id: "u".into(),
            wallet_id,
            date: day(),
            amount: d(amount),
            meal_type: "Lunch".into(),
            item: item.into(),
        }
    }

    fn purchase(wallet_id: i64, amount: &str, item: &str) -> Purchase {
        Purchase {
            id: 0,
            owner_id: "u".into(),
            wallet_id,
            date: day(),
            amount: d(amount),
            category: "Groceries".into(),
            item: item.into(),
        }
    }

    #[test]
    fn spent_is_order_independent() {
        let wallets = vec![wallet(1, "100"), wallet(2, "50")];
        let mut meals = vec![meal(1, "10.50", "Dal"), meal(2, "4", "Tea")];
        let purchases = vec![purchase(1, "20", "Rice")];
        let a = summarize(&wallets, &meals, &purchases);
        meals.reverse();
        let b = summarize(&wallets, &meals, &purchases);
        assert_eq!(a[0].spent, d("30.50"));
        assert_eq!(a[0].remaining, d("69.50"));
        assert_eq!(a[1].spent, b[1].spent);
        assert_eq!(a[0].spent, b[0].spent);
    }

    #[test]
    fn removing_a_record_lowers_spent_by_its_amount() {
        let wallets = vec![wallet(1, "100")];
        let meals = vec![meal(1, "10", "Dal"), meal(1, "7.25", "Roti")];
        let before = summarize(&wallets, &meals, &[])[0].spent;
        let after = summarize(&wallets, &meals[..1], &[])[0].spent;
        assert_eq!(before - after, d("7.25"));
    }

    #[test]
    fn totals_clamp_instead_of_overflowing() {
        let wallets = vec![wallet(1, "79228162514264337593543950335"), wallet(2, "1")];
        let meals = vec![meal(1, "79228162514264337593543950335", "Feast"), meal(2, "5", "Tea")];
        let stats = global_stats(&wallets, &meals, &[]);
        assert_eq!(stats.total_balance, Decimal::MAX);
        assert_eq!(stats.total_spent, Decimal::MAX);
        assert_eq!(stats.total_remaining, Decimal::ZERO);
        assert_eq!(spent_by_wallet(&meals, &[])[&1], Decimal::MAX);
    }

    #[test]
    fn wallet_without_expenses_keeps_full_balance() {
        let rows = summarize(&[wallet(9, "42")], &[], &[]);
        assert_eq!(rows[0].spent, Decimal::ZERO);
        assert_eq!(rows[0].remaining, d("42"));
    }

    #[test]
    fn global_stats_include_orphaned_spend() {
        let stats = global_stats(&[wallet(1, "100")], &[meal(7, "5", "x")], &[]);
        assert_eq!(stats.total_spent, d("5"));
        assert_eq!(stats.total_remaining, d("95"));
    }

    #[test]
    fn recents_rank_by_frequency() {
        let meals = vec![meal(1, "3", "Tea"), meal(1, "3.00", "Tea"), meal(1, "8", "Dal")];
        let purchases = vec![purchase(1, "3", "Tea")];
        let recents = smart_recents(&meals, &purchases, 10);
        assert_eq!(recents[0].label, "Tea");
        assert_eq!(recents[0].kind, "meal");
        assert_eq!(recents[0].count, 3);
        assert_eq!(recents.len(), 2);
        assert_eq!(smart_recents(&meals, &purchases, 1).len(), 1);
    }
}
