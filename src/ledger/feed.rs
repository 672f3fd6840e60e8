// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Change notification between the recorder and whatever derives views from
//! the store. The recorder publishes after every committed unit; the
//! [`Coordinator`] drains its receiver and reruns the pure derivations.

use std::collections::HashSet;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::aggregator::{self, GlobalStats, WalletSummary};
use super::projector::{self, BudgetReport};
use super::Ledger;
use crate::error::LedgerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Wallets,
    Meals,
    Purchases,
    Incomes,
    Transfers,
    Goals,
    GoalDeposits,
    Budgets,
    Categories,
    Habits,
    Tasks,
    Notes,
    Gamify,
}

impl Collection {
    pub const ALL: [Collection; 13] = [
        Collection::Wallets,
        Collection::Meals,
        Collection::Purchases,
        Collection::Incomes,
        Collection::Transfers,
        Collection::Goals,
        Collection::GoalDeposits,
        Collection::Budgets,
        Collection::Categories,
        Collection::Habits,
        Collection::Tasks,
        Collection::Notes,
        Collection::Gamify,
    ];

    /// Collections the finance views are derived from.
    pub const FINANCE: [Collection; 9] = [
        Collection::Wallets,
        Collection::Meals,
        Collection::Purchases,
        Collection::Incomes,
        Collection::Transfers,
        Collection::Goals,
        Collection::GoalDeposits,
        Collection::Budgets,
        Collection::Categories,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Wallets => "wallets",
            Collection::Meals => "meals",
            Collection::Purchases => "purchases",
            Collection::Incomes => "incomes",
            Collection::Transfers => "transfers",
            Collection::Goals => "goals",
            Collection::GoalDeposits => "goal_deposits",
            Collection::Budgets => "budgets",
            Collection::Categories => "categories",
            Collection::Habits => "habits",
            Collection::Tasks => "tasks",
            Collection::Notes => "notes",
            Collection::Gamify => "gamify",
        }
    }

    pub fn from_name(name: &str) -> Option<Collection> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == name.trim())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One committed write to a collection. `op` names the recorder operation
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub collection: Collection,
    pub op: &'static str,
}

struct Subscriber {
    filter: HashSet<Collection>,
    tx: Sender<Change>,
}

#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Vec<Subscriber>,
}

impl ChangeFeed {
    pub fn subscribe(&mut self, collections: &[Collection]) -> Receiver<Change> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(Subscriber {
            filter: collections.iter().copied().collect(),
            tx,
        });
        rx
    }

    /// Delivers `change` to every interested subscriber, dropping the ones
    /// whose receiver has gone away.
    pub fn publish(&mut self, change: Change) {
        self.subscribers.retain(|s| {
            if !s.filter.contains(&change.collection) {
                return true;
            }
            s.tx.send(change.clone()).is_ok()
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Derived finance views, recomputed from a fresh snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Views {
    pub wallets: Vec<WalletSummary>,
    pub stats: GlobalStats,
    pub budget: BudgetReport,
}

pub struct Coordinator {
    rx: Receiver<Change>,
    views: Option<Views>,
    recomputes: usize,
}

impl Coordinator {
    pub fn attach(ledger: &mut Ledger) -> Self {
        Coordinator {
            rx: ledger.subscribe(&Collection::FINANCE),
            views: None,
            recomputes: 0,
        }
    }

    /// Drains pending notifications and recomputes the views when anything
    /// changed (or nothing has been computed yet). Returns whether a
    /// recompute happened.
    pub fn refresh(&mut self, ledger: &Ledger, today: NaiveDate) -> LedgerResult<bool> {
        let pending: Vec<Change> = self.rx.try_iter().collect();
        if pending.is_empty() && self.views.is_some() {
            return Ok(false);
        }
        debug!(changes = pending.len(), "recomputing finance views");
        let snap = ledger.snapshot()?;
        let views = Views {
            wallets: aggregator::summarize(&snap.wallets, &snap.meals, &snap.purchases),
            stats: aggregator::global_stats(&snap.wallets, &snap.meals, &snap.purchases),
            budget: projector::project(
                &snap.categories,
                &snap.budgets,
                &snap.meals,
                &snap.purchases,
                &snap.incomes,
                today,
            ),
        };
        self.views = Some(views);
        self.recomputes += 1;
        Ok(true)
    }

    pub fn views(&self) -> Option<&Views> {
        self.views.as_ref()
    }

    pub fn recomputes(&self) -> usize {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_respects_filters() {
        let mut feed = ChangeFeed::default();
        let wallets = feed.subscribe(&[Collection::Wallets]);
        let habits = feed.subscribe(&[Collection::Habits]);
        feed.publish(Change {
            collection: Collection::Wallets,
            op: "add_wallet",
        });
        assert_eq!(wallets.try_iter().count(), 1);
        assert_eq!(habits.try_iter().count(), 0);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut feed = ChangeFeed::default();
        let rx = feed.subscribe(&[Collection::Meals]);
        drop(rx);
        feed.publish(Change {
            collection: Collection::Meals,
            op: "add_meal",
        });
        assert_eq!(feed.subscriber_count(), 0);
    }
}
