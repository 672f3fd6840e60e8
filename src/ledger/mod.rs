// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger engine: one [`Ledger`] per session, owning the store
//! connection and the change feed. Mutations live in `recorder` (finance)
//! and `productivity` (habits, tasks, gamification); the derivations in
//! `aggregator`, `projector` and `streaks` are pure.

pub mod aggregator;
pub mod feed;
pub mod productivity;
pub mod projector;
pub mod recorder;
pub mod streaks;

use std::sync::mpsc::Receiver;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{info, warn};

use crate::error::LedgerResult;
use crate::store::Snapshot;
use feed::{Change, ChangeFeed, Collection};

/// Attempts per unit when another writer holds the store lock.
pub const MAX_ATTEMPTS: u32 = 3;

pub struct Ledger {
    conn: Connection,
    owner: String,
    feed: ChangeFeed,
}

impl Ledger {
    pub fn new(conn: Connection, owner: impl Into<String>) -> Self {
        Ledger {
            conn,
            owner: owner.into(),
            feed: ChangeFeed::default(),
        }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn subscribe(&mut self, collections: &[Collection]) -> Receiver<Change> {
        self.feed.subscribe(collections)
    }

    pub fn snapshot(&self) -> LedgerResult<Snapshot> {
        Snapshot::load(&self.conn, &self.owner)
    }

    /// Runs `op` as one store transaction taken with the write lock up front,
    /// so the balance reads inside it cannot go stale before the matching
    /// writes land. Busy failures are retried; anything else rolls back and
    /// is returned. `touched` collections are published after commit.
    fn unit<T, F>(&mut self, name: &'static str, touched: &[Collection], mut op: F) -> LedgerResult<T>
    where
        F: FnMut(&Transaction<'_>, &str) -> LedgerResult<T>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_unit(&mut op) {
                Ok(value) => {
                    info!(op = name, owner = %self.owner, "committed");
                    for collection in touched {
                        self.feed.publish(Change {
                            collection: *collection,
                            op: name,
                        });
                    }
                    return Ok(value);
                }
                Err(err) if err.is_busy() && attempt < MAX_ATTEMPTS => {
                    warn!(op = name, attempt, "store busy, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn try_unit<T, F>(&mut self, op: &mut F) -> LedgerResult<T>
    where
        F: FnMut(&Transaction<'_>, &str) -> LedgerResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = op(&tx, &self.owner)?;
        tx.commit()?;
        Ok(value)
    }
}
