// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures surfaced by the ledger engine.
///
/// Validation variants are raised before anything is written; `Store`
/// failures abort the whole unit of work they occurred in.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Source and destination wallet must differ (wallet {0})")]
    SameWallet(i64),
    #[error("Invalid amount {amount} for {what}")]
    InvalidAmount { what: &'static str, amount: Decimal },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Wallet not found: {0}")]
    WalletNotFound(i64),
    #[error("Goal not found: {0}")]
    GoalNotFound(i64),
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: &'static str, id: String },
    #[error("Corrupt value '{value}' in {table}.{column}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        value: String,
    },
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        LedgerError::RecordNotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True when the store refused the unit because another connection held
    /// the write lock past the busy timeout.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            LedgerError::Store(rusqlite::Error::SqliteFailure(e, _))
                if matches!(
                    e.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                )
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::SameWallet(_)
                | LedgerError::InvalidAmount { .. }
                | LedgerError::Validation(_)
                | LedgerError::WalletNotFound(_)
                | LedgerError::GoalNotFound(_)
        )
    }
}
