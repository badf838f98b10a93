// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Storage error types.

use thiserror::Error;

/// Storage error types.
///
/// Any of these surfacing from a write scope means the transaction was
/// rolled back.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Returned by callers to abandon a write scope.
    #[error("Transaction aborted: {0}")]
    Aborted(String),
}

/// Result of [`WriteTransaction::upsert_account_if_changed`](super::WriteTransaction::upsert_account_if_changed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No stored record matched; the record was written.
    Inserted,
    /// A stored record matched but differed; it was replaced.
    Updated,
    /// A stored record with the same content exists; nothing was written.
    Unchanged,
}
