// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistent Storage Module
//!
//! SQLite-backed account storage with scoped read and write transactions.
//! Every store or fetch runs inside one; a write scope commits when its
//! closure returns `Ok` and rolls back otherwise.

mod accounts;
mod error;
pub mod migration;

pub use error::{StorageError, UpsertOutcome};

use std::ops::Deref;
use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::avatar::{AvatarEncoder, JpegAvatarEncoder};
use crate::config::RosterConfig;

/// SQLite-based account storage.
pub struct Storage {
    conn: Connection,
    /// Encoder used by write scopes to refresh avatar caches
    encoder: Box<dyn AvatarEncoder>,
}

/// A read scope. Sees a consistent snapshot of the store.
pub struct ReadTransaction<'a> {
    tx: Transaction<'a>,
}

/// A write scope. Also usable for reads through `Deref`.
pub struct WriteTransaction<'a> {
    read: ReadTransaction<'a>,
    encoder: &'a dyn AvatarEncoder,
}

impl Storage {
    /// Opens or creates a storage database at the given path.
    pub fn open<P: AsRef<Path>>(path: P, config: RosterConfig) -> Result<Self, StorageError> {
        Self::from_connection(Connection::open(path)?, config)
    }

    /// Creates an in-memory storage (for testing).
    pub fn in_memory(config: RosterConfig) -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?, config)
    }

    fn from_connection(conn: Connection, config: RosterConfig) -> Result<Self, StorageError> {
        let storage = Storage {
            conn,
            encoder: Box::new(JpegAvatarEncoder::new(config.avatar)),
        };
        storage.run_migrations()?;
        Ok(storage)
    }

    /// Replaces the avatar encoder used by write scopes.
    pub fn set_avatar_encoder(&mut self, encoder: Box<dyn AvatarEncoder>) {
        self.encoder = encoder;
    }

    /// Runs all pending schema migrations.
    fn run_migrations(&self) -> Result<(), StorageError> {
        migration::MigrationRunner::run(&self.conn, &migration::all_migrations())
    }

    /// Returns the current schema version.
    pub fn schema_version(&self) -> Result<u32, StorageError> {
        migration::MigrationRunner::current_version(&self.conn)
    }

    /// Runs `f` inside a read transaction.
    pub fn read<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&ReadTransaction<'_>) -> Result<T, StorageError>,
    {
        let tx = ReadTransaction {
            tx: self.conn.unchecked_transaction()?,
        };
        let result = f(&tx)?;
        tx.tx.commit()?;
        Ok(result)
    }

    /// Runs `f` inside a write transaction.
    ///
    /// Takes `&mut self`, so at most one write scope is open at a time.
    /// Commits if `f` returns `Ok`, rolls back otherwise.
    pub fn write<T, F>(&mut self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut WriteTransaction<'_>) -> Result<T, StorageError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut write = WriteTransaction {
            read: ReadTransaction { tx },
            encoder: self.encoder.as_ref(),
        };

        match f(&mut write) {
            Ok(result) => {
                write.read.tx.commit()?;
                Ok(result)
            }
            Err(e) => {
                tracing::debug!(error = %e, "rolling back write transaction");
                if let Err(rollback) = write.read.tx.rollback() {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

impl<'a> WriteTransaction<'a> {
    /// The encoder avatar caches are refreshed with in this scope.
    pub fn avatar_encoder(&self) -> &'a dyn AvatarEncoder {
        self.encoder
    }
}

impl<'a> Deref for WriteTransaction<'a> {
    type Target = ReadTransaction<'a>;

    fn deref(&self) -> &Self::Target {
        &self.read
    }
}
