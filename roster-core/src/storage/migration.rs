// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Database Schema Migration Framework
//!
//! Versioned schema migrations with transactional safety. The runner tracks
//! applied versions in a `schema_version` table and runs pending migrations
//! in order within a single transaction.

use rusqlite::Connection;

use super::StorageError;

/// A single schema migration step.
pub struct Migration {
    /// Monotonically increasing version number (starting at 1).
    pub version: u32,
    /// Human-readable name for this migration.
    pub name: &'static str,
    /// SQL executed as one batch.
    pub sql: &'static str,
}

/// Runs schema migrations against a database connection.
pub struct MigrationRunner;

impl MigrationRunner {
    /// Runs all pending migrations in a transaction.
    ///
    /// Creates the `schema_version` table if it doesn't exist, then applies
    /// any migrations whose version is greater than the current schema version.
    /// If any migration fails, all changes are rolled back.
    pub fn run(conn: &Connection, migrations: &[Migration]) -> Result<(), StorageError> {
        // Create the schema_version table if it doesn't exist (outside transaction,
        // since we need to read it before starting the migration transaction).
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL
            );",
        )?;

        let current_version = Self::current_version(conn)?;

        // Collect pending migrations
        let pending: Vec<&Migration> = migrations
            .iter()
            .filter(|m| m.version > current_version)
            .collect();

        if pending.is_empty() {
            return Ok(());
        }

        // Verify migrations are in order
        for window in pending.windows(2) {
            if window[0].version >= window[1].version {
                return Err(StorageError::Migration(format!(
                    "Migrations are not in order: v{} before v{}",
                    window[0].version, window[1].version
                )));
            }
        }

        // Run all pending migrations in a single transaction
        conn.execute_batch("BEGIN EXCLUSIVE TRANSACTION;")?;

        for migration in &pending {
            tracing::debug!(
                version = migration.version,
                name = migration.name,
                "applying schema migration"
            );

            if let Err(e) = conn.execute_batch(migration.sql) {
                conn.execute_batch("ROLLBACK;")?;
                return Err(StorageError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e
                )));
            }

            // Record this migration
            if let Err(e) = conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![migration.version, unix_now()],
            ) {
                conn.execute_batch("ROLLBACK;")?;
                return Err(StorageError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e
                )));
            }
        }

        conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    /// Returns the current schema version, or 0 if no migrations have been applied.
    pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
        // Check if schema_version table exists
        let table_exists: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> =
            conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })?;

        Ok(version.unwrap_or(0))
    }
}

/// Returns all registered migrations in version order.
///
/// New migrations are appended to the end of this list.
pub fn all_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "baseline_accounts",
            sql: MIGRATION_V1_BASELINE,
        },
        Migration {
            version: 2,
            name: "account_lookup_indexes",
            sql: MIGRATION_V2_LOOKUP_INDEXES,
        },
        Migration {
            version: 3,
            name: "distinct_contact_labels",
            sql: MIGRATION_V3_DISTINCT_CONTACT_LABELS,
        },
    ]
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Migration v1: account records.
///
/// The local contact is kept as JSON; its avatar bytes live in their own
/// column. The address is derived on read and never stored.
const MIGRATION_V1_BASELINE: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
        unique_id TEXT PRIMARY KEY,
        phone_number TEXT,
        stable_id TEXT,
        contact_id TEXT,
        contact_json TEXT,
        contact_avatar BLOB,
        avatar_source_hash BLOB,
        avatar_encoded_image BLOB,
        disambiguation_label TEXT NOT NULL DEFAULT '',
        CHECK (phone_number IS NOT NULL OR stable_id IS NOT NULL)
    );
";

/// Migration v2: lookups by address and by local contact.
const MIGRATION_V2_LOOKUP_INDEXES: &str = "
    CREATE INDEX IF NOT EXISTS idx_accounts_stable_id ON accounts(stable_id);
    CREATE INDEX IF NOT EXISTS idx_accounts_phone_number ON accounts(phone_number);
    CREATE INDEX IF NOT EXISTS idx_accounts_contact_id ON accounts(contact_id);
";

/// Migration v3: accounts sharing a local contact need distinct labels.
const MIGRATION_V3_DISTINCT_CONTACT_LABELS: &str = "
    CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_contact_label
        ON accounts(contact_id, disambiguation_label)
        WHERE contact_id IS NOT NULL;
";
