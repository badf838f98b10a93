// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Account record storage operations.

use rusqlite::{ffi, params, OptionalExtension, Params, Row};
use tracing::debug;

use super::{ReadTransaction, StorageError, UpsertOutcome, WriteTransaction};
use crate::account::AccountRecord;
use crate::avatar::AvatarHash;
use crate::identity::NetworkIdentity;
use crate::local_contact::LocalContact;

const ACCOUNT_COLUMNS: &str = "unique_id, phone_number, stable_id, contact_json, contact_avatar,
     avatar_source_hash, avatar_encoded_image, disambiguation_label";

/// Internal struct for database row data.
struct AccountRow {
    unique_id: String,
    phone_number: Option<String>,
    stable_id: Option<String>,
    contact_json: Option<String>,
    contact_avatar: Option<Vec<u8>>,
    avatar_source_hash: Option<Vec<u8>>,
    avatar_encoded_image: Option<Vec<u8>>,
    disambiguation_label: String,
}

impl AccountRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AccountRow {
            unique_id: row.get(0)?,
            phone_number: row.get(1)?,
            stable_id: row.get(2)?,
            contact_json: row.get(3)?,
            contact_avatar: row.get(4)?,
            avatar_source_hash: row.get(5)?,
            avatar_encoded_image: row.get(6)?,
            disambiguation_label: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<AccountRecord, StorageError> {
        let identity =
            NetworkIdentity::new(self.phone_number.as_deref(), self.stable_id.as_deref())
                .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.unique_id, e)))?;

        let local_contact = match self.contact_json {
            Some(json) => {
                let mut contact: LocalContact = serde_json::from_str(&json)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                contact.set_avatar_data(self.contact_avatar);
                Some(contact)
            }
            None => None,
        };

        let avatar_source_hash = match self.avatar_source_hash {
            Some(bytes) => Some(AvatarHash::from_slice(&bytes).ok_or_else(|| {
                StorageError::Corrupt(format!(
                    "{}: avatar hash has {} bytes",
                    self.unique_id,
                    bytes.len()
                ))
            })?),
            None => None,
        };

        Ok(AccountRecord::from_stored(
            self.unique_id,
            identity,
            local_contact,
            avatar_source_hash,
            self.avatar_encoded_image,
            self.disambiguation_label,
        ))
    }
}

impl ReadTransaction<'_> {
    /// Loads a record by its storage id.
    pub fn fetch_account(&self, unique_id: &str) -> Result<Option<AccountRecord>, StorageError> {
        let sql = format!("SELECT {} FROM accounts WHERE unique_id = ?1", ACCOUNT_COLUMNS);
        self.query_one(&sql, params![unique_id])
    }

    /// Loads the record reachable at `address`.
    ///
    /// A stable id match wins over a phone number match.
    pub fn fetch_account_by_address(
        &self,
        address: &str,
    ) -> Result<Option<AccountRecord>, StorageError> {
        let sql = format!(
            "SELECT {} FROM accounts
             WHERE stable_id = ?1 OR phone_number = ?1
             ORDER BY (stable_id = ?1) DESC, unique_id
             LIMIT 1",
            ACCOUNT_COLUMNS
        );
        self.query_one(&sql, params![address])
    }

    /// Lists all records, ordered by phone number then stable id.
    pub fn all_accounts(&self) -> Result<Vec<AccountRecord>, StorageError> {
        let sql = format!(
            "SELECT {} FROM accounts ORDER BY phone_number, stable_id",
            ACCOUNT_COLUMNS
        );
        let mut stmt = self.tx.prepare(&sql)?;
        let rows = stmt.query_map([], AccountRow::from_row)?;

        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?.into_record()?);
        }
        Ok(accounts)
    }

    /// Lists the records linked to one local contact, ordered by label.
    pub fn accounts_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Vec<AccountRecord>, StorageError> {
        let sql = format!(
            "SELECT {} FROM accounts WHERE contact_id = ?1 ORDER BY disambiguation_label",
            ACCOUNT_COLUMNS
        );
        let mut stmt = self.tx.prepare(&sql)?;
        let rows = stmt.query_map(params![contact_id], AccountRow::from_row)?;

        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?.into_record()?);
        }
        Ok(accounts)
    }

    /// Returns the number of stored records.
    pub fn account_count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .tx
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Finds the stored record for the same network identity as `account`.
    ///
    /// Tries the storage id, then the stable id, then the phone number. A
    /// phone number only matches a row that has no conflicting stable id.
    fn find_counterpart(
        &self,
        account: &AccountRecord,
    ) -> Result<Option<AccountRecord>, StorageError> {
        if let Some(existing) = self.fetch_account(account.unique_id())? {
            return Ok(Some(existing));
        }

        if let Some(stable_id) = account.stable_id() {
            let sql = format!(
                "SELECT {} FROM accounts WHERE stable_id = ?1 ORDER BY unique_id LIMIT 1",
                ACCOUNT_COLUMNS
            );
            if let Some(existing) = self.query_one(&sql, params![stable_id])? {
                return Ok(Some(existing));
            }
        }

        match account.phone_number() {
            Some(phone_number) => {
                let sql = format!(
                    "SELECT {} FROM accounts
                     WHERE phone_number = ?1 AND (stable_id IS NULL OR ?2 IS NULL)
                     ORDER BY unique_id
                     LIMIT 1",
                    ACCOUNT_COLUMNS
                );
                self.query_one(&sql, params![phone_number, account.stable_id()])
            }
            None => Ok(None),
        }
    }

    fn query_one<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Option<AccountRecord>, StorageError> {
        let row = self
            .tx
            .query_row(sql, params, AccountRow::from_row)
            .optional()?;
        row.map(AccountRow::into_record).transpose()
    }
}

impl WriteTransaction<'_> {
    /// Inserts a record, or overwrites the stored one with the same storage id.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when another record linked
    /// to the same local contact already uses this disambiguation label.
    pub fn save_account(&mut self, account: &AccountRecord) -> Result<(), StorageError> {
        let contact = account.local_contact();
        let contact_json = contact
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Only the primary key may be overwritten; a contact label clash must fail.
        let result = self.read.tx.execute(
            "INSERT INTO accounts
             (unique_id, phone_number, stable_id, contact_id, contact_json, contact_avatar,
              avatar_source_hash, avatar_encoded_image, disambiguation_label)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(unique_id) DO UPDATE SET
                phone_number = excluded.phone_number,
                stable_id = excluded.stable_id,
                contact_id = excluded.contact_id,
                contact_json = excluded.contact_json,
                contact_avatar = excluded.contact_avatar,
                avatar_source_hash = excluded.avatar_source_hash,
                avatar_encoded_image = excluded.avatar_encoded_image,
                disambiguation_label = excluded.disambiguation_label",
            params![
                account.unique_id(),
                account.phone_number(),
                account.stable_id(),
                contact.map(LocalContact::contact_id),
                contact_json,
                contact.and_then(LocalContact::avatar_data),
                account.avatar_source_hash().map(|h| h.as_bytes().as_slice()),
                account.avatar_encoded_image(),
                account.disambiguation_label(),
            ],
        );

        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Err(StorageError::AlreadyExists(format!(
                    "contact {} already has an account labelled '{}'",
                    contact.map(LocalContact::contact_id).unwrap_or_default(),
                    account.disambiguation_label()
                )));
            }
            Err(e) => return Err(StorageError::Database(e)),
        }

        debug!(account = %account.unique_id(), "saved account record");
        Ok(())
    }

    /// Deletes a record. Returns whether a row was removed.
    pub fn remove_account(&mut self, unique_id: &str) -> Result<bool, StorageError> {
        let rows_affected = self
            .read
            .tx
            .execute("DELETE FROM accounts WHERE unique_id = ?1", params![unique_id])?;
        if rows_affected > 0 {
            debug!(account = %unique_id, "removed account record");
        }
        Ok(rows_affected > 0)
    }

    /// Writes `account` unless a stored record already has the same content.
    ///
    /// The stored counterpart is found by storage id, stable id, then phone
    /// number. A counterpart under a different id is replaced.
    pub fn upsert_account_if_changed(
        &mut self,
        account: &AccountRecord,
    ) -> Result<UpsertOutcome, StorageError> {
        let existing = self.find_counterpart(account)?;

        let Some(existing) = existing else {
            self.save_account(account)?;
            return Ok(UpsertOutcome::Inserted);
        };

        if existing.has_same_content(account) {
            return Ok(UpsertOutcome::Unchanged);
        }

        if existing.unique_id() != account.unique_id() {
            self.remove_account(existing.unique_id())?;
        }
        self.save_account(account)?;
        Ok(UpsertOutcome::Updated)
    }
}
