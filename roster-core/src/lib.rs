// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Roster Core Library
//!
//! Reconciles messaging-network identities with local address-book contacts
//! into account records that can be addressed, displayed and deduplicated.
//! Records are persisted through scoped SQLite transactions.

pub mod account;
pub mod avatar;
pub mod config;
pub mod identity;
pub mod local_contact;
pub mod storage;

pub use account::{AccountError, AccountRecord};
pub use avatar::{AvatarEncoder, AvatarError, AvatarHash, JpegAvatarEncoder};
pub use config::{AvatarConfig, RosterConfig};
pub use identity::{IdentityError, NetworkIdentity, ResolvedRecipient};
pub use local_contact::{LabeledPhoneNumber, LocalContact, NameComponents};
pub use storage::{ReadTransaction, Storage, StorageError, UpsertOutcome, WriteTransaction};
