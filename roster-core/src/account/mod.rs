// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Account Record Module
//!
//! An account record is one valid messaging account: a network identity,
//! optionally linked to a local address-book entry. A local contact with
//! several linked accounts yields several records, told apart by their
//! disambiguation label. Network-only accounts have no local contact.

use thiserror::Error;
use tracing::{debug, warn};

use crate::avatar::{AvatarEncoder, AvatarHash};
use crate::identity::{IdentityError, NetworkIdentity, ResolvedRecipient};
use crate::local_contact::{LocalContact, NameComponents};
use crate::storage::{StorageError, WriteTransaction};

/// Account record construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("A disambiguation label is required when linking a local contact")]
    MissingLabel,
}

/// A messaging account, reconciled with its local contact (if any).
#[derive(Clone, Debug)]
pub struct AccountRecord {
    /// Storage key. Stable even when the address changes.
    unique_id: String,
    identity: NetworkIdentity,
    local_contact: Option<LocalContact>,
    /// Hash of the raw avatar bytes, for change detection.
    avatar_source_hash: Option<AvatarHash>,
    /// The JPEG last produced from those bytes, as sent over the wire.
    avatar_encoded_image: Option<Vec<u8>>,
    disambiguation_label: String,
}

impl AccountRecord {
    /// Creates a record from a resolved recipient and its matched local contact.
    ///
    /// The label is required whenever `contact` is present.
    pub fn from_recipient(
        recipient: &ResolvedRecipient,
        contact: Option<LocalContact>,
        label: Option<&str>,
    ) -> Result<Self, AccountError> {
        let identity = recipient.identity()?;
        let label = label.map(str::trim).unwrap_or_default();
        if contact.is_some() && label.is_empty() {
            return Err(AccountError::MissingLabel);
        }
        Ok(Self::new(identity, contact, label.to_string()))
    }

    /// Creates a network-only record with no local contact.
    pub fn from_address(
        phone_number: Option<&str>,
        stable_id: Option<&str>,
    ) -> Result<Self, AccountError> {
        let identity = NetworkIdentity::new(phone_number, stable_id)?;
        Ok(Self::new(identity, None, String::new()))
    }

    fn new(identity: NetworkIdentity, contact: Option<LocalContact>, label: String) -> Self {
        AccountRecord {
            unique_id: uuid::Uuid::new_v4().to_string(),
            identity,
            local_contact: contact,
            avatar_source_hash: None,
            avatar_encoded_image: None,
            disambiguation_label: label,
        }
    }

    /// Rebuilds a record from its stored columns.
    pub(crate) fn from_stored(
        unique_id: String,
        identity: NetworkIdentity,
        local_contact: Option<LocalContact>,
        avatar_source_hash: Option<AvatarHash>,
        avatar_encoded_image: Option<Vec<u8>>,
        disambiguation_label: String,
    ) -> Self {
        AccountRecord {
            unique_id,
            identity,
            local_contact,
            avatar_source_hash,
            avatar_encoded_image,
            disambiguation_label,
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn identity(&self) -> &NetworkIdentity {
        &self.identity
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.identity.phone_number()
    }

    pub fn stable_id(&self) -> Option<&str> {
        self.identity.stable_id()
    }

    /// The stable id when known, else the phone number.
    pub fn address(&self) -> &str {
        self.identity.address()
    }

    pub fn local_contact(&self) -> Option<&LocalContact> {
        self.local_contact.as_ref()
    }

    pub fn avatar_source_hash(&self) -> Option<&AvatarHash> {
        self.avatar_source_hash.as_ref()
    }

    pub fn avatar_encoded_image(&self) -> Option<&[u8]> {
        self.avatar_encoded_image.as_deref()
    }

    pub fn disambiguation_label(&self) -> &str {
        &self.disambiguation_label
    }

    // === Display names ===

    /// Best name for this account from the local contact.
    ///
    /// Nickname, then full name, then first + last, then the bare address.
    /// Returns `None` for network-only accounts.
    pub fn preferred_display_name(&self) -> Option<String> {
        let contact = self.local_contact.as_ref()?;
        contact
            .nickname()
            .or_else(|| contact.full_name())
            .map(str::to_string)
            .or_else(|| contact.composed_name())
            .or_else(|| Some(self.address().to_string()))
    }

    pub fn full_name(&self) -> Option<&str> {
        self.local_contact.as_ref()?.full_name()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.local_contact.as_ref()?.given_name()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.local_contact.as_ref()?.family_name()
    }

    pub fn nickname_if_available(&self) -> Option<&str> {
        self.local_contact.as_ref()?.nickname()
    }

    pub fn structured_name_components(&self) -> Option<NameComponents> {
        let components = self.local_contact.as_ref()?.name_components();
        if components.is_empty() {
            None
        } else {
            Some(components)
        }
    }

    // === Content equality ===

    /// Compares the fields that matter for sync and display de-duplication.
    ///
    /// The local contact is compared by identity only. Avatar cache fields
    /// are compared as stored, hash and payload both.
    pub fn has_same_content(&self, other: &AccountRecord) -> bool {
        self.identity == other.identity
            && self.local_contact.as_ref().map(LocalContact::contact_id)
                == other.local_contact.as_ref().map(LocalContact::contact_id)
            && self.disambiguation_label == other.disambiguation_label
            && self.avatar_source_hash == other.avatar_source_hash
            && self.avatar_encoded_image == other.avatar_encoded_image
    }

    // === Mutation ===

    /// Refreshes the avatar cache from the current local contact.
    ///
    /// Re-encodes only when the source hash changed. Returns whether any
    /// cache field changed.
    pub fn try_to_cache_contact_avatar_data(&mut self, encoder: &dyn AvatarEncoder) -> bool {
        let source = self
            .local_contact
            .as_ref()
            .and_then(LocalContact::avatar_data);

        let Some(source) = source else {
            let changed =
                self.avatar_source_hash.is_some() || self.avatar_encoded_image.is_some();
            self.avatar_source_hash = None;
            self.avatar_encoded_image = None;
            return changed;
        };

        let hash = AvatarHash::compute(source);
        if self.avatar_source_hash == Some(hash) {
            return false;
        }

        debug!(account = %self.unique_id, %hash, "re-encoding contact avatar");
        self.avatar_encoded_image = match encoder.encode(source) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                warn!(account = %self.unique_id, error = %e, "could not re-encode contact avatar");
                None
            }
        };
        self.avatar_source_hash = Some(hash);
        true
    }

    /// Replaces the local contact, refreshes the avatar cache and persists
    /// the result, all inside `tx`.
    ///
    /// `self` is only changed once the write succeeded. The write still
    /// belongs to the enclosing scope: if that scope later rolls back, the
    /// store keeps the previous record while `self` holds the new state, so
    /// callers re-fetch the record after a failed scope.
    pub fn update_with_contact(
        &mut self,
        contact: Option<LocalContact>,
        tx: &mut WriteTransaction<'_>,
    ) -> Result<(), StorageError> {
        let mut updated = self.clone();
        updated.local_contact = contact;
        updated.try_to_cache_contact_avatar_data(tx.avatar_encoder());
        tx.save_account(&updated)?;
        *self = updated;
        Ok(())
    }

    /// Swaps the local contact without touching the avatar cache.
    #[cfg(any(test, feature = "testing"))]
    pub fn replace_contact_for_tests(&mut self, contact: Option<LocalContact>) {
        self.local_contact = contact;
    }
}
