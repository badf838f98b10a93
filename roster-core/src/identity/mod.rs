// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Identity Module
//!
//! A messaging-network identity is a phone number, a stable opaque
//! identifier assigned by the service, or both. At least one is always
//! present; the variant makes that structurally enforced.

use thiserror::Error;

/// Identity validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid identity: phone number and stable id are both empty")]
    InvalidIdentity,
}

/// A validated network identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NetworkIdentity {
    PhoneOnly { phone_number: String },
    StableIdOnly { stable_id: String },
    Both { phone_number: String, stable_id: String },
}

impl NetworkIdentity {
    /// Builds an identity from optional parts.
    ///
    /// Empty and whitespace-only strings count as absent.
    pub fn new(phone_number: Option<&str>, stable_id: Option<&str>) -> Result<Self, IdentityError> {
        match (non_blank(phone_number), non_blank(stable_id)) {
            (Some(phone), Some(id)) => Ok(NetworkIdentity::Both {
                phone_number: phone.to_string(),
                stable_id: id.to_string(),
            }),
            (Some(phone), None) => Ok(NetworkIdentity::PhoneOnly {
                phone_number: phone.to_string(),
            }),
            (None, Some(id)) => Ok(NetworkIdentity::StableIdOnly {
                stable_id: id.to_string(),
            }),
            (None, None) => Err(IdentityError::InvalidIdentity),
        }
    }

    /// Returns the phone number, if known.
    pub fn phone_number(&self) -> Option<&str> {
        match self {
            NetworkIdentity::PhoneOnly { phone_number }
            | NetworkIdentity::Both { phone_number, .. } => Some(phone_number),
            NetworkIdentity::StableIdOnly { .. } => None,
        }
    }

    /// Returns the stable identifier, if known.
    pub fn stable_id(&self) -> Option<&str> {
        match self {
            NetworkIdentity::StableIdOnly { stable_id }
            | NetworkIdentity::Both { stable_id, .. } => Some(stable_id),
            NetworkIdentity::PhoneOnly { .. } => None,
        }
    }

    /// The canonical address: the stable id when known, else the phone number.
    pub fn address(&self) -> &str {
        match self {
            NetworkIdentity::StableIdOnly { stable_id }
            | NetworkIdentity::Both { stable_id, .. } => stable_id,
            NetworkIdentity::PhoneOnly { phone_number } => phone_number,
        }
    }
}

/// Output of recipient resolution: whatever the directory knows about a peer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedRecipient {
    pub phone_number: Option<String>,
    pub stable_id: Option<String>,
}

impl ResolvedRecipient {
    pub fn new(phone_number: Option<&str>, stable_id: Option<&str>) -> Self {
        ResolvedRecipient {
            phone_number: phone_number.map(str::to_string),
            stable_id: stable_id.map(str::to_string),
        }
    }

    /// Validates into a [`NetworkIdentity`].
    pub fn identity(&self) -> Result<NetworkIdentity, IdentityError> {
        NetworkIdentity::new(self.phone_number.as_deref(), self.stable_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
