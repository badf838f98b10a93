// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local Contact Module
//!
//! Read-only snapshots of device address-book entries. The address book owns
//! the data; an account record only holds a copy taken at update time.

use serde::{Deserialize, Serialize};

/// A labelled phone number on an address-book entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPhoneNumber {
    /// Label such as "home" or "work".
    pub label: String,
    /// Normalized phone number.
    pub number: String,
}

/// Structured name parts of a local contact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameComponents {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub nickname: Option<String>,
}

/// Snapshot of one address-book entry.
///
/// Two snapshots with the same `contact_id` refer to the same address-book
/// row even if their details differ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalContact {
    contact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    #[serde(default)]
    phone_numbers: Vec<LabeledPhoneNumber>,
    #[serde(default)]
    emails: Vec<String>,
    /// Raw avatar bytes. Persisted out of band as a blob.
    #[serde(skip)]
    avatar_data: Option<Vec<u8>>,
}

impl LocalContact {
    /// Creates an empty snapshot for the given address-book row.
    pub fn new(contact_id: &str) -> Self {
        LocalContact {
            contact_id: contact_id.to_string(),
            given_name: None,
            family_name: None,
            nickname: None,
            full_name: None,
            phone_numbers: Vec::new(),
            emails: Vec::new(),
            avatar_data: None,
        }
    }

    pub fn with_given_name(mut self, name: &str) -> Self {
        self.given_name = Some(name.to_string());
        self
    }

    pub fn with_family_name(mut self, name: &str) -> Self {
        self.family_name = Some(name.to_string());
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn with_full_name(mut self, name: &str) -> Self {
        self.full_name = Some(name.to_string());
        self
    }

    pub fn with_phone_number(mut self, label: &str, number: &str) -> Self {
        self.phone_numbers.push(LabeledPhoneNumber {
            label: label.to_string(),
            number: number.to_string(),
        });
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.emails.push(email.to_string());
        self
    }

    pub fn with_avatar_data(mut self, data: Vec<u8>) -> Self {
        self.avatar_data = Some(data);
        self
    }

    /// Returns the address-book row identifier.
    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    /// Returns the given (first) name, ignoring blanks.
    pub fn given_name(&self) -> Option<&str> {
        non_blank(&self.given_name)
    }

    /// Returns the family (last) name, ignoring blanks.
    pub fn family_name(&self) -> Option<&str> {
        non_blank(&self.family_name)
    }

    /// Returns the nickname, ignoring blanks.
    pub fn nickname(&self) -> Option<&str> {
        non_blank(&self.nickname)
    }

    /// Returns the explicit full name as the address book stores it.
    pub fn full_name(&self) -> Option<&str> {
        non_blank(&self.full_name)
    }

    /// Joins given and family name with a space; either may be missing.
    pub fn composed_name(&self) -> Option<String> {
        match (self.given_name(), self.family_name()) {
            (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
            (Some(given), None) => Some(given.to_string()),
            (None, Some(family)) => Some(family.to_string()),
            (None, None) => None,
        }
    }

    pub fn name_components(&self) -> NameComponents {
        NameComponents {
            given_name: self.given_name().map(str::to_string),
            family_name: self.family_name().map(str::to_string),
            nickname: self.nickname().map(str::to_string),
        }
    }

    pub fn phone_numbers(&self) -> &[LabeledPhoneNumber] {
        &self.phone_numbers
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    /// Returns the raw avatar bytes, if the entry has a picture.
    pub fn avatar_data(&self) -> Option<&[u8]> {
        self.avatar_data.as_deref().filter(|d| !d.is_empty())
    }

    pub(crate) fn set_avatar_data(&mut self, data: Option<Vec<u8>>) {
        self.avatar_data = data;
    }
}

impl NameComponents {
    /// True when no name part is present.
    pub fn is_empty(&self) -> bool {
        self.given_name.is_none() && self.family_name.is_none() && self.nickname.is_none()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
