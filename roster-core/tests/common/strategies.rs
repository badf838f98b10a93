// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use proptest::prelude::*;

/// Strategy for generating phone numbers.
pub fn phone_strategy() -> impl Strategy<Value = String> {
    "[0-9]{10,15}".prop_map(|n| format!("+{}", n))
}

/// Strategy for generating stable ids (UUID-like).
pub fn stable_id_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

/// Strategy for optional identity parts, including blank strings.
pub fn identity_part_strategy(
    value: impl Strategy<Value = String>,
) -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        value.prop_map(Some),
    ]
}

/// Strategy for generating labels.
pub fn label_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}"
}

/// Strategy for optional name parts.
pub fn name_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Z][a-z]{0,11}")
}
