// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Account Record Tests
//!
//! Construction, display names and the transactional update protocol.

mod common;

use common::{ada, create_counting_storage, create_test_storage, png_avatar};
use roster_core::*;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_phone_only_record_without_contact() {
    let record = AccountRecord::from_address(Some("+15551234567"), Some("")).unwrap();

    assert_eq!(record.address(), "+15551234567");
    assert_eq!(record.stable_id(), None);
    assert_eq!(record.preferred_display_name(), None);
    assert_eq!(record.disambiguation_label(), "");
    assert!(record.local_contact().is_none());
}

#[test]
fn test_both_empty_is_invalid_identity() {
    let result = AccountRecord::from_address(Some(""), Some(""));
    assert!(matches!(
        result,
        Err(AccountError::Identity(IdentityError::InvalidIdentity))
    ));

    let recipient = ResolvedRecipient::default();
    let result = AccountRecord::from_recipient(&recipient, None, None);
    assert!(matches!(
        result,
        Err(AccountError::Identity(IdentityError::InvalidIdentity))
    ));
}

#[test]
fn test_one_contact_many_accounts() {
    let home = AccountRecord::from_recipient(
        &ResolvedRecipient::new(Some("+15551234567"), Some("aci-home")),
        Some(ada()),
        Some("home"),
    )
    .unwrap();
    let work = AccountRecord::from_recipient(
        &ResolvedRecipient::new(Some("+15557654321"), Some("aci-work")),
        Some(ada()),
        Some("work"),
    )
    .unwrap();

    assert_ne!(home.unique_id(), work.unique_id());
    assert_eq!(home.preferred_display_name(), work.preferred_display_name());
    assert!(!home.has_same_content(&work));
}

// =============================================================================
// Update protocol
// =============================================================================

#[test]
fn test_update_with_contact_scenario() {
    let mut storage = create_test_storage();
    let mut record = AccountRecord::from_address(Some("+15551234567"), Some("")).unwrap();
    let before = record.clone();

    let contact = LocalContact::new("addressbook-ada")
        .with_given_name("Ada")
        .with_family_name("Lovelace");
    storage
        .write(|tx| record.update_with_contact(Some(contact), tx))
        .unwrap();

    assert_eq!(record.address(), "+15551234567");
    assert_eq!(record.preferred_display_name().as_deref(), Some("Ada Lovelace"));
    assert!(!record.has_same_content(&before));

    let stored = storage
        .read(|tx| tx.fetch_account(record.unique_id()))
        .unwrap()
        .unwrap();
    assert!(stored.has_same_content(&record));
    assert_eq!(stored.preferred_display_name().as_deref(), Some("Ada Lovelace"));
}

#[test]
fn test_update_caches_avatar_as_jpeg() {
    let mut storage = create_test_storage();
    let mut record = AccountRecord::from_address(Some("+15551234567"), None).unwrap();
    let avatar = png_avatar(32, 32, [10, 120, 200]);

    storage
        .write(|tx| record.update_with_contact(Some(ada().with_avatar_data(avatar.clone())), tx))
        .unwrap();

    assert_eq!(record.avatar_source_hash(), Some(&AvatarHash::compute(&avatar)));
    let jpeg = record.avatar_encoded_image().unwrap();
    assert!(!jpeg.is_empty());
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_update_with_unchanged_avatar_does_not_reencode() {
    let (mut storage, calls) = create_counting_storage();
    let mut record = AccountRecord::from_address(Some("+15551234567"), None).unwrap();
    let contact = ada().with_avatar_data(vec![1, 2, 3, 4]);

    storage
        .write(|tx| record.update_with_contact(Some(contact.clone()), tx))
        .unwrap();
    let first = record.clone();
    storage
        .write(|tx| record.update_with_contact(Some(contact), tx))
        .unwrap();

    assert_eq!(calls.get(), 1);
    assert!(record.has_same_content(&first));
}

#[test]
fn test_update_replacing_avatar_refreshes_cache() {
    let (mut storage, calls) = create_counting_storage();
    let mut record = AccountRecord::from_address(Some("+15551234567"), None).unwrap();

    storage
        .write(|tx| record.update_with_contact(Some(ada().with_avatar_data(vec![1, 2, 3])), tx))
        .unwrap();
    let old_hash = *record.avatar_source_hash().unwrap();

    storage
        .write(|tx| record.update_with_contact(Some(ada().with_avatar_data(vec![7, 8])), tx))
        .unwrap();
    assert_eq!(calls.get(), 2);
    assert_ne!(record.avatar_source_hash(), Some(&old_hash));
    assert_eq!(record.avatar_encoded_image(), Some(&[7u8, 8][..]));

    storage
        .write(|tx| record.update_with_contact(Some(ada()), tx))
        .unwrap();
    assert_eq!(record.avatar_source_hash(), None);
    assert_eq!(record.avatar_encoded_image(), None);
}

#[test]
fn test_update_removing_contact_clears_everything() {
    let (mut storage, _) = create_counting_storage();
    let mut record = AccountRecord::from_address(Some("+15551234567"), None).unwrap();

    storage
        .write(|tx| record.update_with_contact(Some(ada().with_avatar_data(vec![1])), tx))
        .unwrap();
    storage
        .write(|tx| record.update_with_contact(None, tx))
        .unwrap();

    assert!(record.local_contact().is_none());
    assert_eq!(record.preferred_display_name(), None);
    assert_eq!(record.avatar_source_hash(), None);
    assert_eq!(record.avatar_encoded_image(), None);
}

#[test]
fn test_update_rolled_back_leaves_store_untouched() {
    let mut storage = create_test_storage();
    let mut record = AccountRecord::from_address(Some("+15551234567"), None).unwrap();
    storage.write(|tx| tx.save_account(&record)).unwrap();

    let result = storage.write(|tx| {
        record.update_with_contact(Some(ada().with_avatar_data(vec![1, 2])), tx)?;
        Err::<(), _>(StorageError::Aborted("simulated commit failure".into()))
    });
    assert!(matches!(result, Err(StorageError::Aborted(_))));

    // The in-memory record already moved on; the store did not
    assert!(record.local_contact().is_some());
    assert!(record.avatar_source_hash().is_some());

    let stored = storage
        .read(|tx| tx.fetch_account(record.unique_id()))
        .unwrap()
        .unwrap();
    assert!(stored.local_contact().is_none());
    assert_eq!(stored.avatar_source_hash(), None);
    assert_eq!(stored.avatar_encoded_image(), None);

    // Re-fetching realigns the caller with the store
    record = stored;
    assert!(record.local_contact().is_none());
    assert_eq!(record.avatar_source_hash(), None);
}

#[test]
fn test_reloaded_record_keeps_avatar_cache_stable() {
    let (mut storage, calls) = create_counting_storage();
    let mut record = AccountRecord::from_address(None, Some("aci-1")).unwrap();
    storage
        .write(|tx| record.update_with_contact(Some(ada().with_avatar_data(vec![5, 6])), tx))
        .unwrap();

    let mut reloaded = storage
        .read(|tx| tx.fetch_account_by_address("aci-1"))
        .unwrap()
        .unwrap();
    let encoder = common::CountingEncoder {
        calls: std::rc::Rc::clone(&calls),
    };
    assert!(!reloaded.try_to_cache_contact_avatar_data(&encoder));
    assert_eq!(calls.get(), 1);
    assert!(reloaded.has_same_content(&record));
}
