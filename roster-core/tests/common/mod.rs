// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared fixtures and encoders used across integration tests.

#![allow(dead_code)]

pub mod strategies;

use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use roster_core::{AvatarEncoder, AvatarError, LocalContact, RosterConfig, Storage};

pub fn create_test_storage() -> Storage {
    Storage::in_memory(RosterConfig::default()).unwrap()
}

/// Storage whose encoder reports how often it ran.
pub fn create_counting_storage() -> (Storage, Rc<Cell<usize>>) {
    let mut storage = create_test_storage();
    let calls = Rc::new(Cell::new(0));
    storage.set_avatar_encoder(Box::new(CountingEncoder {
        calls: Rc::clone(&calls),
    }));
    (storage, calls)
}

/// Encoder that passes bytes through and counts calls.
pub struct CountingEncoder {
    pub calls: Rc<Cell<usize>>,
}

impl AvatarEncoder for CountingEncoder {
    fn encode(&self, source: &[u8]) -> Result<Vec<u8>, AvatarError> {
        self.calls.set(self.calls.get() + 1);
        Ok(source.to_vec())
    }
}

/// A small solid-colour PNG.
pub fn png_avatar(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(colour));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn ada() -> LocalContact {
    LocalContact::new("addressbook-ada")
        .with_given_name("Ada")
        .with_family_name("Lovelace")
        .with_phone_number("home", "+15551234567")
}
