// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Avatar Caching Module
//!
//! Address-book avatars are hashed for change detection and re-encoded to
//! JPEG for sync. The encoded bytes are cached alongside the hash because
//! outbound de-duplication compares exactly what was last transmitted.

use std::fmt;

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use ring::digest::{digest, SHA256};
use thiserror::Error;

use crate::config::AvatarConfig;

/// Length of an avatar hash in bytes.
pub const AVATAR_HASH_LEN: usize = 32;

/// Avatar processing errors.
#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Avatar image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Avatar too large (max {max} bytes, got {size} bytes)")]
    TooLarge { max: usize, size: usize },
}

/// SHA-256 digest of raw avatar bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvatarHash([u8; AVATAR_HASH_LEN]);

impl AvatarHash {
    /// Hashes raw avatar bytes.
    pub fn compute(data: &[u8]) -> Self {
        let digest = digest(&SHA256, data);
        let mut bytes = [0u8; AVATAR_HASH_LEN];
        bytes.copy_from_slice(digest.as_ref());
        AvatarHash(bytes)
    }

    /// Restores a hash from stored bytes. Returns `None` on a length mismatch.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; AVATAR_HASH_LEN] = bytes.try_into().ok()?;
        Some(AvatarHash(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; AVATAR_HASH_LEN] {
        &self.0
    }
}

impl fmt::Display for AvatarHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AvatarHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AvatarHash({})", self)
    }
}

/// Converts raw address-book avatar bytes into the sync format.
pub trait AvatarEncoder {
    fn encode(&self, source: &[u8]) -> Result<Vec<u8>, AvatarError>;
}

/// Re-encodes avatars as JPEG, downscaling to the configured size.
#[derive(Debug, Clone, Default)]
pub struct JpegAvatarEncoder {
    config: AvatarConfig,
}

impl JpegAvatarEncoder {
    pub fn new(config: AvatarConfig) -> Self {
        JpegAvatarEncoder { config }
    }
}

impl AvatarEncoder for JpegAvatarEncoder {
    fn encode(&self, source: &[u8]) -> Result<Vec<u8>, AvatarError> {
        if source.len() > self.config.max_source_bytes {
            return Err(AvatarError::TooLarge {
                max: self.config.max_source_bytes,
                size: source.len(),
            });
        }

        let mut image = image::load_from_memory(source)?;
        let max = self.config.max_dimension;
        if image.width() > max || image.height() > max {
            image = image.thumbnail(max, max);
        }

        // JPEG has no alpha channel
        let rgb = image.to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.config.jpeg_quality).encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ColorType::Rgb8,
        )?;
        Ok(out)
    }
}
