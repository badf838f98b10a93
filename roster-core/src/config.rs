// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration for account storage and avatar caching

/// Settings for re-encoding address-book avatars before sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarConfig {
    /// Longest edge of the re-encoded image, in pixels
    pub max_dimension: u32,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// Largest raw avatar accepted for re-encoding (bytes)
    pub max_source_bytes: usize,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            max_dimension: 512,
            jpeg_quality: 85,
            max_source_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// Top-level configuration for the account roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterConfig {
    pub avatar: AvatarConfig,
}

impl RosterConfig {
    /// Override the maximum avatar edge length
    pub fn with_avatar_max_dimension(mut self, max_dimension: u32) -> Self {
        self.avatar.max_dimension = max_dimension.max(1);
        self
    }

    /// Override the JPEG quality, clamped to 1..=100
    pub fn with_avatar_jpeg_quality(mut self, quality: u8) -> Self {
        self.avatar.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Override the raw avatar size limit
    pub fn with_max_avatar_source_bytes(mut self, max_bytes: usize) -> Self {
        self.avatar.max_source_bytes = max_bytes;
        self
    }
}
