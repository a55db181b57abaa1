//! User-adjustable conversion settings.

use serde::{Deserialize, Serialize};

use super::SessionError;
use crate::config::ConversionConfig;

/// Default encode quality.
pub const DEFAULT_QUALITY: u8 = 85;

/// Encode quality, 1-100. Higher favors fidelity over size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self, SessionError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SessionError::InvalidQuality(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Quality as the 0.0-1.0 factor codecs expect.
    pub fn factor(&self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

impl TryFrom<u8> for Quality {
    type Error = SessionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Settings applied uniformly to every item of the next pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    pub quality: Quality,
}

impl ConversionSettings {
    pub fn from_config(config: &ConversionConfig) -> Result<Self, SessionError> {
        Ok(Self {
            quality: Quality::new(config.quality)?,
        })
    }
}
