//! Volume types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Playback volume accepted by the service, between 0 and 1.5.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Volume(f32);

impl Volume {
    /// Lowest accepted volume
    pub const MIN: f32 = 0.0;
    /// Highest accepted volume (150%)
    pub const MAX: f32 = 1.5;

    /// Validate a volume value
    pub fn new(value: f32) -> Result<Self> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidVolume(value))
        }
    }

    /// Get the inner value
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(1.0)
    }
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = f32::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Which volume a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeScope {
    /// This client only
    #[default]
    Local,
    /// Every listener of the session
    Global,
}

impl FromStr for VolumeScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(VolumeScope::Local),
            "global" => Ok(VolumeScope::Global),
            _ => Err(CoreError::UnknownVolumeScope(s.to_string())),
        }
    }
}
