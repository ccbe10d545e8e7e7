/// Core error types for Soundscape Control
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Soundscape Control
#[derive(Error, Debug)]
pub enum CoreError {
    /// A sound id could not be parsed
    #[error("Invalid sound id: {0:?}")]
    InvalidId(String),

    /// A sound type tag other than `mood` or `element`
    #[error("Unknown sound type: {0:?}")]
    UnknownSoundType(String),

    /// A playback kind other than `sample`, `element` or `mood`
    #[error("Unknown playback kind: {0:?}")]
    UnknownPlaybackKind(String),

    /// A required field is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but inconsistent with the rest of the record
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Volume outside of the accepted range
    #[error("Volume {0} is not between 0 and 1.5")]
    InvalidVolume(f32),

    /// Volume scope other than `local` or `global`
    #[error("Volume type {0:?} is not a valid option")]
    UnknownVolumeScope(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid field error
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
