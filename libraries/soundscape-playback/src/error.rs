//! Error types for playback tracking

use thiserror::Error;

/// Playback errors
///
/// Tracker operations themselves never fail; these cover decoding the
/// event stream.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A frame could not be decoded as a known event
    #[error("Invalid playback event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    /// IO error while reading an event stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
