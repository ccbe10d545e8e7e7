//! Soundscape Control - Playback Tracking
//!
//! Keeps an in-memory record of what the remote soundscape service is
//! playing, driven by the start/stop frames it pushes.
//!
//! This crate provides:
//! - [`PlaybackTracker`]: global playing map plus per-kind id sets
//! - Mood exclusivity (a new mood evicts the previous one)
//! - [`RemoteEvent`]: decoding of the service's event frames
//! - [`apply_event`]: event application, in arrival order
//!
//! # Architecture
//!
//! The tracker is plain synchronous state. It never talks to the service
//! or the host; callers feed it events and query it while rendering.
//! Incomplete frames are logged and ignored rather than raised.
//!
//! # Example
//!
//! ```rust
//! use soundscape_playback::{apply_event, PlaybackTracker, RemoteEvent};
//!
//! let mut tracker = PlaybackTracker::new();
//! for frame in [
//!     r#"{"event":"moodMessage","kind":"full","params":{"moodId":5}}"#,
//!     r#"{"event":"elementStart","detail":{"elementId":7}}"#,
//!     r#"{"event":"moodMessage","kind":"stopAll"}"#,
//! ] {
//!     apply_event(&mut tracker, RemoteEvent::from_json(frame).unwrap());
//! }
//!
//! assert!(!tracker.is_playing("m:5"));
//! assert!(tracker.is_playing(&7u64));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod events;
mod tracker;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::{apply_event, read_events, MoodMessage, MoodMessageKind, MoodParams, RemoteEvent};
pub use tracker::{Applied, PlaybackTracker, StopTarget};
