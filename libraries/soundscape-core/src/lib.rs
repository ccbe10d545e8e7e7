//! Soundscape Control Core
//!
//! Host-agnostic types, traits, and error handling shared by every
//! Soundscape Control crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `CatalogEntry`, `CatalogRow`, `PlaybackEntry`, `Volume`
//! - **Identifiers**: `ElementId` (numeric) and `SoundId` (optionally type-prefixed)
//! - **Core Traits**: `PlayingLookup`, `OneShotLookup`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use soundscape_core::{ElementId, SoundId, SoundType};
//!
//! let id: SoundId = "m:1234".parse().unwrap();
//! assert_eq!(id.kind(), Some(SoundType::Mood));
//! assert_eq!(id.element_id(), ElementId::new(1234));
//! assert_eq!(id.to_string(), "m:1234");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::{OneShotLookup, PlayingLookup, ToElementId};
pub use types::{
    // Identifiers
    ElementId, SoundId,
    // Catalog
    CatalogEntry, CatalogRow, SoundType,
    // Playback
    PlaybackDetail, PlaybackEntry, PlaybackHints, PlaybackKind,
    // Volume
    Volume, VolumeScope,
};
