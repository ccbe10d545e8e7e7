//! Soundscape Controller Library
//!
//! Host-facing half of Soundscape Control: configuration, the host settings
//! and host adapter seams, the sound browser, and the [`ControlContext`]
//! that ties them to the catalog, the playback tracker and the service
//! client.
//!
//! This library exposes the components the CLI is built from, for testing.

pub mod browser;
pub mod config;
pub mod context;
pub mod error;
pub mod filter_model;
pub mod host;
pub mod settings;

// Re-export commonly used types for convenience
pub use browser::{Browser, BrowserTab, ResultRow};
pub use config::{CatalogSourceKind, ControllerConfig};
pub use context::ControlContext;
pub use error::{ControllerError, Result};
pub use filter_model::FilterModel;
pub use host::{HostAdapter, InMemoryHost, SoundReference};
pub use settings::{JsonFileSettings, MemorySettings, SettingKey, SettingsStore};
