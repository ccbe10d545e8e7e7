//! Soundscape Service Client
//!
//! HTTP client library for the remote soundscape service.
//!
//! # Features
//!
//! - **Session**: exchange the user's auth token for a session token
//! - **Catalog**: bulk export, soundset/mood/element listings
//! - **Commands**: play and stop moods and elements
//!
//! The client also implements [`soundscape_catalog::CatalogSource`], so it
//! can feed a catalog rebuild directly.
//!
//! # Example
//!
//! ```ignore
//! use soundscape_client::{ClientConfig, ServiceClient};
//! use soundscape_core::SoundType;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default().with_auth_token("my-token");
//!     let client = ServiceClient::new(config)?;
//!
//!     client.authenticate().await?;
//!
//!     let rows = client.bulk_data().await?;
//!     println!("Catalog has {} rows", rows.len());
//!
//!     client.play("m:1234".parse()?, SoundType::Mood).await?;
//!     Ok(())
//! }
//! ```

mod catalog;
mod client;
mod commands;
mod error;
mod types;

// Re-export main types
pub use client::ServiceClient;
pub use commands::command_path;
pub use error::{ClientError, Result};
pub use types::{
    ClientConfig, ElementSummary, MoodSummary, Session, Soundset, DEFAULT_ADDRESS,
    DEFAULT_BULK_URL, DEFAULT_CONFIG_URL,
};
