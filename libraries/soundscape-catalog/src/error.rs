//! Error types for the catalog

use soundscape_core::{CoreError, SoundId};
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A row is missing a required field or holds an invalid value
    #[error("Malformed catalog row {row}: {source}")]
    MalformedRow {
        /// Zero-based index of the row in the input
        row: usize,
        /// What was wrong with it
        #[source]
        source: CoreError,
    },

    /// Two rows share an id within the same type partition
    #[error("Duplicate catalog entry {id} at row {row}")]
    DuplicateEntry {
        /// Zero-based index of the second occurrence
        row: usize,
        /// The repeated id
        id: SoundId,
    },

    /// The filter configuration could not be read
    #[error("Invalid filter configuration: {0}")]
    InvalidFilter(String),

    /// The catalog source failed to deliver rows
    #[error("Catalog source error: {0}")]
    Source(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
