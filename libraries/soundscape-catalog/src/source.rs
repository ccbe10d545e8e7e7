//! Where catalog rows come from

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use soundscape_core::CatalogRow;
use tracing::debug;

use crate::delimited::rows_from_delimited;
use crate::error::Result;

/// A supplier of normalized catalog rows.
///
/// Implemented by the remote bulk export and by the bundled CSV file; the
/// catalog does not care which one it is fed from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every row
    async fn fetch_rows(&self) -> Result<Vec<CatalogRow>>;
}

/// Catalog rows read from a delimited-text file on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Create a source for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for CsvFileSource {
    async fn fetch_rows(&self) -> Result<Vec<CatalogRow>> {
        debug!(path = %self.path.display(), "Reading catalog file");
        let text = tokio::fs::read_to_string(&self.path).await?;
        let rows = rows_from_delimited(&text)?;
        debug!(rows = rows.len(), "Read catalog file");
        Ok(rows)
    }
}
