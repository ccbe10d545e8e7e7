//! Catalog and listing operations.

use crate::client::ServiceClient;
use crate::error::Result;
use crate::types::{ElementSummary, MoodSummary, Soundset};
use async_trait::async_trait;
use soundscape_catalog::{CatalogError, CatalogSource};
use soundscape_core::CatalogRow;
use tracing::{debug, warn};

impl ServiceClient {
    /// Fetch the full catalog export.
    ///
    /// Opens a session first if there is none.
    pub async fn bulk_data(&self) -> Result<Vec<CatalogRow>> {
        self.ensure_session().await?;

        let url = self.bulk_url().await;
        let rows: Vec<CatalogRow> = self.fetch_json_url(&url).await?;

        debug!(rows = rows.len(), "Fetched bulk data");
        Ok(rows)
    }

    /// List every soundset available to the user.
    pub async fn soundsets(&self) -> Result<Vec<Soundset>> {
        let sets: Vec<Soundset> = self.fetch_json("soundsets/").await?;
        debug!(soundsets = sets.len(), "Fetched soundsets");
        Ok(sets)
    }

    /// List the moods of a soundset.
    pub async fn moods(&self, soundset_uuid: &str) -> Result<Vec<MoodSummary>> {
        self.fetch_json_query("moods/", &[("soundset_uuid", soundset_uuid)])
            .await
    }

    /// List the elements of a soundset.
    ///
    /// Failures are logged and yield an empty list.
    pub async fn elements(&self, soundset_uuid: &str) -> Vec<ElementSummary> {
        match self
            .fetch_json_query("elements/", &[("soundset__uuid", soundset_uuid)])
            .await
        {
            Ok(elements) => elements,
            Err(e) => {
                warn!(soundset = %soundset_uuid, error = %e, "Failed to list elements");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CatalogSource for ServiceClient {
    async fn fetch_rows(&self) -> soundscape_catalog::Result<Vec<CatalogRow>> {
        self.bulk_data()
            .await
            .map_err(|e| CatalogError::Source(e.to_string()))
    }
}
