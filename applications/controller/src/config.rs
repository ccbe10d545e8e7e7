/// Controller configuration
use crate::error::{ControllerError, Result};
use serde::{Deserialize, Serialize};
use soundscape_client::{ClientConfig, DEFAULT_ADDRESS, DEFAULT_BULK_URL, DEFAULT_CONFIG_URL};
use std::path::{Path, PathBuf};

/// Default configuration file, read from the working directory if present
pub const DEFAULT_CONFIG_FILE: &str = "soundscape.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    #[serde(default = "default_service")]
    pub service: ServiceSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_browser")]
    pub browser: BrowserSettings,

    #[serde(default = "default_settings")]
    pub settings: StoreSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_config_url")]
    pub config_url: String,

    #[serde(default = "default_bulk_url")]
    pub bulk_url: String,

    /// Falls back to the `authToken` setting when absent
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub source: CatalogSourceKind,

    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

/// Where the catalog is loaded from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSourceKind {
    /// The service's bulk export
    #[default]
    Bulk,
    /// A bundled delimited-text file
    Csv,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSettings {
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            catalog: default_catalog(),
            browser: default_browser(),
            settings: default_settings(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from file and environment.
    ///
    /// Reads `path`, or `soundscape.toml` if it exists, then applies
    /// `SOUNDSCAPE_<SECTION>__<KEY>` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (e.g. SOUNDSCAPE_SERVICE__AUTH_TOKEN)
        settings = settings.add_source(
            config::Environment::with_prefix("SOUNDSCAPE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ControllerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ControllerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let address = self.service.address.trim();
        if address.is_empty() {
            return Err(ControllerError::Config(
                "Service address is required (set SOUNDSCAPE_SERVICE__ADDRESS)".to_string(),
            ));
        }

        if !address.starts_with("http://") && !address.starts_with("https://") {
            return Err(ControllerError::Config(format!(
                "Service address must start with http:// or https://, got {:?}",
                address
            )));
        }

        if self.browser.page_size == 0 {
            return Err(ControllerError::Config(
                "Browser page size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Client configuration for these settings
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new(self.service.address.clone())
            .with_endpoints(self.service.config_url.clone(), self.service.bulk_url.clone());
        client.auth_token = self.service.auth_token.clone();
        client
    }
}

// Default values
fn default_service() -> ServiceSettings {
    ServiceSettings {
        address: default_address(),
        config_url: default_config_url(),
        bulk_url: default_bulk_url(),
        auth_token: None,
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_config_url() -> String {
    DEFAULT_CONFIG_URL.to_string()
}

fn default_bulk_url() -> String {
    DEFAULT_BULK_URL.to_string()
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        source: CatalogSourceKind::default(),
        csv_path: default_csv_path(),
    }
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("./storage/catalog.csv")
}

fn default_browser() -> BrowserSettings {
    BrowserSettings {
        page_size: default_page_size(),
    }
}

fn default_page_size() -> usize {
    50
}

fn default_settings() -> StoreSettings {
    StoreSettings {
        path: default_settings_path(),
    }
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("./data/settings.json")
}
