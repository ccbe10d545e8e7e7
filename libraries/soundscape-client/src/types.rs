//! Types for soundscape service requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default base address of the frontend API
pub const DEFAULT_ADDRESS: &str = "https://syrinscape.com/online/frontend-api";

/// Default endpoint exchanging an auth token for a session
pub const DEFAULT_CONFIG_URL: &str = "https://app.syrinscape.com/config/";

/// Default endpoint of the bulk catalog export
pub const DEFAULT_BULK_URL: &str = "https://syrinscape.com/account/remote-control-links/";

/// Configuration for connecting to the soundscape service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the frontend API
    pub address: String,
    /// Session endpoint
    pub config_url: String,
    /// Bulk export endpoint
    pub bulk_url: String,
    /// Long-lived token issued to the user
    pub auth_token: Option<String>,
    /// Current session (if authenticated)
    pub session: Option<Session>,
}

impl ClientConfig {
    /// Create a config for the given API address with default endpoints.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            config_url: DEFAULT_CONFIG_URL.to_string(),
            bulk_url: DEFAULT_BULK_URL.to_string(),
            auth_token: None,
            session: None,
        }
    }

    /// Set the auth token used to open a session.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Override the session and bulk endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, config_url: impl Into<String>, bulk_url: impl Into<String>) -> Self {
        self.config_url = config_url.into();
        self.bulk_url = bulk_url.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}

// =============================================================================
// Session Types
// =============================================================================

/// Session opened with an auth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Token sent with every API request
    pub token: String,
    /// Session identifier, persisted by the host
    #[serde(deserialize_with = "string_or_number")]
    pub session_id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// =============================================================================
// Listing Types
// =============================================================================

/// A soundset as listed by `soundsets/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soundset {
    /// Internal id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Soundset page
    #[serde(default)]
    pub url: Option<String>,
    /// Uuid used to list moods and elements
    pub uuid: String,
}

/// A mood as listed by `moods/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSummary {
    /// Internal id
    #[serde(alias = "pk")]
    pub id: u64,
    /// Display name
    pub name: String,
    /// Everything else the service sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An element as listed by `elements/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSummary {
    /// Internal id
    #[serde(rename = "pk")]
    pub id: u64,
    /// Parent soundset's display name
    #[serde(default)]
    pub soundset_name: Option<String>,
    /// Parent soundset's URL
    #[serde(default, rename = "soundset")]
    pub soundset_url: Option<String>,
    /// Display name
    pub name: String,
    /// URL of the sound
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_id_may_be_numeric() {
        let session: Session =
            serde_json::from_value(json!({"token": "abc", "session_id": 42})).unwrap();
        assert_eq!(session.session_id, "42");
    }

    #[test]
    fn element_listing_maps_service_names() {
        let element: ElementSummary = serde_json::from_value(json!({
            "pk": 1234567,
            "soundset_name": "Tavern",
            "soundset": "https://example.com/soundsets/tavern",
            "name": "Door",
            "url": "https://example.com/elements/1234567"
        }))
        .unwrap();

        assert_eq!(element.id, 1_234_567);
        assert_eq!(element.soundset_url.as_deref(), Some("https://example.com/soundsets/tavern"));
    }

    #[test]
    fn default_config_uses_public_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.bulk_url, DEFAULT_BULK_URL);
        assert!(config.session.is_none());
    }
}
