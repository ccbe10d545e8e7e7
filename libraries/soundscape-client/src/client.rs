//! Main soundscape service client.

use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, Session};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Client for the remote soundscape service.
///
/// Opens a session with the user's auth token and sends every API request
/// with the session token.
///
/// # Example
///
/// ```ignore
/// use soundscape_client::{ClientConfig, ServiceClient};
///
/// let config = ClientConfig::default().with_auth_token("my-token");
/// let client = ServiceClient::new(config)?;
///
/// let session = client.authenticate().await?;
/// println!("Session {}", session.session_id);
///
/// let soundsets = client.soundsets().await?;
/// println!("Found {} soundsets", soundsets.len());
/// ```
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

fn validate_url(name: &str, raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(ClientError::InvalidUrl(format!("{name} cannot be empty")));
    }

    let trimmed = raw.trim_end_matches('/');
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ClientError::InvalidUrl(format!(
            "{name} must start with http:// or https://"
        )));
    }

    url::Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(format!("{name}: {e}")))?;
    Ok(trimmed.to_string())
}

impl ServiceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Endpoints are used verbatim, trailing slash included
        validate_url("config URL", &config.config_url)?;
        validate_url("bulk URL", &config.bulk_url)?;

        let normalized_config = ClientConfig {
            address: validate_url("address", &config.address)?,
            ..config
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("SoundscapeControl/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the API address.
    pub async fn address(&self) -> String {
        self.config.read().await.address.clone()
    }

    /// Check if a session is open.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.session.is_some()
    }

    /// Get the current session.
    pub async fn session(&self) -> Option<Session> {
        self.config.read().await.session.clone()
    }

    /// Set a session directly (e.g., from stored settings).
    pub async fn set_session(&self, session: Session) {
        self.config.write().await.session = Some(session);
    }

    /// Replace the auth token; the current session is closed.
    pub async fn set_auth_token(&self, token: Option<String>) {
        let mut config = self.config.write().await;
        config.auth_token = token;
        config.session = None;
    }

    /// Forget the session.
    pub async fn logout(&self) {
        self.config.write().await.session = None;
        info!("Session closed");
    }

    /// Exchange the auth token for a session.
    ///
    /// On success, the session is stored for subsequent requests.
    pub async fn authenticate(&self) -> Result<Session> {
        let config = self.config.read().await;
        let token = config
            .auth_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ClientError::AuthRequired)?;
        let url = config.config_url.clone();
        drop(config);

        debug!(url = %url, "Opening session");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Session request rejected");
            return Err(ClientError::AuthFailed("Auth token was rejected".to_string()));
        }

        let session: Session = read_json(response, "session").await?;
        info!(session_id = %session.session_id, "Session opened");

        self.config.write().await.session = Some(session.clone());
        Ok(session)
    }

    /// Open a session unless one is already open.
    pub async fn ensure_session(&self) -> Result<Session> {
        match self.session().await {
            Some(session) => Ok(session),
            None => self.authenticate().await,
        }
    }

    /// Fetch JSON from a path relative to the API address.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch_json_query(path, &[]).await
    }

    /// Fetch JSON from a path with encoded query parameters.
    pub(crate) async fn fetch_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let config = self.config.read().await;
        let url = format!("{}/{}", config.address, path.trim_start_matches('/'));
        drop(config);

        debug!(url = %url, query = ?query, "Fetching");
        let request = self.authorized(self.http.get(&url).query(query)).await?;
        let response = request.send().await.map_err(map_send_error)?;
        read_json(response, path).await
    }

    /// Fetch JSON from an absolute URL with the session token.
    pub(crate) async fn fetch_json_url<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "Fetching");
        let request = self.authorized(self.http.get(url)).await?;
        let response = request.send().await.map_err(map_send_error)?;
        read_json(response, url).await
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let config = self.config.read().await;
        let token = config
            .session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ClientError::AuthRequired)?;

        Ok(request
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("token {}", token)))
    }

    pub(crate) async fn bulk_url(&self) -> String {
        self.config.read().await.bulk_url.clone()
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
    } else if status.as_u16() == 401 {
        Err(ClientError::AuthRequired)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}
