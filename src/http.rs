//! HTTP transport for the Crownpeak Access API.
//!
//! This module provides the single network chokepoint for the SDK:
//! - Minimum-interval throttling of every dispatch
//! - The fixed header set the service expects (API key, JSON content
//!   negotiation, pinned `Host` and `User-Agent` identifiers)
//! - Session cookie capture and replay
//! - JSON envelope decoding
//!
//! There are no retries: a network or decode failure surfaces immediately
//! as [`CrownpeakError::Transport`] naming the endpoint that failed.

use crate::config::{Config, Credentials};
use crate::cookies::CookieJar;
use crate::error::{CrownpeakError, Result};
use crate::throttle::RequestThrottle;
use crate::traits::Transport;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HOST, SET_COOKIE};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Fixed `Host` identifier the service expects regardless of the gateway
/// address actually dialled.
const HOST_HEADER: &str = "cms.crownpeak.net";

/// Fixed client identifier.
const USER_AGENT: &str = "Zink-bot/1.0";

/// Content type sent with every request body.
const CONTENT_TYPE_JSON: &str = "application/json; charset=utf8";

/// Path of the Access API below `{cms_base_url}/{cms_instance}`.
const ACCESS_API_SEGMENT: &str = "cpt_webservice/accessapi";

/// Throttled, cookie-aware HTTP client for the Access API.
///
/// All session state (cookie jar, throttle deadline) is owned by the
/// instance; nothing is shared across clients and nothing survives the
/// process.
#[derive(Debug)]
pub struct CrownpeakHttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    cookies: Mutex<CookieJar>,
    throttle: RequestThrottle,
}

impl CrownpeakHttpClient {
    /// Creates a transport with default configuration.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_config(credentials, Config::default())
    }

    /// Creates a transport with custom configuration.
    pub fn with_config(credentials: &Credentials, config: Config) -> Result<Self> {
        credentials.validate()?;
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                CrownpeakError::config_error(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: access_api_base(&credentials.cms_base_url, &credentials.cms_instance),
            api_key: credentials.api_key.clone(),
            cookies: Mutex::new(CookieJar::new()),
            throttle: RequestThrottle::new(config.throttle_interval(), config.poll_interval()),
        })
    }

    /// The resolved Access API base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` to `path` and decodes the JSON envelope.
    ///
    /// Dispatch order: wait for the throttle slot, send with session
    /// headers, decode, then feed `Set-Cookie` headers back into the jar.
    /// The service reports application failures *inside* the envelope, so
    /// the HTTP status is not interpreted here; a body that is not JSON
    /// (a gateway error page, usually) is a transport failure.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.throttle.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        let payload = serde_json::to_vec(body)?;

        let mut request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(ACCEPT, "application/json")
            .header(HOST, HOST_HEADER)
            .body(payload);

        let cookie_header = self.cookies.lock().await.header_value();
        if let Some(cookie) = cookie_header {
            request = request.header(COOKIE, cookie);
        }

        debug!("POST {url}");

        let response = request.send().await.map_err(|e| {
            warn!("request to {path} failed: {e}");
            CrownpeakError::transport_error(path, e.to_string())
        })?;

        let set_cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CrownpeakError::transport_error(path, e.to_string()))?;

        let envelope: Value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("response from {path} is not a JSON envelope: {e}");
            CrownpeakError::transport_error(path, format!("invalid JSON envelope: {e}"))
        })?;

        if !set_cookies.is_empty() {
            let mut jar = self.cookies.lock().await;
            jar.update(set_cookies.iter().map(String::as_str));
            debug!("session cookies updated from {path}");
        }

        Ok(envelope)
    }
}

#[async_trait]
impl Transport for CrownpeakHttpClient {
    async fn send(&self, path: &str, body: Value) -> Result<Value> {
        self.post_json(path, &body).await
    }
}

/// Builds `{base}/{instance}/cpt_webservice/accessapi`, tolerating a
/// trailing slash on the configured base URL.
fn access_api_base(cms_base_url: &str, cms_instance: &str) -> String {
    format!(
        "{}/{}/{}",
        cms_base_url.trim_end_matches('/'),
        cms_instance,
        ACCESS_API_SEGMENT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> Credentials {
        Credentials::new(
            "bot-user",
            "secret",
            "https://cms.example.net",
            "acme-prod",
            "key-123",
        )
    }

    #[test]
    fn test_client_creation() {
        let client = CrownpeakHttpClient::new(&test_credentials());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_bad_credentials() {
        let mut credentials = test_credentials();
        credentials.api_key = String::new();

        assert!(CrownpeakHttpClient::new(&credentials).is_err());
    }

    #[test]
    fn test_client_rejects_bad_config() {
        let mut config = Config::default();
        config.throttle.min_interval_ms = 0;

        assert!(CrownpeakHttpClient::with_config(&test_credentials(), config).is_err());
    }

    #[test]
    fn test_access_api_base_shape() {
        assert_eq!(
            access_api_base("https://cms.example.net", "acme-prod"),
            "https://cms.example.net/acme-prod/cpt_webservice/accessapi"
        );

        // trailing slash on the configured base does not double up
        assert_eq!(
            access_api_base("https://cms.example.net/", "acme-prod"),
            "https://cms.example.net/acme-prod/cpt_webservice/accessapi"
        );
    }

    #[test]
    fn test_base_url_accessor() {
        let client = CrownpeakHttpClient::new(&test_credentials()).unwrap();
        assert_eq!(
            client.base_url(),
            "https://cms.example.net/acme-prod/cpt_webservice/accessapi"
        );
    }
}
