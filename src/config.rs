//! Configuration management for the Crownpeak Access API SDK.
//!
//! This module provides a centralized configuration system that enables:
//! - Type-safe configuration management
//! - Environment variable integration
//! - Builder pattern for easy setup
//! - Configuration validation
//!
//! Wire-level identifiers (the fixed `Host` and `User-Agent` headers, the
//! Access API path segment, result-code literals) are remote-system
//! contracts, not configuration; they live as constants next to the code
//! that sends them.
//!
//! ## Usage
//!
//! ```rust
//! use crownpeak_access_rs::config::{Config, Credentials, ThrottleConfig};
//! use crownpeak_access_rs::Result;
//!
//! fn example() -> Result<()> {
//!     let credentials = Credentials::new(
//!         "bot-user",
//!         "secret",
//!         "https://cms.example.net",
//!         "acme-prod",
//!         "api-key-value",
//!     );
//!     credentials.validate()?;
//!
//!     // Build custom configuration
//!     let config = Config::builder()
//!         .throttle(ThrottleConfig::builder().min_interval_ms(750).build())
//!         .build();
//!     config.validate()?;
//!
//!     // Or load overrides from CROWNPEAK_* environment variables
//!     let config = Config::from_env()?;
//!     Ok(())
//! }
//! ```

use crate::error::{CrownpeakError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable connection credentials supplied at client construction.
///
/// All five values are required by the remote Access API; none of them is
/// ever mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// CMS account user name
    pub user_name: String,
    /// CMS account password
    pub password: String,
    /// Base URL of the CMS host, e.g. `https://cms.example.net`
    pub cms_base_url: String,
    /// CMS instance name (first path segment of every API URL)
    pub cms_instance: String,
    /// Value sent as the `x-api-key` header on every request
    pub api_key: String,
}

impl Credentials {
    /// Creates a new credentials set.
    pub fn new(
        user_name: impl Into<String>,
        password: impl Into<String>,
        cms_base_url: impl Into<String>,
        cms_instance: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
            cms_base_url: cms_base_url.into(),
            cms_instance: cms_instance.into(),
            api_key: api_key.into(),
        }
    }

    /// Loads credentials from `CROWNPEAK_USERNAME`, `CROWNPEAK_PASSWORD`,
    /// `CROWNPEAK_CMS_BASE_URL`, `CROWNPEAK_CMS_INSTANCE` and
    /// `CROWNPEAK_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| CrownpeakError::config_error(format!("{name} is not set")))
        };

        let credentials = Self {
            user_name: var("CROWNPEAK_USERNAME")?,
            password: var("CROWNPEAK_PASSWORD")?,
            cms_base_url: var("CROWNPEAK_CMS_BASE_URL")?,
            cms_instance: var("CROWNPEAK_CMS_INSTANCE")?,
            api_key: var("CROWNPEAK_API_KEY")?,
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Validates that every credential field is present.
    pub fn validate(&self) -> Result<()> {
        if self.user_name.is_empty() {
            return Err(CrownpeakError::config_error("user_name cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(CrownpeakError::config_error("password cannot be empty"));
        }
        if self.cms_base_url.is_empty() {
            return Err(CrownpeakError::config_error("cms_base_url cannot be empty"));
        }
        if self.cms_instance.is_empty() {
            return Err(CrownpeakError::config_error("cms_instance cannot be empty"));
        }
        if self.api_key.is_empty() {
            return Err(CrownpeakError::config_error("api_key cannot be empty"));
        }
        Ok(())
    }
}

/// Main configuration structure for the Crownpeak SDK.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Request throttling configuration
    pub throttle: ThrottleConfig,
    /// Upload configuration
    pub upload: UploadConfig,
}

/// HTTP client configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,
}

/// Request throttling configuration settings.
///
/// The remote CMS is sensitive to request rate, so every outbound call
/// waits for a shared deadline before dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum interval between request dispatches in milliseconds
    /// (default: 500)
    pub min_interval_ms: u64,
    /// Upper bound on a single wait slice while polling the deadline in
    /// milliseconds (default: 100)
    pub poll_interval_ms: u64,
}

/// Upload configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum allowed source file size for uploads in bytes (default: 10MB).
    /// The whole file is read into memory and base64-inflated, so this also
    /// bounds client-side memory use.
    pub max_upload_size: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 500,
            poll_interval_ms: 100,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Loads configuration overrides from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CROWNPEAK_REQUEST_TIMEOUT") {
            config.http.request_timeout_secs = val.parse().map_err(|_| {
                CrownpeakError::config_error("Invalid CROWNPEAK_REQUEST_TIMEOUT value")
            })?;
        }

        if let Ok(val) = std::env::var("CROWNPEAK_CONNECT_TIMEOUT") {
            config.http.connect_timeout_secs = val.parse().map_err(|_| {
                CrownpeakError::config_error("Invalid CROWNPEAK_CONNECT_TIMEOUT value")
            })?;
        }

        if let Ok(val) = std::env::var("CROWNPEAK_THROTTLE_MS") {
            config.throttle.min_interval_ms = val
                .parse()
                .map_err(|_| CrownpeakError::config_error("Invalid CROWNPEAK_THROTTLE_MS value"))?;
        }

        if let Ok(val) = std::env::var("CROWNPEAK_MAX_UPLOAD_SIZE") {
            config.upload.max_upload_size = val.parse().map_err(|_| {
                CrownpeakError::config_error("Invalid CROWNPEAK_MAX_UPLOAD_SIZE value")
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for consistency and constraints.
    pub fn validate(&self) -> Result<()> {
        if self.http.request_timeout_secs == 0 {
            return Err(CrownpeakError::config_error(
                "request_timeout_secs must be greater than 0",
            ));
        }

        if self.http.connect_timeout_secs == 0 {
            return Err(CrownpeakError::config_error(
                "connect_timeout_secs must be greater than 0",
            ));
        }

        if self.throttle.min_interval_ms == 0 {
            return Err(CrownpeakError::config_error(
                "min_interval_ms must be greater than 0",
            ));
        }

        if self.throttle.poll_interval_ms == 0 {
            return Err(CrownpeakError::config_error(
                "poll_interval_ms must be greater than 0",
            ));
        }

        if self.upload.max_upload_size == 0 {
            return Err(CrownpeakError::config_error(
                "max_upload_size must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Converts the HTTP request timeout to a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Converts the HTTP connect timeout to a Duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_secs)
    }

    /// Converts the minimum dispatch interval to a Duration.
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle.min_interval_ms)
    }

    /// Converts the poll interval to a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.throttle.poll_interval_ms)
    }
}

/// Builder for creating Config instances.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    http: Option<HttpConfig>,
    throttle: Option<ThrottleConfig>,
    upload: Option<UploadConfig>,
}

impl ConfigBuilder {
    /// Sets the HTTP configuration.
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the throttling configuration.
    pub fn throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Sets the upload configuration.
    pub fn upload(mut self, upload: UploadConfig) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Config {
        Config {
            http: self.http.unwrap_or_default(),
            throttle: self.throttle.unwrap_or_default(),
            upload: self.upload.unwrap_or_default(),
        }
    }
}

impl HttpConfig {
    /// Creates a new HTTP config builder.
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

impl ThrottleConfig {
    /// Creates a new throttle config builder.
    pub fn builder() -> ThrottleConfigBuilder {
        ThrottleConfigBuilder::default()
    }
}

impl UploadConfig {
    /// Creates a new upload config builder.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder::default()
    }
}

/// Builder for HttpConfig.
#[derive(Debug, Default)]
pub struct HttpConfigBuilder {
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

impl HttpConfigBuilder {
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.request_timeout_secs = Some(timeout);
        self
    }

    pub fn connect_timeout_secs(mut self, timeout: u64) -> Self {
        self.connect_timeout_secs = Some(timeout);
        self
    }

    pub fn build(self) -> HttpConfig {
        let default = HttpConfig::default();
        HttpConfig {
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(default.connect_timeout_secs),
        }
    }
}

/// Builder for ThrottleConfig.
#[derive(Debug, Default)]
pub struct ThrottleConfigBuilder {
    min_interval_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
}

impl ThrottleConfigBuilder {
    pub fn min_interval_ms(mut self, interval: u64) -> Self {
        self.min_interval_ms = Some(interval);
        self
    }

    pub fn poll_interval_ms(mut self, interval: u64) -> Self {
        self.poll_interval_ms = Some(interval);
        self
    }

    pub fn build(self) -> ThrottleConfig {
        let default = ThrottleConfig::default();
        ThrottleConfig {
            min_interval_ms: self.min_interval_ms.unwrap_or(default.min_interval_ms),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(default.poll_interval_ms),
        }
    }
}

/// Builder for UploadConfig.
#[derive(Debug, Default)]
pub struct UploadConfigBuilder {
    max_upload_size: Option<u64>,
}

impl UploadConfigBuilder {
    pub fn max_upload_size(mut self, size: u64) -> Self {
        self.max_upload_size = Some(size);
        self
    }

    pub fn build(self) -> UploadConfig {
        let default = UploadConfig::default();
        UploadConfig {
            max_upload_size: self.max_upload_size.unwrap_or(default.max_upload_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // process-wide env vars; tests that touch them must not overlap
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.http.request_timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.throttle.min_interval_ms, 500);
        assert_eq!(config.throttle.poll_interval_ms, 100);
        assert_eq!(config.upload.max_upload_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .http(HttpConfig::builder().request_timeout_secs(60).build())
            .throttle(
                ThrottleConfig::builder()
                    .min_interval_ms(750)
                    .poll_interval_ms(50)
                    .build(),
            )
            .upload(
                UploadConfig::builder()
                    .max_upload_size(5 * 1024 * 1024)
                    .build(),
            )
            .build();

        assert_eq!(config.http.request_timeout_secs, 60);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.throttle.min_interval_ms, 750);
        assert_eq!(config.throttle.poll_interval_ms, 50);
        assert_eq!(config.upload.max_upload_size, 5 * 1024 * 1024);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.http.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.throttle.min_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.throttle.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upload.max_upload_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.throttle_interval(), Duration::from_millis(500));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_credentials_validation() {
        let credentials = Credentials::new(
            "bot-user",
            "secret",
            "https://cms.example.net",
            "acme-prod",
            "key",
        );
        assert!(credentials.validate().is_ok());

        let empty_user = Credentials::new("", "secret", "https://x", "inst", "key");
        assert!(empty_user.validate().is_err());

        let empty_key = Credentials::new("u", "secret", "https://x", "inst", "");
        assert!(empty_key.validate().is_err());
    }

    #[test]
    fn test_environment_loading() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("CROWNPEAK_REQUEST_TIMEOUT", "60");
            std::env::set_var("CROWNPEAK_MAX_UPLOAD_SIZE", "5242880"); // 5MB
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.http.request_timeout_secs, 60);
        assert_eq!(config.upload.max_upload_size, 5242880);
        // untouched values keep their defaults
        assert_eq!(config.throttle.min_interval_ms, 500);

        unsafe {
            std::env::remove_var("CROWNPEAK_REQUEST_TIMEOUT");
            std::env::remove_var("CROWNPEAK_MAX_UPLOAD_SIZE");
        }
    }

    #[test]
    fn test_invalid_environment_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("CROWNPEAK_CONNECT_TIMEOUT", "not-a-number");
        }
        assert!(Config::from_env().is_err());
        unsafe {
            std::env::remove_var("CROWNPEAK_CONNECT_TIMEOUT");
        }
    }

    #[test]
    fn test_credentials_from_env_missing() {
        let _guard = ENV_LOCK.lock().unwrap();
        // None of the CROWNPEAK_USERNAME family is set here.
        unsafe {
            std::env::remove_var("CROWNPEAK_USERNAME");
        }
        assert!(Credentials::from_env().is_err());
    }
}
