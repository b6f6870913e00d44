//! Client configuration for the token acquirer.
//!
//! Loaded once at startup (environment variables or explicit construction)
//! and passed into the acquirer as an immutable value; there is no global
//! configuration state.

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default HTTP request timeout for the token-endpoint call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout for the HTTP client.
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Reuse cached tokens until they are within this duration of expiry.
pub const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(300);

/// Required scope suffix for the client-credentials grant.
///
/// Application permissions are granted statically and consented by an
/// administrator, so the scope always names the whole resource:
/// `<resource-identifier>/.default`.
pub const SCOPE_SUFFIX: &str = "/.default";

/// Immutable configuration for one confidential client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Authority URL, e.g. `https://login.microsoftonline.com/<tenant-id>`.
    pub authority: String,

    /// Application (client) id registered with the authority.
    pub client_id: String,

    /// Target scope, of the form `<resource-identifier>/.default`.
    pub scope: String,

    /// Secret-store lookup name of the client certificate.
    pub certificate_name: String,

    /// HTTP request timeout for the token-endpoint call.
    pub http_timeout: Duration,

    /// Reuse cached tokens until they are within this duration of expiry.
    pub refresh_threshold: Duration,
}

/// Errors raised while building or validating a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid authority URL: {0}")]
    InvalidAuthority(String),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Invalid value for {0}: expected whole seconds")]
    InvalidTimeout(String),
}

impl ClientConfig {
    /// Create a configuration with default timeouts.
    ///
    /// # Security Warning
    ///
    /// Accepts `http://` authorities so local stand-ins can be used in
    /// tests. Production code should use [`ClientConfig::new_secure`],
    /// which enforces HTTPS.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidAuthority` if the authority is not a
    /// well-formed absolute HTTP(S) URL, or `ConfigError::InvalidScope` if
    /// the scope is not of the form `<resource-identifier>/.default`.
    pub fn new(
        authority: impl Into<String>,
        client_id: impl Into<String>,
        scope: impl Into<String>,
        certificate_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            authority: authority.into(),
            client_id: client_id.into(),
            scope: scope.into(),
            certificate_name: certificate_name.into(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration requiring an HTTPS authority.
    ///
    /// This is the recommended constructor for production use.
    ///
    /// # Errors
    ///
    /// As [`ClientConfig::new`], plus `ConfigError::InvalidAuthority` if the
    /// authority does not use HTTPS.
    pub fn new_secure(
        authority: impl Into<String>,
        client_id: impl Into<String>,
        scope: impl Into<String>,
        certificate_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self::new(authority, client_id, scope, certificate_name)?;
        if !config.authority.starts_with("https://") {
            return Err(ConfigError::InvalidAuthority(
                "authority must use HTTPS".to_string(),
            ));
        }
        Ok(config)
    }

    /// Set the HTTP request timeout.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the cache refresh threshold.
    #[must_use]
    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required: `AUTH_AUTHORITY`, `AUTH_CLIENT_ID`, `AUTH_SCOPE`,
    /// `AUTH_CERTIFICATE_NAME`. Optional: `AUTH_HTTP_TIMEOUT_SECS`.
    /// The authority must use HTTPS.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a map (for testing).
    ///
    /// # Errors
    ///
    /// As [`ClientConfig::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |key: &str| -> Result<String, ConfigError> {
            vars.get(key)
                .cloned()
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let mut config = Self::new_secure(
            required("AUTH_AUTHORITY")?,
            required("AUTH_CLIENT_ID")?,
            required("AUTH_SCOPE")?,
            required("AUTH_CERTIFICATE_NAME")?,
        )?;

        if let Some(raw) = vars.get("AUTH_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout("AUTH_HTTP_TIMEOUT_SECS".to_string()))?;
            config = config.with_http_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Validate the authority URL and scope.
    ///
    /// Fields are public, so the acquirer re-validates before each exchange;
    /// validation never performs network I/O.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidAuthority` or `ConfigError::InvalidScope`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_authority(&self.authority)?;
        validate_scope(&self.scope)?;
        Ok(())
    }

    /// The authority's token endpoint.
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority.trim_end_matches('/'))
    }
}

/// Authority must be a well-formed absolute HTTP(S) URL.
fn validate_authority(authority: &str) -> Result<(), ConfigError> {
    let url = Url::parse(authority)
        .map_err(|e| ConfigError::InvalidAuthority(format!("{authority}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidAuthority(format!(
            "{authority}: unsupported scheme {other}"
        ))),
    }
}

/// Scope must be non-empty and of the form `<resource-identifier>/.default`.
fn validate_scope(scope: &str) -> Result<(), ConfigError> {
    if scope.is_empty() {
        return Err(ConfigError::InvalidScope("scope is empty".to_string()));
    }

    match scope.strip_suffix(SCOPE_SUFFIX) {
        Some(resource) if !resource.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidScope(format!(
            "{scope}: expected <resource-identifier>{SCOPE_SUFFIX}"
        ))),
    }
}
