//! Certificate-backed access-token acquisition.
//!
//! Implements the OAuth 2.0 client-credentials exchange with JWT client
//! authentication: fetch the client certificate from the secret store (once
//! per process lifetime), sign a client assertion with its private key, POST
//! to the authority's token endpoint, and cache the returned token for its
//! validity window.
//!
//! # Security
//!
//! - The bearer token is a `SecretString`; Debug output redacts it
//! - Requests carry request and connect timeouts so a hung authority
//!   surfaces as `AuthorityUnreachable` instead of blocking the caller
//! - Acquisition and rejection events are logged without token values

use crate::assertion::{sign_client_assertion, CLIENT_ASSERTION_TYPE};
use crate::cache::TokenCache;
use crate::certificate::ClientCertificate;
use crate::config::{ClientConfig, ConfigError, DEFAULT_CONNECT_TIMEOUT};
use crate::errors::AcquireError;
use crate::store::SecretStore;
use common::secret::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// Clock drift safety margin applied when judging cached-token freshness.
///
/// Accounts for clock differences between this host and the authority, plus
/// network latency between acquisition and first use.
const CLOCK_DRIFT_MARGIN_SECS: i64 = 30;

/// An acquired bearer access token and its expiry.
///
/// Lives only in process memory and must not be persisted. Invalid after
/// `expires_at`.
#[derive(Clone)]
pub struct AccessToken {
    token: SecretString,
    expires_at: i64,
}

impl AccessToken {
    pub(crate) fn new(token: SecretString, expires_at: i64) -> Self {
        Self { token, expires_at }
    }

    /// The bearer token value.
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Unix timestamp after which the token is invalid.
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Value for the `Authorization` request header.
    ///
    /// Returned as a secret; the HTTP layer exposes it at the last moment.
    #[must_use]
    pub fn authorization_header(&self) -> SecretString {
        SecretString::from(format!("Bearer {}", self.token.expose_secret()))
    }

    /// Whether the token expires within `threshold_secs` of `now`.
    pub(crate) fn expires_within(&self, now: i64, threshold_secs: i64) -> bool {
        self.expires_at - now <= threshold_secs
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// OAuth 2.0 token response from the authority.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
    expires_in: u64,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// OAuth 2.0 error response body from the authority.
#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Acquires certificate-backed access tokens for one confidential client.
///
/// Stateless per call apart from the certificate (fetched once) and the
/// token cache; unrelated requests may call [`TokenAcquirer::acquire`]
/// concurrently without coordination.
pub struct TokenAcquirer<S> {
    config: ClientConfig,
    store: S,
    http_client: reqwest::Client,
    certificate: OnceCell<ClientCertificate>,
    cache: TokenCache,
}

impl<S: SecretStore> TokenAcquirer<S> {
    /// Create an acquirer for one confidential client.
    ///
    /// Validates the configuration eagerly; no network call happens here.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::InvalidScope`] or
    /// [`AcquireError::Configuration`] for unusable inputs, or
    /// `Configuration` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, store: S) -> Result<Self, AcquireError> {
        config.validate().map_err(config_error)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                AcquireError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            store,
            http_client,
            certificate: OnceCell::new(),
            cache: TokenCache::new(),
        })
    }

    /// Acquire an access token for the configured scope.
    ///
    /// Returns a cached token while it stays comfortably inside its validity
    /// window; otherwise performs a fresh client-credentials exchange.
    /// Concurrent callers racing an expiring token may each perform the
    /// exchange; the cache keeps whichever lands last.
    ///
    /// # Errors
    ///
    /// See [`AcquireError`] for the failure taxonomy. Input validation and
    /// credential failures are raised before any token-endpoint call.
    #[instrument(skip_all)]
    pub async fn acquire(&self) -> Result<AccessToken, AcquireError> {
        // Fields are public on ClientConfig, so re-check before going out
        self.config.validate().map_err(config_error)?;

        let now = chrono::Utc::now().timestamp();
        let threshold = threshold_secs(self.config.refresh_threshold);
        if let Some(token) = self
            .cache
            .get(&self.config.client_id, &self.config.scope, now, threshold)
            .await
        {
            debug!(
                target: "token_client.acquirer",
                client_id = %self.config.client_id,
                "Token cache hit"
            );
            return Ok(token);
        }

        let token = self.request_token().await?;
        self.cache
            .insert(&self.config.client_id, &self.config.scope, token.clone())
            .await;
        Ok(token)
    }

    /// Fetch and decode the client certificate, once per process lifetime.
    async fn certificate(&self) -> Result<&ClientCertificate, AcquireError> {
        self.certificate
            .get_or_try_init(|| async {
                debug!(
                    target: "token_client.acquirer",
                    name = %self.config.certificate_name,
                    "Fetching client certificate from secret store"
                );
                let secret = self.store.get_secret(&self.config.certificate_name).await?;
                ClientCertificate::from_base64_bundle(secret.expose_secret())
            })
            .await
    }

    /// Perform the client-credentials exchange against the token endpoint.
    #[instrument(skip_all)]
    async fn request_token(&self) -> Result<AccessToken, AcquireError> {
        let certificate = self.certificate().await?;
        let token_endpoint = self.config.token_endpoint();
        let assertion =
            sign_client_assertion(certificate, &self.config.client_id, &token_endpoint)?;

        debug!(
            target: "token_client.acquirer",
            client_id = %self.config.client_id,
            url = %token_endpoint,
            "Requesting token from authority"
        );

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("scope", self.config.scope.as_str()),
            ("client_assertion_type", CLIENT_ASSERTION_TYPE),
            ("client_assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    target: "token_client.acquirer",
                    error = %e,
                    "Token request transport failure"
                );
                AcquireError::AuthorityUnreachable(e.to_string())
            })?;

        let status = response.status();

        if status.is_success() {
            let body: TokenResponse = response.json().await.map_err(|e| {
                warn!(
                    target: "token_client.acquirer",
                    error = %e,
                    "Failed to parse token response"
                );
                AcquireError::AuthorityUnreachable(format!("invalid token response: {e}"))
            })?;

            let now = chrono::Utc::now().timestamp();
            #[allow(clippy::cast_possible_wrap)]
            let expires_at = now + body.expires_in as i64;

            info!(
                target: "token_client.acquirer",
                client_id = %self.config.client_id,
                expires_in_secs = body.expires_in,
                "Access token acquired"
            );

            Ok(AccessToken::new(
                SecretString::from(body.access_token),
                expires_at,
            ))
        } else if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let error: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();

            warn!(
                target: "token_client.acquirer",
                status = %status,
                error_code = %error.error,
                "Authority rejected token request"
            );

            // The scope shape is fixable by the caller, so it gets its own
            // variant. AADSTS70011 is the authority's malformed-scope code.
            if error.error == "invalid_scope" || error.error_description.contains("AADSTS70011") {
                Err(AcquireError::InvalidScope(format!(
                    "authority rejected scope {}",
                    self.config.scope
                )))
            } else {
                Err(AcquireError::TokenRequestRejected(format!(
                    "status {status}: {}",
                    error.error
                )))
            }
        } else {
            warn!(
                target: "token_client.acquirer",
                status = %status,
                "Authority returned server error"
            );
            Err(AcquireError::AuthorityUnreachable(format!(
                "authority server error: {status}"
            )))
        }
    }
}

impl<S> fmt::Debug for TokenAcquirer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAcquirer")
            .field("client_id", &self.config.client_id)
            .field("scope", &self.config.scope)
            .finish()
    }
}

/// Map configuration validation failures onto the acquisition taxonomy.
fn config_error(err: ConfigError) -> AcquireError {
    match err {
        ConfigError::InvalidScope(msg) => AcquireError::InvalidScope(msg),
        other => AcquireError::Configuration(other.to_string()),
    }
}

/// Cache freshness threshold in seconds, including the drift margin.
fn threshold_secs(refresh_threshold: Duration) -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = refresh_threshold.as_secs() as i64;
    secs + CLOCK_DRIFT_MARGIN_SECS
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_debug_redacts_value() {
        let token = AccessToken::new(SecretString::from("secret-bearer-value"), 1_658_240_222);
        let debug_str = format!("{token:?}");

        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("1658240222"));
        assert!(!debug_str.contains("secret-bearer-value"));
    }

    #[test]
    fn test_authorization_header_value() {
        let token = AccessToken::new(SecretString::from("abc123"), 0);

        assert_eq!(
            token.authorization_header().expose_secret(),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_expires_within_boundaries() {
        let token = AccessToken::new(SecretString::from("t"), 1_000);

        // 400 seconds of validity left against a 330-second threshold
        assert!(!token.expires_within(600, 330));
        // Exactly at the threshold counts as expiring
        assert!(token.expires_within(670, 330));
        // Already past expiry
        assert!(token.expires_within(1_500, 330));
    }

    #[test]
    fn test_token_response_debug_redacts_token() {
        let response = TokenResponse {
            access_token: "super-secret-access-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3599,
        };

        let debug_str = format!("{response:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret-access-token"));
        assert!(debug_str.contains("3599"));
    }

    #[test]
    fn test_error_response_tolerates_unknown_shape() {
        let parsed: TokenErrorResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.error.is_empty());

        let parsed: TokenErrorResponse =
            serde_json::from_str(r#"{"error":"invalid_client","error_description":"AADSTS700027"}"#)
                .unwrap();
        assert_eq!(parsed.error, "invalid_client");
    }

    #[test]
    fn test_config_error_mapping() {
        let err = config_error(ConfigError::InvalidScope("bad scope".to_string()));
        assert!(matches!(err, AcquireError::InvalidScope(_)));

        let err = config_error(ConfigError::InvalidAuthority("no scheme".to_string()));
        assert!(matches!(err, AcquireError::Configuration(_)));
    }

    #[test]
    fn test_threshold_includes_drift_margin() {
        assert_eq!(threshold_secs(Duration::from_secs(300)), 330);
        assert_eq!(threshold_secs(Duration::from_secs(0)), 30);
    }
}
