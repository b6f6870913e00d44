//! Error taxonomy for token acquisition.
//!
//! Every variant is terminal for the current acquisition: the acquirer never
//! retries on its own, so transient-failure retry policy stays a caller
//! decision. Variants are kept distinct so callers can map them onto
//! transport semantics (bad input vs. rejected request vs. authority not
//! reachable) without string matching.

use crate::store::SecretStoreError;
use thiserror::Error;

/// Errors that can occur while acquiring an access token.
///
/// No variant ever carries private key material, certificate bytes, or
/// token values in its message.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The client configuration is unusable (malformed authority URL,
    /// HTTP client construction failure).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The client certificate could not be fetched from the secret store.
    /// The token endpoint is never contacted in this case.
    #[error("Credential unavailable: {0}")]
    CredentialUnavailable(String),

    /// The stored certificate value does not decode into a usable key pair.
    #[error("Malformed certificate: {0}")]
    MalformedCertificate(String),

    /// The scope is malformed, or the authority rejected it. Signalled
    /// distinctly from other rejections so callers can give actionable
    /// feedback.
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// The authority could not be reached, timed out, or did not produce an
    /// intelligible response.
    #[error("Authority unreachable: {0}")]
    AuthorityUnreachable(String),

    /// The authority answered the exchange with an error response
    /// (invalid client, expired certificate, ...).
    #[error("Token request rejected: {0}")]
    TokenRequestRejected(String),
}

impl From<SecretStoreError> for AcquireError {
    fn from(err: SecretStoreError) -> Self {
        AcquireError::CredentialUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_credential_unavailable() {
        let cases = [
            SecretStoreError::NotFound("kv-client-cert".to_string()),
            SecretStoreError::AccessDenied("kv-client-cert".to_string()),
            SecretStoreError::Unavailable("connection refused".to_string()),
        ];

        for err in cases {
            let mapped = AcquireError::from(err);
            assert!(matches!(mapped, AcquireError::CredentialUnavailable(_)));
        }
    }

    #[test]
    fn test_display_messages_name_the_failure() {
        let err = AcquireError::InvalidScope("expected <resource>/.default".to_string());
        assert!(err.to_string().contains("Invalid scope"));

        let err = AcquireError::AuthorityUnreachable("timed out".to_string());
        assert!(err.to_string().contains("Authority unreachable"));

        let err = AcquireError::TokenRequestRejected("status 400".to_string());
        assert!(err.to_string().contains("Token request rejected"));
    }
}
