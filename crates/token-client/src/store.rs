//! Secret-store boundary for certificate retrieval.
//!
//! The acquirer depends on, but does not implement, a secret store that maps
//! a certificate name to its stored value (a single "get secret by name"
//! read). Deployments plug their vault client in behind [`SecretStore`];
//! tests use a small in-memory implementation.
//!
//! The stored value for a certificate secret is the base64-encoded PEM
//! bundle (private key plus certificate chain); decoding it is the
//! acquirer's job, not the store's.

use async_trait::async_trait;
use common::secret::SecretString;
use thiserror::Error;

/// Errors surfaced by a secret-store implementation.
#[derive(Error, Debug, Clone)]
pub enum SecretStoreError {
    /// No secret exists under the requested name.
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The store rejected the caller's identity.
    #[error("Access to secret denied: {0}")]
    AccessDenied(String),

    /// The store could not be reached, or the request timed out.
    #[error("Secret store unavailable: {0}")]
    Unavailable(String),
}

/// A read-only secret store keyed by name.
///
/// Implementations must apply their own request timeouts so a hung store
/// surfaces as [`SecretStoreError::Unavailable`] rather than blocking the
/// acquisition indefinitely.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the secret stored under `name`.
    async fn get_secret(&self, name: &str) -> Result<SecretString, SecretStoreError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapStore(HashMap<String, String>);

    #[async_trait]
    impl SecretStore for MapStore {
        async fn get_secret(&self, name: &str) -> Result<SecretString, SecretStoreError> {
            self.0
                .get(name)
                .map(|value| SecretString::from(value.clone()))
                .ok_or_else(|| SecretStoreError::NotFound(name.to_string()))
        }
    }

    #[tokio::test]
    async fn test_trait_is_object_safe() {
        let store: Box<dyn SecretStore> = Box::new(MapStore(HashMap::from([(
            "kv-client-cert".to_string(),
            "dGVzdA==".to_string(),
        )])));

        let secret = store.get_secret("kv-client-cert").await.unwrap();
        use common::secret::ExposeSecret;
        assert_eq!(secret.expose_secret(), "dGVzdA==");
    }

    #[tokio::test]
    async fn test_missing_secret_is_not_found() {
        let store = MapStore(HashMap::new());
        let err = store.get_secret("missing").await.unwrap_err();

        assert!(matches!(err, SecretStoreError::NotFound(name) if name == "missing"));
    }
}
