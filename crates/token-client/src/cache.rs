//! Process-local access-token cache.
//!
//! Tokens are cached per (client id, scope) and reused until they come
//! within the refresh threshold (plus a clock-drift margin) of expiry.
//! Reads take a shared lock; concurrent callers observing an expiring token
//! may each acquire a replacement — the cache keeps whichever insert lands
//! last, which is safe because every acquired token is valid.

use crate::acquirer::AccessToken;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// One entry per (client id, scope) pair.
type CacheKey = (String, String);

#[derive(Default)]
pub(crate) struct TokenCache {
    entries: RwLock<HashMap<CacheKey, AccessToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get a cached token that stays valid beyond `now + threshold_secs`.
    pub(crate) async fn get(
        &self,
        client_id: &str,
        scope: &str,
        now: i64,
        threshold_secs: i64,
    ) -> Option<AccessToken> {
        let entries = self.entries.read().await;
        entries
            .get(&(client_id.to_string(), scope.to_string()))
            .filter(|token| !token.expires_within(now, threshold_secs))
            .cloned()
    }

    /// Store a freshly acquired token.
    pub(crate) async fn insert(&self, client_id: &str, scope: &str, token: AccessToken) {
        let mut entries = self.entries.write().await;
        entries.insert((client_id.to_string(), scope.to_string()), token);
    }
}
