//! API key and connect-token storage on top of a shared [`KeyValueStore`].

use std::sync::Arc;
use std::time::Duration;

use crate::cache::KeyValueStore;
use crate::error::StoreError;

/// Store key holding the service API key.
pub const API_KEY_CACHE_KEY: &str = "pluggy:api_key";
/// Hash holding one connect token per item id.
pub const CONNECT_TOKEN_HASH: &str = "pluggy:connect_tokens";
/// How long a cached API key is trusted.
pub const API_KEY_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Reads and writes upstream credentials.
///
/// A miss, and an empty stored value, both come back as `None`; whether that
/// means "authenticate again" is up to the caller.
#[derive(Clone)]
pub struct CredentialCache {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn api_key(&self) -> Result<Option<String>, StoreError> {
        let key = self.store.get(API_KEY_CACHE_KEY).await?;
        Ok(key.filter(|key| !key.is_empty()))
    }

    pub async fn set_api_key(&self, key: &str) -> Result<(), StoreError> {
        self.set_api_key_with_ttl(key, API_KEY_TTL).await
    }

    pub async fn set_api_key_with_ttl(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        self.store.set(API_KEY_CACHE_KEY, key, Some(ttl)).await
    }

    pub async fn connect_token(&self, item_id: &str) -> Result<Option<String>, StoreError> {
        let token = self.store.hget(CONNECT_TOKEN_HASH, item_id).await?;
        Ok(token.filter(|token| !token.is_empty()))
    }

    /// Stores a token for `item_id`. Tokens carry no TTL of their own.
    pub async fn set_connect_token(&self, item_id: &str, token: &str) -> Result<(), StoreError> {
        self.store.hset(CONNECT_TOKEN_HASH, item_id, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;

    #[tokio::test]
    async fn empty_cached_key_reads_as_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(API_KEY_CACHE_KEY, "", None)
            .await
            .expect("seed empty key");
        let credentials = CredentialCache::new(store);

        assert_eq!(credentials.api_key().await, Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn api_key_expires_after_two_hours() {
        let credentials = CredentialCache::new(Arc::new(MemoryStore::new()));
        credentials.set_api_key("key-1").await.expect("set key");

        tokio::time::advance(API_KEY_TTL - Duration::from_secs(1)).await;
        assert_eq!(credentials.api_key().await, Ok(Some(String::from("key-1"))));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(credentials.api_key().await, Ok(None));
    }
}
