//! Key-value store contract and an in-process implementation.
//!
//! The contract mirrors the small subset of Redis the credential cache
//! needs: string get/set with an optional TTL and hash get/set.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::StoreError;

/// Boxed future returned by every [`KeyValueStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Shared key-value store. A miss is `Ok(None)`, never an error.
pub trait KeyValueStore: Send + Sync {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Stores `value` under `key`. `None` keeps the entry until overwritten.
    fn set<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StoreFuture<'a, ()>;

    fn hget<'a>(&'a self, key: &'a str, field: &'a str) -> StoreFuture<'a, Option<String>>;

    fn hset<'a>(&'a self, key: &'a str, field: &'a str, value: &'a str) -> StoreFuture<'a, ()>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now <= expires_at)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    strings: HashMap<String, CacheEntry>,
    hashes: HashMap<String, HashMap<String, String>>,
}

/// Thread-safe in-memory store, used for tests and single-process runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let now = Instant::now();
            let store = self.inner.read().await;
            Ok(store
                .strings
                .get(key)
                .filter(|entry| entry.is_live(now))
                .map(|entry| entry.value.clone()))
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let now = Instant::now();
            let expires_at = ttl.map(|ttl| now + ttl);
            let mut store = self.inner.write().await;
            store.strings.retain(|_, entry| entry.is_live(now));
            store.strings.insert(
                key.to_owned(),
                CacheEntry {
                    value: value.to_owned(),
                    expires_at,
                },
            );
            Ok(())
        })
    }

    fn hget<'a>(&'a self, key: &'a str, field: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let store = self.inner.read().await;
            Ok(store
                .hashes
                .get(key)
                .and_then(|hash| hash.get(field))
                .cloned())
        })
    }

    fn hset<'a>(&'a self, key: &'a str, field: &'a str, value: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut store = self.inner.write().await;
            store
                .hashes
                .entry(key.to_owned())
                .or_default()
                .insert(field.to_owned(), value.to_owned());
            Ok(())
        })
    }
}
