//! Redis-backed [`KeyValueStore`].

use std::time::Duration;

use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use crate::cache::{KeyValueStore, StoreFuture};
use crate::config::RedisConfig;
use crate::error::StoreError;

/// Pooled Redis connection shared by every credential lookup.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    /// Builds the pool. No connection is opened until the first command.
    pub fn new(config: &RedisConfig) -> Result<Self, StoreError> {
        let mut cfg = Config::from_url(config.url());
        cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_max));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn command_error(error: redis::RedisError) -> StoreError {
    if error.is_connection_dropped() || error.is_connection_refusal() || error.is_timeout() {
        StoreError::Unavailable(error.to_string())
    } else {
        StoreError::Command(error.to_string())
    }
}

impl KeyValueStore for RedisStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            conn.get::<_, Option<String>>(key)
                .await
                .map_err(command_error)
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            match ttl {
                Some(ttl) => conn
                    .set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                    .await
                    .map_err(command_error),
                None => conn
                    .set::<_, _, ()>(key, value)
                    .await
                    .map_err(command_error),
            }
        })
    }

    fn hget<'a>(&'a self, key: &'a str, field: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            conn.hget::<_, _, Option<String>>(key, field)
                .await
                .map_err(command_error)
        })
    }

    fn hset<'a>(&'a self, key: &'a str, field: &'a str, value: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            conn.hset::<_, _, _, ()>(key, field, value)
                .await
                .map_err(command_error)
        })
    }
}
