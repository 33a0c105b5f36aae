//! # Openfinance Core
//!
//! API client layer for an open-finance aggregation service.
//!
//! ## Overview
//!
//! - **URI templates** that route resource URIs such as
//!   `accounts://{account_id}/transactions` into path and query parameters
//! - **Fixed-window rate limiter** shared by every list request
//! - **Credential cache** for the API key and per-item connect tokens, on
//!   top of an in-memory or Redis key-value store
//! - **Typed API client** with uniform status classification and decoding
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`uri`] | Resource URI parsing, template matching and building |
//! | [`rate_limit`] | Fixed-window request budget |
//! | [`cache`] | Key-value store contract and in-memory store |
//! | [`redis_store`] | Redis-backed key-value store |
//! | [`credentials`] | API key and connect-token cache |
//! | [`client`] | Upstream API client |
//! | [`domain`] | Decode targets, filters and statements |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`config`] | Environment configuration |
//! | [`error`] | Error types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use openfinance_core::{
//!     ClientConfig, CredentialCache, MemoryStore, PluggyClient, RateLimiter,
//!     ReqwestHttpClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let credentials = CredentialCache::new(Arc::new(MemoryStore::new()));
//!     let limiter = Arc::new(RateLimiter::new(config.rate_limit));
//!     let client = PluggyClient::connect(
//!         config,
//!         credentials,
//!         limiter,
//!         Arc::new(ReqwestHttpClient::new()),
//!     )
//!     .await?;
//!
//!     let accounts = client.accounts("item-id").await?;
//!     for account in accounts.results {
//!         println!("{} {:.2}", account.name, account.balance);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Resource URI    │────▶│ URI Template     │
//! └────────┬────────┘     └──────────────────┘
//!          │ path / query params
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  PluggyClient   │────▶│ Rate Limiter     │
//! └────────┬────────┘     └──────────────────┘
//!          │              ┌──────────────────┐
//!          ├─────────────▶│ Credential Cache │──▶ KeyValueStore
//!          │              └──────────────────┘
//!          ▼
//! ┌─────────────────┐
//! │ HTTP Client     │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use openfinance_core::ClientError;
//!
//! match client.item("item-id").await {
//!     Ok(item) => println!("{}", item.status),
//!     Err(ClientError::Upstream { status, .. }) if status == 404 => {}
//!     Err(error) if error.retryable() => {}
//!     Err(error) => eprintln!("{}: {error}", error.code()),
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod rate_limit;
pub mod redis_store;
pub mod uri;

pub use cache::{KeyValueStore, MemoryStore, StoreFuture};
pub use client::PluggyClient;
pub use config::{ClientConfig, RedisConfig, DEFAULT_BASE_URL};
pub use credentials::{CredentialCache, API_KEY_CACHE_KEY, API_KEY_TTL, CONNECT_TOKEN_HASH};
pub use domain::{
    Account, Bill, Investment, InvestmentType, InvestmentsFilter, Item, ItemStatus, Page,
    Statement, Transaction, TransactionFilter,
};
pub use error::{ClientError, ConfigError, StoreError, UriError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use redis_store::RedisStore;
pub use uri::{ResourceUri, TimeLayout, UriTemplate};
