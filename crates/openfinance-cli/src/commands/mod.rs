mod read;
mod statements;
mod tool;

use std::sync::Arc;

use openfinance_core::{
    ClientConfig, CredentialCache, KeyValueStore, MemoryStore, PluggyClient, RateLimiter,
    RedisConfig, RedisStore, ReqwestHttpClient,
};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::{CacheBackend, Cli, Command};
use crate::error::CliError;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Resources => Ok(json!({ "resources": ResourceRegistry::new()?.describe() })),
        Command::Tools => Ok(json!({ "tools": ToolRegistry::default().describe() })),
        Command::Read(args) => {
            let client = connect(cli.cache).await?;
            read::run(args, &client).await
        }
        Command::Tool(args) => {
            let client = connect(cli.cache).await?;
            tool::run(args, &client).await
        }
        Command::Statements(args) => {
            let client = connect(cli.cache).await?;
            statements::run(args, &client).await
        }
    }
}

/// Builds the client in dependency order: store, credential cache, rate
/// limiter, then the client itself.
async fn connect(cache: CacheBackend) -> Result<PluggyClient, CliError> {
    let config = ClientConfig::from_env()?;

    let store: Arc<dyn KeyValueStore> = match cache {
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
        CacheBackend::Redis => Arc::new(RedisStore::new(&RedisConfig::from_env()?)?),
    };
    let credentials = CredentialCache::new(store);
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));

    info!(base_url = %config.base_url, ?cache, "connecting");
    PluggyClient::connect(
        config,
        credentials,
        rate_limiter,
        Arc::new(ReqwestHttpClient::new()),
    )
    .await
    .map_err(CliError::Connect)
}
