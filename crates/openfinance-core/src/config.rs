//! Runtime configuration read from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PLUGGY_CLIENT_ID` | required | client-credential id |
//! | `PLUGGY_CLIENT_SECRET` | required | client-credential secret |
//! | `PLUGGY_BASE_URL` | `https://api.pluggy.ai` | upstream base URL |
//! | `OPENFINANCE_RATE_LIMIT` | `360` | list requests per window |
//! | `OPENFINANCE_RATE_WINDOW_SECS` | `3600` | rate window length |
//! | `OPENFINANCE_POLL_INTERVAL_SECS` | `5` | item sync poll interval |
//! | `OPENFINANCE_TIMEOUT_MS` | `30000` | per-request timeout |
//! | `REDIS_HOST` | `127.0.0.1` | credential cache host |
//! | `REDIS_PORT` | `6379` | credential cache port |
//! | `REDIS_PASSWORD` | unset | credential cache password |

use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::rate_limit::RateLimitConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.pluggy.ai";

/// Settings for [`PluggyClient`](crate::client::PluggyClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub poll_interval: Duration,
    pub rate_limit: RateLimitConfig,
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            request_timeout_ms: 30_000,
            poll_interval: Duration::from_secs(5),
            rate_limit: RateLimitConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = required(&lookup, "PLUGGY_CLIENT_ID")?;
        let client_secret = required(&lookup, "PLUGGY_CLIENT_SECRET")?;
        let mut config = Self::new(client_id, client_secret);

        if let Some(base_url) = optional(&lookup, "PLUGGY_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(limit) = parsed::<u32, _>(&lookup, "OPENFINANCE_RATE_LIMIT")? {
            if limit == 0 {
                return Err(ConfigError::Invalid {
                    name: "OPENFINANCE_RATE_LIMIT",
                    value: String::from("0"),
                    reason: String::from("must be at least 1"),
                });
            }
            config.rate_limit.limit = limit;
        }
        if let Some(secs) = parsed::<u64, _>(&lookup, "OPENFINANCE_RATE_WINDOW_SECS")? {
            config.rate_limit.window = Duration::from_secs(secs);
        }
        if let Some(secs) = parsed::<u64, _>(&lookup, "OPENFINANCE_POLL_INTERVAL_SECS")? {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(timeout_ms) = parsed::<u64, _>(&lookup, "OPENFINANCE_TIMEOUT_MS")? {
            config.request_timeout_ms = timeout_ms;
        }

        Ok(config)
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("poll_interval", &self.poll_interval)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Connection settings for the Redis credential cache.
#[derive(Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u8,
    pub pool_max: usize,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 6379,
            password: None,
            db: 0,
            pool_max: 8,
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = optional(&lookup, "REDIS_HOST") {
            config.host = host;
        }
        if let Some(port) = parsed::<u16, _>(&lookup, "REDIS_PORT")? {
            config.port = port;
        }
        config.password = optional(&lookup, "REDIS_PASSWORD");
        Ok(config)
    }

    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                urlencoding::encode(password),
                self.host,
                self.port,
                self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

impl Debug for RedisConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db", &self.db)
            .field("pool_max", &self.pool_max)
            .finish()
    }
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::Missing { name })
}

fn parsed<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name)
        .map(|value| {
            value.parse::<T>().map_err(|error| ConfigError::Invalid {
                name,
                value: value.clone(),
                reason: error.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn client_config_requires_credentials() {
        let error = ClientConfig::from_lookup(lookup(&[("PLUGGY_CLIENT_ID", "id")]))
            .expect_err("secret missing");
        assert_eq!(
            error,
            ConfigError::Missing {
                name: "PLUGGY_CLIENT_SECRET"
            }
        );

        let error = ClientConfig::from_lookup(lookup(&[
            ("PLUGGY_CLIENT_ID", "  "),
            ("PLUGGY_CLIENT_SECRET", "secret"),
        ]))
        .expect_err("blank id");
        assert_eq!(
            error,
            ConfigError::Missing {
                name: "PLUGGY_CLIENT_ID"
            }
        );
    }

    #[test]
    fn client_config_applies_defaults_and_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PLUGGY_CLIENT_ID", "id"),
            ("PLUGGY_CLIENT_SECRET", "secret"),
            ("PLUGGY_BASE_URL", "https://sandbox.test/"),
            ("OPENFINANCE_RATE_LIMIT", "10"),
            ("OPENFINANCE_POLL_INTERVAL_SECS", "1"),
        ]))
        .expect("valid config");

        assert_eq!(config.base_url, "https://sandbox.test");
        assert_eq!(config.rate_limit.limit, 10);
        assert_eq!(config.rate_limit.window, Duration::from_secs(3600));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn client_config_rejects_unparsable_numbers() {
        let error = ClientConfig::from_lookup(lookup(&[
            ("PLUGGY_CLIENT_ID", "id"),
            ("PLUGGY_CLIENT_SECRET", "secret"),
            ("OPENFINANCE_TIMEOUT_MS", "soon"),
        ]))
        .expect_err("timeout is not a number");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "OPENFINANCE_TIMEOUT_MS",
                ..
            }
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = ClientConfig::new("id", "top-secret");
        assert!(!format!("{config:?}").contains("top-secret"));

        let redis = RedisConfig {
            password: Some(String::from("hunter2")),
            ..RedisConfig::default()
        };
        assert!(!format!("{redis:?}").contains("hunter2"));
    }

    #[test]
    fn redis_url_encodes_password() {
        let redis = RedisConfig::from_lookup(lookup(&[
            ("REDIS_HOST", "cache.internal"),
            ("REDIS_PASSWORD", "p@ss word"),
        ]))
        .expect("valid config");

        assert_eq!(redis.url(), "redis://:p%40ss%20word@cache.internal:6379/0");
    }
}
