//! Typed client for the upstream open-finance API.
//!
//! [`PluggyClient`] composes the shared [`RateLimiter`], the
//! [`CredentialCache`] and an [`HttpClient`]. Every operation follows the
//! same shape: build the URL, throttle if it is a list endpoint, attach
//! the API key, send, then classify the response:
//!
//! - any status other than `200` becomes [`ClientError::Upstream`], with
//!   the body logged at debug level only;
//! - a body that does not decode becomes [`ClientError::Decode`];
//! - otherwise the decoded value is returned.

mod auth;
mod items;
mod resources;

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::credentials::CredentialCache;
use crate::domain::QueryPairs;
use crate::error::ClientError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse};
use crate::rate_limit::RateLimiter;

/// Client for one set of client credentials.
///
/// Holds a read-through copy of the API key taken at construction. The key
/// only changes through [`PluggyClient::reauthenticate`].
pub struct PluggyClient {
    config: ClientConfig,
    credentials: CredentialCache,
    rate_limiter: Arc<RateLimiter>,
    http: Arc<dyn HttpClient>,
    api_key: RwLock<String>,
}

impl PluggyClient {
    /// Builds a ready client.
    ///
    /// Uses the cached API key when there is one, otherwise exchanges the
    /// client credentials and persists the new key before returning. Two
    /// clients connecting at once against an empty cache both exchange;
    /// the last write wins.
    pub async fn connect(
        config: ClientConfig,
        credentials: CredentialCache,
        rate_limiter: Arc<RateLimiter>,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self, ClientError> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(ClientError::credentials(
                "client id and client secret must both be set",
            ));
        }

        let mut client = Self {
            config,
            credentials,
            rate_limiter,
            http,
            api_key: RwLock::new(String::new()),
        };

        let cached = match client.credentials.api_key().await {
            Ok(cached) => cached,
            Err(error) => {
                warn!(%error, "could not read cached api key; exchanging credentials");
                None
            }
        };

        let api_key = match cached {
            Some(api_key) => {
                debug!("using cached api key");
                api_key
            }
            None => {
                info!("no cached api key; exchanging client credentials");
                let api_key = client.exchange_api_key().await?;
                client.credentials.set_api_key(&api_key).await?;
                api_key
            }
        };

        *client
            .api_key
            .get_mut()
            .expect("api key lock is not poisoned") = api_key;
        Ok(client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    fn current_api_key(&self) -> String {
        self.api_key
            .read()
            .expect("api key lock is not poisoned")
            .clone()
    }

    fn replace_api_key(&self, api_key: String) {
        *self.api_key.write().expect("api key lock is not poisoned") = api_key;
    }

    /// `base_url + path`, with `query` encoded in key order.
    fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut url = format!("{}{}", self.config.base_url, path);
        if query.is_empty() {
            return url;
        }

        let mut pairs = query.to_vec();
        pairs.sort_by(|left, right| left.0.cmp(right.0));
        let encoded = pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&encoded);
        url
    }

    /// Authenticated GET. List endpoints pass `throttled = true`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: QueryPairs,
        throttled: bool,
    ) -> Result<T, ClientError> {
        if throttled {
            self.rate_limiter.acquire().await;
        }

        let request = HttpRequest::get(self.url(path, &query))
            .with_auth(&HttpAuth::api_key(self.current_api_key()));
        self.send(endpoint, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: HttpRequest,
    ) -> Result<T, ClientError> {
        let request = request.with_timeout_ms(self.config.request_timeout_ms);
        debug!(
            endpoint,
            method = request.method.as_str(),
            url = %request.url,
            "upstream request"
        );

        let response =
            self.http
                .execute(request)
                .await
                .map_err(|error| ClientError::Transport {
                    endpoint: endpoint.to_owned(),
                    message: error.message().to_owned(),
                    retryable: error.retryable(),
                })?;

        classify(endpoint, response)
    }
}

/// Maps a raw response onto a decoded value or a typed error.
fn classify<T: DeserializeOwned>(endpoint: &str, response: HttpResponse) -> Result<T, ClientError> {
    if !response.is_ok() {
        debug!(
            endpoint,
            status = response.status,
            body = %response.body,
            "upstream rejected request"
        );
        return Err(ClientError::Upstream {
            status: response.status,
            endpoint: endpoint.to_owned(),
        });
    }

    serde_json::from_str(&response.body).map_err(|error| {
        debug!(endpoint, body = %response.body, "undecodable upstream response");
        ClientError::Decode {
            endpoint: endpoint.to_owned(),
            cause: error.to_string(),
        }
    })
}

/// Rejects blank ids before anything is sent.
fn require_id<'a>(name: &str, value: &'a str) -> Result<&'a str, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::invalid_request(format!("{name} is required")));
    }
    Ok(value)
}

/// Path segment for an id, percent-encoded.
///
/// Resource URIs keep ids as written, so an id that is already encoded is
/// decoded first and not escaped twice.
fn segment(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => urlencoding::encode(&decoded).into_owned(),
        Err(_) => urlencoding::encode(value).into_owned(),
    }
}
