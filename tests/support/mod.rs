//! Shared fixtures for the behaviour tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use openfinance_core::{
    ClientConfig, CredentialCache, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse,
    KeyValueStore, MemoryStore, PluggyClient, RateLimitConfig, RateLimiter, StoreError,
    StoreFuture, API_KEY_CACHE_KEY,
};

pub const BASE_URL: &str = "https://pluggy.test";
pub const CACHED_KEY: &str = "cached-key";

type Scripted = Result<HttpResponse, HttpError>;

/// Transport that answers from per-route scripts and records every request.
///
/// A route is `METHOD path`, with the query string ignored. Scripted
/// responses are consumed in order; the last one keeps answering. Unscripted
/// routes answer `404`. Every call yields once before answering so
/// concurrent callers interleave.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(method, path, Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: HttpError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: HttpMethod, path: &str, response: Scripted) {
        self.routes
            .lock()
            .expect("route table is not poisoned")
            .entry(route_key(method, path))
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request log is not poisoned")
            .clone()
    }

    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<HttpRequest> {
        let key = route_key(method, path);
        self.requests()
            .into_iter()
            .filter(|request| request_key(request) == key)
            .collect()
    }

    fn next_response(&self, request: &HttpRequest) -> Scripted {
        let mut routes = self.routes.lock().expect("route table is not poisoned");
        match routes.get_mut(&request_key(request)) {
            Some(script) if script.len() > 1 => script
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "empty script"))),
            Some(script) => script
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "empty script"))),
            None => Ok(HttpResponse::new(404, "no route")),
        }
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self.next_response(&request);
        self.requests
            .lock()
            .expect("request log is not poisoned")
            .push(request);
        Box::pin(async move {
            tokio::task::yield_now().await;
            response
        })
    }
}

fn route_key(method: HttpMethod, path: &str) -> String {
    format!("{} {}", method.as_str(), path)
}

fn request_key(request: &HttpRequest) -> String {
    let path = request
        .url
        .strip_prefix(BASE_URL)
        .unwrap_or(&request.url);
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    route_key(request.method, path)
}

/// Query string of a recorded request, `""` when there is none.
pub fn query_of(request: &HttpRequest) -> &str {
    request.url.split_once('?').map_or("", |(_, query)| query)
}

/// Store whose writes always fail. Reads only ever find the API key it was
/// built with.
pub struct FailingWrites {
    api_key: Option<String>,
}

impl FailingWrites {
    pub fn empty() -> Self {
        Self { api_key: None }
    }

    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_owned()),
        }
    }
}

fn read_only() -> StoreError {
    StoreError::Unavailable(String::from("read-only replica"))
}

impl KeyValueStore for FailingWrites {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        let value = (key == API_KEY_CACHE_KEY)
            .then(|| self.api_key.clone())
            .flatten();
        Box::pin(async move { Ok(value) })
    }

    fn set<'a>(
        &'a self,
        _key: &'a str,
        _value: &'a str,
        _ttl: Option<Duration>,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async { Err(read_only()) })
    }

    fn hget<'a>(&'a self, _key: &'a str, _field: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async { Ok(None) })
    }

    fn hset<'a>(&'a self, _key: &'a str, _field: &'a str, _value: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async { Err(read_only()) })
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("client-id", "client-secret")
        .with_base_url(BASE_URL)
        .with_poll_interval(Duration::from_secs(5))
}

pub fn limiter(limit: u32, window: Duration) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(RateLimitConfig { limit, window }))
}

/// Memory store that already holds [`CACHED_KEY`].
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .set(API_KEY_CACHE_KEY, CACHED_KEY, None)
        .await
        .expect("seed api key");
    store
}

/// Client connected with [`CACHED_KEY`] and a generous rate limit.
pub async fn connected(http: Arc<ScriptedHttpClient>) -> PluggyClient {
    connected_with(http, limiter(1_000, Duration::from_secs(3600))).await
}

pub async fn connected_with(
    http: Arc<ScriptedHttpClient>,
    rate_limiter: Arc<RateLimiter>,
) -> PluggyClient {
    let credentials = CredentialCache::new(seeded_store().await);
    PluggyClient::connect(config(), credentials, rate_limiter, http)
        .await
        .expect("client connects with cached key")
}

pub fn account_json(id: &str) -> String {
    format!(
        r#"{{"id":"{id}","type":"BANK","subtype":"CHECKING_ACCOUNT","name":"Conta Corrente","balance":1520.75,"itemId":"item-1","currencyCode":"BRL"}}"#
    )
}

pub fn item_json(status: &str) -> String {
    format!(r#"{{"id":"item-1","status":"{status}","products":["ACCOUNTS"]}}"#)
}

pub fn page_json(results: &[String]) -> String {
    format!(
        r#"{{"page":1,"total":{total},"totalPages":1,"results":[{items}]}}"#,
        total = results.len(),
        items = results.join(",")
    )
}
