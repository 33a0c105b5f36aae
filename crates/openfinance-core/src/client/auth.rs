use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{require_id, PluggyClient};
use crate::error::ClientError;
use crate::http_client::{HttpAuth, HttpRequest};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectTokenRequest<'a> {
    item_id: &'a str,
    options: ConnectTokenOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectTokenOptions {
    avoid_duplicates: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectTokenResponse {
    access_token: String,
}

impl PluggyClient {
    /// Exchanges the client credentials for a fresh API key.
    ///
    /// The key held by this client and the cached key are left untouched.
    pub async fn api_key(&self) -> Result<String, ClientError> {
        self.exchange_api_key().await
    }

    /// Exchanges the credentials again, caches the new key for two hours
    /// and makes it the key used by every later request.
    pub async fn reauthenticate(&self) -> Result<(), ClientError> {
        let api_key = self.exchange_api_key().await?;
        self.credentials.set_api_key(&api_key).await?;
        self.replace_api_key(api_key);
        info!("api key refreshed");
        Ok(())
    }

    /// Issues a connect token for `item_id`.
    ///
    /// The token is cached on a best-effort basis: a failing cache write is
    /// logged and the token is still returned.
    pub async fn connect_token(&self, item_id: &str) -> Result<String, ClientError> {
        let item_id = require_id("item id", item_id)?;
        let payload = ConnectTokenRequest {
            item_id,
            options: ConnectTokenOptions {
                avoid_duplicates: true,
            },
        };
        let request = HttpRequest::post(self.url("/connect_token", &[]))
            .with_json_body(&payload)
            .map_err(|error| ClientError::invalid_request(error.to_string()))?
            .with_auth(&HttpAuth::api_key(self.current_api_key()));

        let response: ConnectTokenResponse = self.send("/connect_token", request).await?;

        if let Err(error) = self
            .credentials
            .set_connect_token(item_id, &response.access_token)
            .await
        {
            warn!(item_id, %error, "failed to cache connect token");
        }

        Ok(response.access_token)
    }

    /// Previously issued connect token for `item_id`, if the cache has one.
    pub async fn cached_connect_token(&self, item_id: &str) -> Result<Option<String>, ClientError> {
        let item_id = require_id("item id", item_id)?;
        Ok(self.credentials.connect_token(item_id).await?)
    }

    pub(super) async fn exchange_api_key(&self) -> Result<String, ClientError> {
        let payload = AuthRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };
        let request = HttpRequest::post(self.url("/auth", &[]))
            .with_json_body(&payload)
            .map_err(|error| ClientError::invalid_request(error.to_string()))?;

        let response: AuthResponse = self.send("/auth", request).await?;
        if response.api_key.is_empty() {
            return Err(ClientError::credentials("key exchange returned an empty api key"));
        }

        info!("exchanged client credentials for an api key");
        Ok(response.api_key)
    }
}
