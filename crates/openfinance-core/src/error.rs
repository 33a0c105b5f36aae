use thiserror::Error;

/// Failures raised while parsing, matching, or building resource URIs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("malformed resource URI '{uri}'")]
    Malformed { uri: String },

    #[error("scheme mismatch: expected '{expected}', got '{actual}'")]
    SchemeMismatch { expected: String, actual: String },

    #[error("URI path '{path}' does not match template '{template}'")]
    PathMismatch { template: String, path: String },

    #[error("template path '{template}' cannot be compiled: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("missing required path parameter '{name}'")]
    MissingPathParam { name: String },
}

/// Key-value store backend failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error("cache command failed: {0}")]
    Command(String),
}

/// Configuration values that are missing or cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    Missing { name: &'static str },

    #[error("invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors returned by [`PluggyClient`](crate::client::PluggyClient) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The upstream answered with a non-200 status. The body is logged, never carried.
    #[error("{endpoint} returned status {status}")]
    Upstream { status: u16, endpoint: String },

    #[error("failed to decode {endpoint} response: {cause}")]
    Decode { endpoint: String, cause: String },

    /// An item finished synchronising in a state other than `UPDATED`.
    #[error("item sync ended with status {status}")]
    ItemSync { status: String },

    #[error("{endpoint} transport error: {message}")]
    Transport {
        endpoint: String,
        message: String,
        retryable: bool,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("credential error: {0}")]
    Credentials(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials(message.into())
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "client.upstream",
            Self::Decode { .. } => "client.decode",
            Self::ItemSync { .. } => "client.item_sync",
            Self::Transport { .. } => "client.transport",
            Self::InvalidRequest(_) => "client.invalid_request",
            Self::Credentials(_) => "client.credentials",
            Self::Store(_) => "client.store",
        }
    }

    /// Whether a caller may reasonably repeat the same call.
    ///
    /// Nothing in this crate retries on its own; this only classifies.
    pub const fn retryable(&self) -> bool {
        match self {
            Self::Upstream { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            Self::Transport { retryable, .. } => *retryable,
            Self::Store(StoreError::Unavailable(_)) => true,
            Self::Decode { .. }
            | Self::ItemSync { .. }
            | Self::InvalidRequest(_)
            | Self::Credentials(_)
            | Self::Store(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_server_errors_are_retryable() {
        let error = ClientError::Upstream {
            status: 503,
            endpoint: String::from("GET /accounts"),
        };
        assert!(error.retryable());
        assert_eq!(error.code(), "client.upstream");

        let error = ClientError::Upstream {
            status: 404,
            endpoint: String::from("GET /accounts/1"),
        };
        assert!(!error.retryable());
    }

    #[test]
    fn decode_errors_are_never_retryable() {
        let error = ClientError::Decode {
            endpoint: String::from("GET /items/1"),
            cause: String::from("expected value at line 1 column 1"),
        };
        assert!(!error.retryable());
        assert_eq!(
            error.to_string(),
            "failed to decode GET /items/1 response: expected value at line 1 column 1"
        );
    }
}
