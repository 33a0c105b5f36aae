use openfinance_core::{ClientError, ConfigError, StoreError, UriError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Uri(#[from] UriError),

    #[error("no resource template matches '{0}'")]
    UnknownResource(String),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The client could not be built; nothing was served.
    #[error("could not connect to the aggregation API: {0}")]
    Connect(ClientError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_)
            | Self::Usage(_)
            | Self::Uri(_)
            | Self::UnknownResource(_)
            | Self::UnknownTool(_) => 2,
            Self::Store(_) | Self::Connect(_) => 3,
            Self::Client(_) => 4,
            Self::Serialization(_) => 5,
            Self::Logging(_) | Self::Io(_) => 10,
        }
    }
}
