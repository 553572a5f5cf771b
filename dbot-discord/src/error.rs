use std::time::Duration;
use thiserror::Error;

/// Failure reported by a gateway session or connector.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("invalid bot token: {0}")]
    InvalidToken(String),

    #[error("serenity error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("gateway runner task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("gateway stopped before the session became ready")]
    Stopped,

    #[error("session was already opened")]
    AlreadyOpened,

    #[error("session was closed")]
    Closed,

    #[error("no ready event within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl GatewayError {
    /// Wraps an arbitrary error, e.g. from an alternative session backend.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        GatewayError::Other(Box::new(err))
    }
}

/// Error returned by [`crate::Client`]. The variant says which lifecycle step failed;
/// the wrapped [`GatewayError`] is the cause and is also exposed through `source()`.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("discord client error: {0}")]
    Create(#[source] GatewayError),

    #[error("discord client error: {0}")]
    Open(#[source] GatewayError),

    #[error("discord client error: {0}")]
    Close(#[source] GatewayError),
}

impl ClientError {
    pub fn cause(&self) -> &GatewayError {
        match self {
            ClientError::Create(e) | ClientError::Open(e) | ClientError::Close(e) => e,
        }
    }

    pub fn into_cause(self) -> GatewayError {
        match self {
            ClientError::Create(e) | ClientError::Open(e) | ClientError::Close(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
