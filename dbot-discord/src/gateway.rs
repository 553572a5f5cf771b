//! Session seam between [`crate::Client`] and the gateway library.
//!
//! [`SessionConnector`] creates an unconnected session from a bot credential; [`GatewaySession`]
//! covers the open/close lifecycle. [`crate::SerenityConnector`] is the production implementation;
//! tests substitute their own.

use crate::config::DiscordConfig;
use crate::error::GatewayError;
use async_trait::async_trait;

/// Connection handle to the Discord gateway, opaque beyond its lifecycle.
#[async_trait]
pub trait GatewaySession: Send + Sync {
    /// Connects and returns once the initial handshake succeeded or failed.
    async fn open(&mut self) -> Result<(), GatewayError>;
    /// Disconnects. Calling it on a session that is not connected is a no-op.
    async fn close(&mut self) -> Result<(), GatewayError>;
}

/// Creates sessions. `credential` is the full credential string (`"Bot <token>"`).
#[async_trait]
pub trait SessionConnector: Send + Sync {
    type Session: GatewaySession;

    async fn create_session(
        &self,
        credential: &str,
        config: &DiscordConfig,
    ) -> Result<Self::Session, GatewayError>;
}
