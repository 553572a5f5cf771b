//! [`Client`]: option-configured construction and the open/close lifecycle around a gateway session.

use std::time::Duration;

use tracing::instrument::WithSubscriber;
use tracing::{debug, info, warn, Dispatch};

use crate::config::{mask_token, DiscordConfig, DiscordConfigProvider};
use crate::error::{ClientError, GatewayError, Result};
use crate::gateway::{GatewaySession, SessionConnector};
use crate::serenity_session::{SerenityConnector, SerenitySession};

/// Time allowed for the initial handshake in [`Client::open`].
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Optional client fields that [`ClientOption`]s mutate.
pub struct ClientSettings {
    pub logger: Dispatch,
    pub open_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            logger: dbot_core::default_logger(),
            open_timeout: DEFAULT_OPEN_TIMEOUT,
        }
    }
}

/// Mutator applied after defaults and config are set; options run in order, so the last one wins.
pub type ClientOption = Box<dyn FnOnce(&mut ClientSettings) + Send>;

/// Replaces the default logger.
pub fn with_logger(logger: impl Into<Dispatch>) -> ClientOption {
    let logger = logger.into();
    Box::new(move |s: &mut ClientSettings| s.logger = logger)
}

/// Replaces [`DEFAULT_OPEN_TIMEOUT`].
pub fn with_open_timeout(timeout: Duration) -> ClientOption {
    Box::new(move |s: &mut ClientSettings| s.open_timeout = timeout)
}

/// Discord client: holds the config it was built with, its logger and the gateway session.
///
/// Only obtainable through [`Client::new`] / [`Client::with_connector`], so the session is always
/// present until a failed [`Client::open`] or an explicit [`Client::close`] tears it down.
pub struct Client<S: GatewaySession = SerenitySession> {
    settings: ClientSettings,
    config: DiscordConfig,
    session: Option<S>,
}

impl Client<SerenitySession> {
    /// Creates a serenity-backed client from the provider's config, then applies `options` in order.
    pub async fn new<P, I>(provider: &P, options: I) -> Result<Self>
    where
        P: DiscordConfigProvider + ?Sized,
        I: IntoIterator<Item = ClientOption>,
    {
        Self::with_connector(&SerenityConnector, provider, options).await
    }
}

impl<S: GatewaySession> Client<S> {
    /// Creates a client whose session comes from `connector`.
    /// Fails with [`ClientError::Create`] when the session cannot be created.
    pub async fn with_connector<C, P, I>(connector: &C, provider: &P, options: I) -> Result<Self>
    where
        C: SessionConnector<Session = S> + ?Sized,
        P: DiscordConfigProvider + ?Sized,
        I: IntoIterator<Item = ClientOption>,
    {
        let mut settings = ClientSettings::default();
        let config = provider.config();

        let session = connector
            .create_session(&config.bot_credential(), &config)
            .await
            .map_err(ClientError::Create)?;

        for apply in options {
            apply(&mut settings);
        }

        let client = Self {
            settings,
            config,
            session: Some(session),
        };
        client.log(|| debug!(token = %mask_token(&client.config.token), "Discord client created"));
        Ok(client)
    }

    /// Connects the session; returns once the initial handshake succeeded or failed.
    ///
    /// On failure (including the open timeout) the session is closed and dropped, so
    /// [`Client::session`] returns `None` afterwards.
    ///
    /// # Panics
    ///
    /// Panics if the session is gone, i.e. `open` is called after a failed `open` or after `close`.
    pub async fn open(&mut self) -> Result<()> {
        let logger = self.settings.logger.clone();
        let timeout = self.settings.open_timeout;
        async {
            let session = match self.session.as_mut() {
                Some(session) => session,
                None => panic!(
                    "discord/session: session is gone; open() called after a failed open() or close()"
                ),
            };

            let outcome = match tokio::time::timeout(timeout, session.open()).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout(timeout)),
            };

            match outcome {
                Ok(()) => {
                    info!("Discord session opened");
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "Discord session failed to open; tearing down");
                    self.purge().await;
                    Err(ClientError::Open(e))
                }
            }
        }
        .with_subscriber(logger)
        .await
    }

    /// Disconnects and drops the session. No-op when the session is already gone.
    pub async fn close(&mut self) -> Result<()> {
        let logger = self.settings.logger.clone();
        async {
            let Some(mut session) = self.session.take() else {
                return Ok(());
            };
            session.close().await.map_err(ClientError::Close)?;
            info!("Discord session closed");
            Ok(())
        }
        .with_subscriber(logger)
        .await
    }

    /// Best-effort teardown: closes and drops the session; close errors are only logged.
    pub(crate) async fn purge(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close().await {
                warn!(error = %e, "Failed to close discord session during teardown");
            }
        }
    }

    /// The session, or `None` after teardown.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    pub fn logger(&self) -> &Dispatch {
        &self.settings.logger
    }

    pub fn open_timeout(&self) -> Duration {
        self.settings.open_timeout
    }

    fn log<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.settings.logger, f)
    }
}
