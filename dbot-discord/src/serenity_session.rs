//! Serenity-backed [`GatewaySession`]. Gateway protocol, sharding, reconnects and rate limits
//! stay inside serenity; this module only maps its client onto open/close.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::gateway::ShardManager;
use serenity::http::Http;
use serenity::model::gateway::Ready;
use serenity::prelude::{Context, EventHandler};
use tokio::sync::{oneshot, Mutex};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, instrument};

use crate::config::{mask_token, DiscordConfig};
use crate::error::GatewayError;
use crate::gateway::{GatewaySession, SessionConnector};

/// Creates [`SerenitySession`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerenityConnector;

#[async_trait]
impl SessionConnector for SerenityConnector {
    type Session = SerenitySession;

    #[instrument(skip_all, fields(token = %mask_token(&config.token)))]
    async fn create_session(
        &self,
        credential: &str,
        config: &DiscordConfig,
    ) -> Result<SerenitySession, GatewayError> {
        serenity::utils::validate_token(credential)
            .map_err(|e| GatewayError::InvalidToken(e.to_string()))?;

        let (ready_tx, ready_rx) = oneshot::channel();
        let client = serenity::Client::builder(credential, config.intents)
            .event_handler(ReadySignal::new(ready_tx))
            .await?;
        debug!(intents = ?config.intents, "Serenity client built");

        Ok(SerenitySession {
            http: client.http.clone(),
            shard_manager: client.shard_manager.clone(),
            client: Some(client),
            ready: Some(ready_rx),
            runner: None,
            closed: false,
        })
    }
}

/// What the first `Ready` event reported. Logged by [`SerenitySession::open`] so the line goes
/// to the client's logger, not to whatever subscriber serenity's dispatch task sees.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReadyInfo {
    user: String,
    guilds: usize,
}

/// Fires once on the first `Ready` event.
struct ReadySignal {
    tx: Mutex<Option<oneshot::Sender<ReadyInfo>>>,
}

impl ReadySignal {
    fn new(tx: oneshot::Sender<ReadyInfo>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    async fn fire(&self, info: ReadyInfo) {
        if let Some(tx) = self.tx.lock().await.take() {
            let _ = tx.send(info);
        }
    }
}

#[async_trait]
impl EventHandler for ReadySignal {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.fire(ReadyInfo {
            user: ready.user.name.clone(),
            guilds: ready.guilds.len(),
        })
        .await;
    }
}

fn log_ready(info: &ReadyInfo) {
    info!(user = %info.user, guilds = info.guilds, "Gateway ready");
}

/// A serenity client plus the task running it once opened.
pub struct SerenitySession {
    /// Taken by the runner task on open.
    client: Option<serenity::Client>,
    ready: Option<oneshot::Receiver<ReadyInfo>>,
    runner: Option<JoinHandle<serenity::Result<()>>>,
    /// Set by close(); a closed session cannot be reopened.
    closed: bool,
    http: Arc<Http>,
    shard_manager: Arc<ShardManager>,
}

impl SerenitySession {
    /// REST client for direct API calls.
    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }

    pub fn shard_manager(&self) -> &Arc<ShardManager> {
        &self.shard_manager
    }

    /// Waits for the runner once the ready signal was dropped without firing.
    async fn runner_exit(&mut self) -> GatewayError {
        match self.runner.take() {
            Some(runner) => exit_error(runner.await),
            None => GatewayError::Stopped,
        }
    }
}

enum Opened {
    Ready(ReadyInfo),
    SignalDropped,
    RunnerExited(Result<serenity::Result<()>, JoinError>),
}

fn exit_error(joined: Result<serenity::Result<()>, JoinError>) -> GatewayError {
    match joined {
        Ok(Ok(())) => GatewayError::Stopped,
        Ok(Err(e)) => GatewayError::Serenity(e),
        Err(e) => GatewayError::Join(e),
    }
}

#[async_trait]
impl GatewaySession for SerenitySession {
    async fn open(&mut self) -> Result<(), GatewayError> {
        if self.closed {
            return Err(GatewayError::Closed);
        }
        let (mut client, ready) = match (self.client.take(), self.ready.take()) {
            (Some(client), Some(ready)) => (client, ready),
            _ => return Err(GatewayError::AlreadyOpened),
        };

        let opened = {
            // Stored before waiting so close() can stop it even if this future is dropped.
            let runner = self
                .runner
                .insert(tokio::spawn(async move { client.start().await }));
            tokio::select! {
                signal = ready => match signal {
                    Ok(info) => Opened::Ready(info),
                    Err(_) => Opened::SignalDropped,
                },
                joined = runner => Opened::RunnerExited(joined),
            }
        };

        match opened {
            Opened::Ready(info) => {
                log_ready(&info);
                Ok(())
            }
            Opened::SignalDropped => Err(self.runner_exit().await),
            Opened::RunnerExited(joined) => {
                self.runner = None;
                Err(exit_error(joined))
            }
        }
    }

    async fn close(&mut self) -> Result<(), GatewayError> {
        self.closed = true;
        // Never opened: dropping the client is enough.
        self.client = None;
        self.ready = None;

        if let Some(runner) = self.runner.take() {
            self.shard_manager.shutdown_all().await;
            match runner.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(GatewayError::Serenity(e)),
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(GatewayError::Join(e)),
            }
            debug!("Serenity runner stopped");
        }
        Ok(())
    }
}
