//! Mock [`SessionConnector`] / [`GatewaySession`] for client lifecycle tests.
//!
//! Failures are injected per connector; open/close calls and the credentials passed to
//! `create_session` are recorded so tests can assert on them without touching Discord.

use async_trait::async_trait;
use dbot_discord::{DiscordConfig, GatewayError, GatewaySession, SessionConnector};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Failure injected by the mocks; tests downcast the client error's cause back to it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("injected failure: {0}")]
pub struct InjectedError(pub &'static str);

/// What `MockSession::open` does.
#[derive(Debug, Clone, Copy)]
pub enum OpenBehavior {
    Succeed,
    Fail(&'static str),
    /// Never completes; used with paused time to hit the open timeout.
    Hang,
}

/// Shared call counters.
#[derive(Debug, Default)]
pub struct Calls {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Calls {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct MockSession {
    open: OpenBehavior,
    fail_close: bool,
    calls: Arc<Calls>,
}

#[async_trait]
impl GatewaySession for MockSession {
    async fn open(&mut self) -> Result<(), GatewayError> {
        self.calls.opens.fetch_add(1, Ordering::SeqCst);
        match self.open {
            OpenBehavior::Succeed => Ok(()),
            OpenBehavior::Fail(reason) => Err(GatewayError::other(InjectedError(reason))),
            OpenBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }

    async fn close(&mut self) -> Result<(), GatewayError> {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(GatewayError::other(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "close failed",
            )));
        }
        Ok(())
    }
}

pub struct MockConnector {
    pub create_failure: Option<&'static str>,
    pub open: OpenBehavior,
    pub fail_close: bool,
    pub calls: Arc<Calls>,
    pub credentials: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(open: OpenBehavior) -> Self {
        Self {
            create_failure: None,
            open,
            fail_close: false,
            calls: Arc::new(Calls::default()),
            credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_create(reason: &'static str) -> Self {
        Self {
            create_failure: Some(reason),
            ..Self::new(OpenBehavior::Succeed)
        }
    }

    pub fn recorded_credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionConnector for MockConnector {
    type Session = MockSession;

    async fn create_session(
        &self,
        credential: &str,
        _config: &DiscordConfig,
    ) -> Result<MockSession, GatewayError> {
        self.credentials.lock().unwrap().push(credential.to_string());
        if let Some(reason) = self.create_failure {
            return Err(GatewayError::other(InjectedError(reason)));
        }
        Ok(MockSession {
            open: self.open,
            fail_close: self.fail_close,
            calls: self.calls.clone(),
        })
    }
}
