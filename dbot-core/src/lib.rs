//! # dbot-core
//!
//! Shared ambient setup for the Discord bot crates: tracing initialization and the default
//! logger handed to clients that are not given one.

pub mod logger;

pub use logger::{default_logger, init_tracing};
