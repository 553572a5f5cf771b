//! # dbot-discord
//!
//! Thin wrapper around serenity: a [`Client`] built from a [`DiscordConfigProvider`] and functional
//! [`ClientOption`]s, with an open/close lifecycle and uniform [`ClientError`] wrapping.
//! Gateway protocol, sharding, rate limiting, reconnects and event dispatch stay in serenity;
//! reach them through [`Client::session`].

mod client;
mod config;
mod error;
mod gateway;
mod serenity_session;

pub use client::{
    with_logger, with_open_timeout, Client, ClientOption, ClientSettings, DEFAULT_OPEN_TIMEOUT,
};
pub use config::{mask_token, DiscordConfig, DiscordConfigProvider};
pub use error::{ClientError, GatewayError, Result};
pub use gateway::{GatewaySession, SessionConnector};
pub use serenity_session::{SerenityConnector, SerenitySession};

pub use serenity;
