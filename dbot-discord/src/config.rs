//! Client configuration: bot token and gateway intents.
//! Loaded from env (`DISCORD_TOKEN`, `DISCORD_INTENTS`) or built directly from a token.

use anyhow::Result;
use serenity::all::GatewayIntents;
use std::env;
use std::fmt;

/// Configuration copied into a [`crate::Client`] at construction time.
#[derive(Clone, PartialEq, Eq)]
pub struct DiscordConfig {
    /// Discord bot token, without the `Bot ` prefix.
    pub token: String,
    /// Gateway intents requested when the session identifies.
    pub intents: GatewayIntents,
}

/// Supplies the [`DiscordConfig`] for a new client. Implemented by the application's config loading.
pub trait DiscordConfigProvider {
    fn config(&self) -> DiscordConfig;
}

impl DiscordConfigProvider for DiscordConfig {
    fn config(&self) -> DiscordConfig {
        self.clone()
    }
}

impl DiscordConfig {
    /// Builds a config from `token` with non-privileged intents.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            intents: GatewayIntents::non_privileged(),
        }
    }

    /// Loads from env: `DISCORD_TOKEN` required, `DISCORD_INTENTS` optional (decimal bit set).
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Loads from env; `token` overrides `DISCORD_TOKEN` if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let token = match token {
            Some(t) => t,
            None => env::var("DISCORD_TOKEN").map_err(|_| anyhow::anyhow!("DISCORD_TOKEN not set"))?,
        };
        let intents = match env::var("DISCORD_INTENTS") {
            Ok(raw) => {
                let bits: u64 = raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("DISCORD_INTENTS is set but not a number: {}", raw)
                })?;
                GatewayIntents::from_bits_truncate(bits)
            }
            Err(_) => GatewayIntents::non_privileged(),
        };
        Ok(Self { token, intents })
    }

    /// Credential string passed to the gateway library: `"Bot " + token`.
    pub fn bot_credential(&self) -> String {
        format!("Bot {}", self.token)
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &mask_token(&self.token))
            .field("intents", &self.intents)
            .finish()
    }
}

/// Masks a token for safe logging: first 7 chars + "***" + last 4 chars.
/// Tokens of length <= 11 are fully masked as "***".
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}
