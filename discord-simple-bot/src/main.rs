//! Minimal Discord bot: connects with the token from env or CLI, stays online until Ctrl-C.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dbot_discord::{with_open_timeout, Client, DiscordConfig, DEFAULT_OPEN_TIMEOUT};
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "discord-simple-bot")]
#[command(about = "Minimal Discord bot: open a gateway session and wait for Ctrl-C", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord (config from env; token can override DISCORD_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// Seconds to wait for the gateway handshake.
        #[arg(long)]
        open_timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            token,
            open_timeout_secs,
        } => {
            let log_file = std::env::var("LOG_FILE").ok();
            dbot_core::init_tracing(log_file.as_deref())?;

            let config = DiscordConfig::load(token)?;
            let open_timeout = open_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_OPEN_TIMEOUT);
            run(config, open_timeout).await
        }
    }
}

async fn run(config: DiscordConfig, open_timeout: Duration) -> Result<()> {
    info!(?config, "Starting discord bot");

    let mut client = Client::new(&config, vec![with_open_timeout(open_timeout)])
        .await
        .context("Create discord client")?;
    client.open().await.context("Open discord session")?;

    tokio::signal::ctrl_c()
        .await
        .context("Wait for Ctrl-C")?;

    info!("Shutting down");
    client.close().await.context("Close discord session")?;
    Ok(())
}
