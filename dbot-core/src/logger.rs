//! Tracing setup: console output, optional log file, and the default logger handed to clients.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::{
    fmt::format::FmtSpan, fmt::writer::MakeWriterExt, layer::SubscriberExt,
    util::SubscriberInitExt, EnvFilter, Registry,
};

/// Initializes the global tracing subscriber.
///
/// Console and log file (when `log_file_path` is set) share the same fmt layer format:
/// level, target, thread id, span close events and all fields.
/// Level comes from `RUST_LOG` (e.g. `info`, `debug`, `dbot_discord=trace`); defaults to `info`.
/// Load `.env` (e.g. `dotenvy::dotenv()`) before calling, otherwise `RUST_LOG` from it is ignored.
pub fn init_tracing(log_file_path: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = Registry::default().with(env_filter);

    match log_file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = io::stdout.and(Arc::new(file));
            registry
                .with(fmt_layer().with_writer(writer))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;
        }
        None => {
            registry
                .with(fmt_layer().with_writer(io::stdout))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;
        }
    }

    Ok(())
}

fn fmt_layer<S>() -> tracing_subscriber::fmt::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
}

/// Returns the logger clients use when none is injected: the dispatcher active on this thread
/// (the global subscriber once [`init_tracing`] has run, a no-op dispatcher before that).
pub fn default_logger() -> Dispatch {
    tracing::dispatcher::get_default(Dispatch::clone)
}
