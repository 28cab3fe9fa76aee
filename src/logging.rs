//! Initializes the `tracing` subscriber, filtered by `RUST_LOG`.
//!
//! Output goes to stderr, as human-readable lines or as JSON for log
//! aggregation on hosted deployments.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` overrides `default_level` when set, e.g.
/// `RUST_LOG=debtbook=debug,libdebtbook=debug`.
pub fn init_logging(default_level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!("logging initialized (format={:?})", format);
    }
}
