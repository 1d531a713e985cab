//! Tracing subscriber setup
//!
//! Production environments log JSON, everything else logs colored text.
//! Output goes to stderr; stdout is reserved for `run-script` results.

use crate::config::get_environment;
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// An explicit `LOG_FORMAT` (`json` or `pretty`) wins over the environment.
    pub fn select(environment: &str, requested: Option<&str>) -> Self {
        match requested.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty" | "text") => LogFormat::Pretty,
            _ if matches!(environment, "production" | "prod") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` sets the filter (default
/// `info`); a second call keeps the first subscriber.
pub fn init_logging() {
    let format = LogFormat::select(&get_environment(), env::var("LOG_FORMAT").ok().as_deref());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.with_ansi(true)).try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, ?format, "logging already initialized");
    }
}
