//! Structured logging for the console.
//!
//! stdout belongs to the terminal UI, so every log line goes to stderr,
//! either human-readable or as JSONL for scripted runs. Level and format
//! come from `LogConfig` (flags and the CM_LOG family of variables).

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Call once, before any logging.
pub fn init_logging(config: &LogConfig) {
    // A full RUST_LOG directive string still wins when present, so
    // per-target filtering stays available for debugging.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from(config.level).into())
    });

    match config.format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Jsonl => {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}
