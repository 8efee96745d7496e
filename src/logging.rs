// src/logging.rs

//! Logging setup for hosts embedding the runner, using `tracing` +
//! `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. the level passed by the host (if provided)
//! 2. `QUALIFICATION_RUNNER_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs are sent to STDERR.

use anyhow::{Result, anyhow};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;

use crate::types::LogLevel;

pub const LOG_ENV_VAR: &str = "QUALIFICATION_RUNNER_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup; a second call returns an error instead of
/// panicking.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    let filter = level
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::OFF);

    fmt()
        .with_max_level(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

fn resolve_level(level: Option<LogLevel>, env_value: Option<&str>) -> Option<tracing::Level> {
    match level {
        Some(lvl) => lvl.as_tracing_level(),
        None => env_value
            .and_then(|s| s.parse::<LogLevel>().ok())
            .map(LogLevel::as_tracing_level)
            .unwrap_or(Some(tracing::Level::INFO)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins_over_env() {
        assert_eq!(
            resolve_level(Some(LogLevel::Debug), Some("error")),
            Some(tracing::Level::DEBUG)
        );
    }

    #[test]
    fn env_level_is_used_when_no_explicit_level() {
        assert_eq!(resolve_level(None, Some("warning")), Some(tracing::Level::WARN));
        assert_eq!(resolve_level(None, Some("none")), None);
    }

    #[test]
    fn garbage_env_falls_back_to_info() {
        assert_eq!(resolve_level(None, Some("loud")), Some(tracing::Level::INFO));
        assert_eq!(resolve_level(None, None), Some(tracing::Level::INFO));
    }
}
