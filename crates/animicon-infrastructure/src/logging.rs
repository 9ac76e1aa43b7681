//! Tracing setup for the binary.
//!
//! Output goes to a daily-rolling file so it never interleaves with the REPL.

use std::path::Path;

use animicon_core::config::{DEFAULT_LOG_LEVEL, LoggingSettings};
use animicon_core::error::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_PREFIX: &str = "animicon.log";

/// Builds the filter from `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(from_env.as_deref(), default_level)
}

fn filter_from(directives: Option<&str>, default_level: &str) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(default_level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Installs the global subscriber writing into `default_dir` unless
/// `settings.directory` overrides it.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(settings: &LoggingSettings, default_dir: &Path) -> Result<WorkerGuard> {
    let directory = settings.directory.as_deref().unwrap_or(default_dir);
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(&settings.level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| animicon_core::AnimiconError::internal(format!("Failed to install logger: {e}")))?;

    tracing::info!("[logging] Writing logs to {}", directory.display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_level_falls_back() {
        let filter = filter_from(None, "definitely=not=a=filter");
        assert_eq!(filter.to_string(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_env_directives_win_over_configured_level() {
        assert_eq!(filter_from(Some("warn"), "debug").to_string(), "warn");
        assert_eq!(filter_from(None, "debug").to_string(), "debug");
    }

    #[test]
    fn test_invalid_env_directives_use_configured_level() {
        assert_eq!(filter_from(Some("=[oops"), "error").to_string(), "error");
    }

    #[test]
    fn test_init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let settings = LoggingSettings::default();

        let result = init(&settings, &logs);

        assert!(logs.is_dir());
        // A second subscriber in the same process is refused, not fatal.
        if result.is_ok() {
            assert!(init(&settings, &logs).is_err());
        }
    }
}
