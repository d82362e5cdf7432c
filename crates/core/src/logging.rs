//! Logging bootstrap built on the tracing ecosystem.
//!
//! stdout carries the protocol stream, so every log layer writes to stderr or
//! to a rolling file, never to stdout.
//!
//! # Environment Variables
//!
//! - `SKILLROUTER_LOG`: filter directive (like `RUST_LOG`), e.g. `skillrouter=debug`
//! - `SKILLROUTER_LOG_FORMAT`: stderr format: `pretty`, `json`, `compact`
//! - `SKILLROUTER_LOG_FILE`: enable file logging (`1`/`true`/`yes`)
//! - `SKILLROUTER_LOG_DIR`: file log directory (default `~/.skillrouter/logs`)

use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    /// Get the string representation of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Build an EnvFilter from environment variables and the configured level.
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    let filter = env::var("SKILLROUTER_LOG")
        .ok()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| config.level.clone());

    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Determine the stderr output format.
fn detect_format(config: &LoggingConfig) -> LogFormat {
    if let Ok(fmt_str) = env::var("SKILLROUTER_LOG_FORMAT")
        && let Some(fmt) = LogFormat::parse_str(&fmt_str)
    {
        return fmt;
    }

    if let Some(fmt) = LogFormat::parse_str(&config.format) {
        return fmt;
    }

    if atty::is(atty::Stream::Stderr) { LogFormat::Pretty } else { LogFormat::Compact }
}

fn file_logging_enabled(config: &LoggingConfig) -> bool {
    match env::var("SKILLROUTER_LOG_FILE") {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => config.file,
    }
}

/// Get the file log directory path.
fn log_dir() -> Result<PathBuf> {
    if let Ok(custom_dir) = env::var("SKILLROUTER_LOG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }

    let home = dirs::home_dir().ok_or_else(|| Error::Config("could not determine home directory".to_string()))?;
    Ok(home.join(".skillrouter").join("logs"))
}

/// Initialize the global tracing subscriber.
///
/// Returns the file appender guard when file logging is active; the caller
/// must keep it alive or buffered log lines are lost on shutdown.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>> {
    let config = config.unwrap_or_default();
    let env_filter = build_env_filter(&config);
    let format = detect_format(&config);

    let registry = Registry::default().with(env_filter);

    if file_logging_enabled(&config) {
        let dir = log_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| Error::Config(format!("failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(dir, "skillrouter.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match format {
            LogFormat::Pretty => {
                registry
                    .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                    .with(fmt::layer().json().with_writer(non_blocking))
                    .init();
            }
            LogFormat::Json => {
                registry
                    .with(fmt::layer().json().with_writer(io::stderr))
                    .with(fmt::layer().json().with_writer(non_blocking))
                    .init();
            }
            LogFormat::Compact => {
                registry
                    .with(fmt::layer().compact().with_writer(io::stderr))
                    .with(fmt::layer().json().with_writer(non_blocking))
                    .init();
            }
        }

        Ok(Some(guard))
    } else {
        match format {
            LogFormat::Pretty => {
                registry
                    .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                    .init();
            }
            LogFormat::Json => {
                registry.with(fmt::layer().json().with_writer(io::stderr)).init();
            }
            LogFormat::Compact => {
                registry.with(fmt::layer().compact().with_writer(io::stderr)).init();
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
        assert_eq!(LogFormat::parse_str(""), None);
    }

    #[test]
    fn test_log_format_as_str() {
        assert_eq!(LogFormat::Pretty.as_str(), "pretty");
        assert_eq!(LogFormat::Json.as_str(), "json");
        assert_eq!(LogFormat::Compact.as_str(), "compact");
    }

    #[test]
    fn test_log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_build_env_filter_uses_config_level() {
        // The filter is built from the config level when no env override is
        // set; an invalid directive falls back to "warn" instead of failing.
        let config = LoggingConfig { level: "not a directive !!".to_string(), ..Default::default() };
        let _filter = build_env_filter(&config);
    }

    #[test]
    fn test_file_logging_respects_config() {
        let config = LoggingConfig { file: true, ..Default::default() };
        if env::var("SKILLROUTER_LOG_FILE").is_err() {
            assert!(file_logging_enabled(&config));
        }
    }
}
