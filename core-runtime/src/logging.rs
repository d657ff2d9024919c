//! # Logging & Tracing Infrastructure
//!
//! Structured logging with the `tracing` crate, supporting:
//! - Pretty, JSON, and compact output formats
//! - Module-level filtering via `tracing-subscriber` env-filter directives
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! fn main() {
//!     let config = LoggingConfig::default()
//!         .with_format(LogFormat::Compact)
//!         .with_filter("core_router=debug,core_cache=trace");
//!
//!     init_logging(config).expect("Failed to initialize logging");
//!
//!     tracing::info!("Worker starting");
//! }
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level when no filter is given
    pub level: Level,
    /// Custom filter string (e.g., "core_router=debug,core_cache=trace")
    pub filter: Option<String>,
    /// Display target module in logs
    pub display_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: Level::INFO,
            filter: None,
            display_target: true,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set a custom env-filter directive string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Show or hide the target module in log lines
    pub fn with_display_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    /// The effective env-filter directive string.
    fn filter_directives(&self) -> String {
        match &self.filter {
            Some(directives) => directives.clone(),
            None => self.level.to_string().to_lowercase(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at startup; a second call returns an error because the global
/// subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.filter_directives())
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.display_target);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_level(Level::DEBUG)
            .with_display_target(false);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, Level::DEBUG);
        assert!(!config.display_target);
    }

    #[test]
    fn test_filter_directives_fall_back_to_level() {
        let config = LoggingConfig::default().with_level(Level::WARN);
        assert_eq!(config.filter_directives(), "warn");

        let custom = LoggingConfig::default().with_filter("core_router=trace");
        assert_eq!(custom.filter_directives(), "core_router=trace");
    }
}
