//! Structured logging for Portico.
//!
//! Portico's crates only emit events through `tracing` macros: realizations
//! at `info`, builder steps and each invocation at `debug`, failures at
//! `warn`. Nothing is printed until the embedding application installs a
//! subscriber, for example via [`init_logging`].
//!
//! # Example
//!
//! ```rust,ignore
//! use portico_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(operation = "sayHello", "Invocation started");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output layout of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogStyle {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human-readable output.
    Pretty,
    /// Single-line, human-readable output.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether a subscriber is installed at all.
    pub enabled: bool,

    /// `EnvFilter` directive, e.g. `"info"` or `"portico_runtime=debug,warn"`.
    pub filter: String,

    /// Output layout.
    pub style: LogStyle,

    /// Whether events carry their source file and line.
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output with Portico's own crates at `debug`.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            filter: "info,portico_core=debug,portico_intercept=debug,portico_runtime=debug"
                .to_string(),
            style: LogStyle::Pretty,
            include_location: true,
        }
    }

    /// JSON output at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            filter: "info".to_string(),
            style: LogStyle::Json,
            include_location: false,
        }
    }

    /// Checks that the filter directive parses.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidFilter` for a malformed directive.
    pub fn validate(&self) -> TelemetryResult<()> {
        create_env_filter(&self.filter).map(|_| ())
    }
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// A disabled config installs nothing.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directive is malformed and
/// `TelemetryError::SubscriberInstalled` if a global subscriber already exists.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.filter)?;
    let base = tracing_subscriber::fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(true);

    let layer = match config.style {
        LogStyle::Json => base.json().with_filter(filter).boxed(),
        LogStyle::Pretty => base.pretty().with_filter(filter).boxed(),
        LogStyle::Compact => base.compact().with_filter(filter).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInstalled(e.to_string()))
}

/// Parses an `EnvFilter` directive.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directive is malformed.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}
