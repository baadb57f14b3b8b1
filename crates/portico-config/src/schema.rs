//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use portico_core::naming::{DEFAULT_PREFIX, DEFAULT_SUFFIX_LENGTH};
use portico_core::NamingPolicy;
use portico_telemetry::{LogConfig, LogStyle, MetricsConfig, TelemetryConfig};
use serde::{Deserialize, Serialize};

/// Naming policy section.
///
/// Controls the qualified names drawn for synthesized types.
///
/// # Example
///
/// ```
/// use portico_config::NamingConfig;
///
/// let config = NamingConfig {
///     fixed_name: Some("com.acme.Greeter".to_string()),
///     ..Default::default()
/// };
/// assert!(config.policy().is_pinned());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
    /// Prefix prepended to the base contract name.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Append `$` and a random suffix to every name.
    #[serde(default = "default_true")]
    pub random_suffix: bool,

    /// Length of the random suffix (at least 8).
    #[serde(default = "default_suffix_length")]
    pub suffix_length: usize,

    /// Fixed name used instead of the prefix; the caller owns uniqueness.
    #[serde(default)]
    pub fixed_name: Option<String>,
}

impl NamingConfig {
    /// Returns the naming policy described by this section.
    #[must_use]
    pub fn policy(&self) -> NamingPolicy {
        match &self.fixed_name {
            Some(name) => NamingPolicy::fixed(name.clone()),
            None => NamingPolicy::Prefixed {
                prefix: self.prefix.clone(),
                random_suffix: self.random_suffix,
                suffix_length: self.suffix_length,
            },
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            random_suffix: true,
            suffix_length: default_suffix_length(),
            fixed_name: None,
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_suffix_length() -> usize {
    DEFAULT_SUFFIX_LENGTH
}

/// Interception section.
///
/// Selects the built-in global stages installed on every operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InterceptionConfig {
    /// Install the timing stage.
    #[serde(default = "default_true")]
    pub timing: bool,

    /// Install the logging stage.
    #[serde(default = "default_true")]
    pub logging: bool,
}

impl Default for InterceptionConfig {
    fn default() -> Self {
        Self {
            timing: true,
            logging: true,
        }
    }
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the Prometheus recorder.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Histogram buckets for invocation duration, in seconds.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: default_duration_buckets(),
        }
    }
}

fn default_duration_buckets() -> Vec<f64> {
    MetricsConfig::default().duration_buckets
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
    /// Single-line human-readable format.
    Compact,
}

impl From<LogFormat> for LogStyle {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info", "portico_runtime=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Service name for telemetry identification.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl TelemetrySection {
    /// Converts this section into the telemetry crate's configuration.
    #[must_use]
    pub fn to_telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig::builder()
            .service_name(&self.service_name)
            .environment(&self.environment)
            .metrics(MetricsConfig {
                enabled: self.metrics.enabled,
                duration_buckets: self.metrics.duration_buckets.clone(),
            })
            .logging(LogConfig {
                enabled: self.logging.enabled,
                filter: self.logging.level.clone(),
                style: self.logging.format.into(),
                include_location: self.logging.include_location,
            })
            .build()
    }
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            metrics: MetricsSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

fn default_service_name() -> String {
    "portico".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_true() -> bool {
    true
}
