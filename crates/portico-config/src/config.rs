//! Main configuration types.
//!
//! This module provides the top-level [`PorticoConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, InterceptionConfig, LogFormat, NamingConfig, TelemetrySection};
use portico_core::naming::DEFAULT_SUFFIX_LENGTH;

/// Complete Portico configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use portico_config::PorticoConfig;
///
/// let config = PorticoConfig::default();
/// assert_eq!(config.naming.prefix, "portico.endpoint.");
/// assert!(config.interception.timing);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct PorticoConfig {
    /// Naming policy for synthesized types.
    #[serde(default)]
    pub naming: NamingConfig,

    /// Built-in interception stages.
    #[serde(default)]
    pub interception: InterceptionConfig,

    /// Telemetry configuration (metrics, logging).
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl PorticoConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> PorticoConfigBuilder {
        PorticoConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The random suffix is shorter than 8 characters
    /// - The fixed name or the prefix-less name would be blank
    /// - The service name or log level is blank
    /// - The log level is not a valid filter directive
    /// - Metrics are enabled and the buckets are empty, non-positive or unordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        let naming = &self.naming;
        if naming.random_suffix && naming.suffix_length < DEFAULT_SUFFIX_LENGTH {
            return Err(ConfigError::invalid_value(
                "naming.suffix_length",
                format!("must be at least {DEFAULT_SUFFIX_LENGTH}"),
            ));
        }
        if naming
            .fixed_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ConfigError::invalid_value(
                "naming.fixed_name",
                "must not be blank",
            ));
        }

        if self.telemetry.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.service_name",
                "must not be blank",
            ));
        }
        if self.telemetry.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                "must not be blank",
            ));
        }

        let telemetry = self.telemetry.to_telemetry_config();
        telemetry.logging.validate().map_err(|e| {
            ConfigError::invalid_value("telemetry.logging.level", e.to_string())
        })?;
        if telemetry.metrics.enabled {
            telemetry.metrics.validate().map_err(|e| {
                ConfigError::invalid_value("telemetry.metrics.duration_buckets", e.to_string())
            })?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty logs at debug level with source locations
    /// - Environment `development`
    ///
    /// # Example
    ///
    /// ```
    /// use portico_config::PorticoConfig;
    ///
    /// let config = PorticoConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;
        config.telemetry.environment = "development".to_string();

        config
    }

    /// Create a production configuration preset.
    ///
    /// - JSON logs at info level
    /// - Environment `production`
    ///
    /// # Example
    ///
    /// ```
    /// use portico_config::PorticoConfig;
    ///
    /// let config = PorticoConfig::production();
    /// assert_eq!(config.telemetry.logging.format, portico_config::LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.include_location = false;
        config.telemetry.environment = "production".to_string();

        config
    }
}

/// Builder for [`PorticoConfig`].
#[derive(Debug, Default)]
pub struct PorticoConfigBuilder {
    naming: Option<NamingConfig>,
    interception: Option<InterceptionConfig>,
    telemetry: Option<TelemetrySection>,
}

impl PorticoConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the naming configuration.
    #[must_use]
    pub fn naming(mut self, naming: NamingConfig) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Set the interception configuration.
    #[must_use]
    pub fn interception(mut self, interception: InterceptionConfig) -> Self {
        self.interception = Some(interception);
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetrySection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> PorticoConfig {
        PorticoConfig {
            naming: self.naming.unwrap_or_default(),
            interception: self.interception.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<PorticoConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
