//! Typed configuration system for Portico.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`PorticoConfig`] contains three sections:
//!
//! - [`NamingConfig`] - Qualified names of synthesized types
//! - [`InterceptionConfig`] - Built-in global interception stages
//! - [`TelemetrySection`] - Metrics and logging
//!
//! # Example
//!
//! ```no_run
//! use portico_config::ConfigLoader;
//!
//! # fn main() -> Result<(), portico_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_dotenv()?
//!     .with_optional_file("portico.toml")?
//!     .with_env_prefix("PORTICO")
//!     .load()?;
//!
//! let policy = config.naming.policy();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [naming]
//! prefix = "com.acme.endpoint."
//! random_suffix = true
//! suffix_length = 8
//!
//! [interception]
//! timing = true
//! logging = true
//!
//! [telemetry]
//! service_name = "greeter"
//! environment = "production"
//!
//! [telemetry.metrics]
//! enabled = true
//! duration_buckets = [0.001, 0.01, 0.1, 1.0]
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every key can be overridden as `PREFIX__SECTION__KEY`:
//!
//! - `PORTICO__NAMING__FIXED_NAME=com.acme.Greeter`
//! - `PORTICO__INTERCEPTION__LOGGING=false`
//! - `PORTICO__TELEMETRY__METRICS__DURATION_BUCKETS=0.001,0.01,0.1`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{PorticoConfig, PorticoConfigBuilder};
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    InterceptionConfig, LogFormat, LoggingSection, MetricsSection, NamingConfig, TelemetrySection,
};
