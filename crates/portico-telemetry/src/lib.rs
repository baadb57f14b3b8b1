//! Structured logging and Prometheus metrics for Portico.
//!
//! This crate provides the observability layer shared by every Portico crate:
//!
//! - **Logging**: `tracing-subscriber` bootstrap with JSON or pretty output
//! - **Metrics**: invocation and realization metrics via the `metrics` facade,
//!   rendered in Prometheus text format
//!
//! Recording is always safe: without an installed recorder or subscriber the
//! facades discard everything.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `portico_invocations_total` | Counter | `operation`, `outcome` | Total invocations |
//! | `portico_invocation_duration_seconds` | Histogram | `operation` | Invocation latency |
//! | `portico_invocations_in_flight` | Gauge | - | Invocations currently running |
//! | `portico_realizations_total` | Counter | `kind`, `outcome` | Blueprint realizations |
//!
//! # Example
//!
//! ```rust,ignore
//! use portico_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("greeter")
//!     .environment("production")
//!     .log_filter("info,portico_runtime=debug")
//!     .build();
//!
//! init_telemetry(&config)?;
//! let exposition = portico_telemetry::metrics::render_metrics();
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogStyle};
pub use metrics::{init_metrics, InFlightGuard, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Validates `config`, then installs logging followed by metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if validation fails or either subsystem is
/// already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    config.validate()?;
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        metrics = config.metrics.enabled,
        "Telemetry initialized"
    );

    Ok(())
}
