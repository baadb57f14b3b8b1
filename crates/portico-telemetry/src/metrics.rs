//! Prometheus metrics for Portico.
//!
//! Metrics are recorded through the `metrics` facade, so they are no-ops until
//! a recorder is installed. [`init_metrics`] installs a Prometheus recorder
//! whose handle renders the text exposition format; serving it is left to the
//! embedding application.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `portico_invocations_total` | Counter | `operation`, `outcome` | Total operation invocations |
//! | `portico_invocation_duration_seconds` | Histogram | `operation` | Invocation latency |
//! | `portico_invocations_in_flight` | Gauge | - | Invocations currently running |
//! | `portico_realizations_total` | Counter | `kind`, `outcome` | Blueprint realizations |
//!
//! # Example
//!
//! ```rust
//! use portico_telemetry::metrics::{record_invocation, OUTCOME_SUCCESS};
//! use std::time::Duration;
//!
//! record_invocation("sayHello", OUTCOME_SUCCESS, Duration::from_millis(3));
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Total invocations counter.
pub const INVOCATIONS_TOTAL: &str = "portico_invocations_total";

/// Invocation duration histogram.
pub const INVOCATION_DURATION: &str = "portico_invocation_duration_seconds";

/// In-flight invocations gauge.
pub const INVOCATIONS_IN_FLIGHT: &str = "portico_invocations_in_flight";

/// Realizations counter.
pub const REALIZATIONS_TOTAL: &str = "portico_realizations_total";

/// Outcome label for a call or realization that succeeded.
pub const OUTCOME_SUCCESS: &str = "success";

/// Outcome label for a call or realization that failed.
pub const OUTCOME_ERROR: &str = "error";

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Histogram buckets for invocation duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // 100us .. 1s; synthesized calls are usually in-process
            duration_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Checks that the buckets are non-empty, positive and strictly
    /// increasing.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidBuckets` describing the first problem.
    pub fn validate(&self) -> TelemetryResult<()> {
        let buckets = &self.duration_buckets;
        if buckets.is_empty() {
            return Err(TelemetryError::InvalidBuckets(
                "at least one bucket is required".to_string(),
            ));
        }
        if let Some(bound) = buckets.iter().find(|b| !b.is_finite() || **b <= 0.0) {
            return Err(TelemetryError::InvalidBuckets(format!(
                "bucket {bound} is not a positive duration"
            )));
        }
        if let Some(pair) = buckets.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(TelemetryError::InvalidBuckets(format!(
                "bucket {} does not follow {}",
                pair[1], pair[0]
            )));
        }
        Ok(())
    }
}

/// Installs the global Prometheus recorder.
///
/// A disabled config installs nothing.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidBuckets` if the buckets are rejected and
/// `TelemetryError::RecorderInstalled` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = prometheus_builder(config)?
        .install_recorder()
        .map_err(|e| TelemetryError::RecorderInstalled(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Creates a Prometheus builder with the invocation duration buckets applied.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidBuckets` if the buckets are rejected.
pub fn prometheus_builder(config: &MetricsConfig) -> TelemetryResult<PrometheusBuilder> {
    config.validate()?;

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(INVOCATION_DURATION.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::InvalidBuckets(e.to_string()))
}

/// Returns the global metrics handle if initialized.
pub fn metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Renders metrics in Prometheus format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

/// Registers descriptions for all standard metrics.
pub fn register_metric_descriptions() {
    describe_counter!(INVOCATIONS_TOTAL, "Total number of operation invocations");
    describe_histogram!(
        INVOCATION_DURATION,
        metrics::Unit::Seconds,
        "Operation invocation duration in seconds"
    );
    describe_gauge!(
        INVOCATIONS_IN_FLIGHT,
        "Number of operation invocations currently running"
    );
    describe_counter!(REALIZATIONS_TOTAL, "Total number of blueprint realizations");
}

/// Records a completed invocation.
///
/// Updates `portico_invocations_total` and
/// `portico_invocation_duration_seconds`.
pub fn record_invocation(operation: &str, outcome: &'static str, duration: Duration) {
    counter!(
        INVOCATIONS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        INVOCATION_DURATION,
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a realization attempt.
///
/// `kind` is `type` or `instance`.
pub fn record_realization(kind: &'static str, outcome: &'static str) {
    counter!(
        REALIZATIONS_TOTAL,
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
}

/// Guard that tracks one in-flight invocation.
///
/// The gauge is decremented on drop, including on unwind.
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(INVOCATIONS_IN_FLIGHT).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(INVOCATIONS_IN_FLIGHT).decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_recorder() -> metrics_exporter_prometheus::PrometheusRecorder {
        prometheus_builder(&MetricsConfig::default())
            .unwrap()
            .build_recorder()
    }

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert!(!config.duration_buckets.is_empty());
    }

    #[test]
    fn test_empty_buckets_are_rejected() {
        let config = MetricsConfig {
            enabled: true,
            duration_buckets: Vec::new(),
        };
        assert!(matches!(
            prometheus_builder(&config),
            Err(TelemetryError::InvalidBuckets(_))
        ));
    }

    #[test]
    fn test_unordered_buckets_are_rejected() {
        let config = MetricsConfig {
            enabled: true,
            duration_buckets: vec![0.1, 0.01],
        };
        assert!(config.validate().is_err());

        let config = MetricsConfig {
            enabled: true,
            duration_buckets: vec![0.0, 0.01],
        };
        assert!(config.validate().is_err());
        assert!(MetricsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_disabled_metrics_skip_install() {
        let config = MetricsConfig {
            enabled: false,
            duration_buckets: Vec::new(),
        };
        assert!(init_metrics(&config).is_ok());
    }

    #[test]
    fn test_record_functions_dont_panic_without_recorder() {
        record_invocation("test", OUTCOME_SUCCESS, Duration::from_millis(10));
        record_realization("type", OUTCOME_ERROR);
        drop(InFlightGuard::new());
    }

    #[test]
    fn test_invocation_metrics_render() {
        let recorder = local_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            register_metric_descriptions();
            record_invocation("sayHello", OUTCOME_SUCCESS, Duration::from_millis(2));
            record_invocation("sayHello", OUTCOME_ERROR, Duration::from_millis(4));
            record_realization("instance", OUTCOME_SUCCESS);
        });

        let output = handle.render();
        assert!(output.contains(INVOCATIONS_TOTAL));
        assert!(output.contains("outcome=\"error\""));
        assert!(output.contains(INVOCATION_DURATION));
        assert!(output.contains("kind=\"instance\""));
    }

    #[test]
    fn test_in_flight_guard_balances() {
        let recorder = local_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let guard = InFlightGuard::new();
            drop(guard);
        });

        let output = handle.render();
        let line = output
            .lines()
            .find(|l| l.starts_with(INVOCATIONS_IN_FLIGHT))
            .unwrap();
        let value: f64 = line.rsplit(' ').next().unwrap().parse().unwrap();
        assert!(value.abs() < f64::EPSILON);
    }
}
