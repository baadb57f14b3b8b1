//! Timing interceptor.
//!
//! Measures wall-clock time around [`Call::proceed`] and reports exactly one
//! [`TimingSample`] per call to a [`TimingSink`], whether the call succeeded
//! or failed.
//!
//! # Sinks
//!
//! - [`MetricsSink`] (default) - records `portico_invocations_total` and
//!   `portico_invocation_duration_seconds`
//! - [`MemorySink`] - keeps samples in memory for inspection
//!
//! # Example
//!
//! ```
//! use portico_intercept::stages::timing::{MemorySink, TimingInterceptor};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let timing = TimingInterceptor::with_sink(sink.clone());
//! assert!(sink.is_empty());
//! ```

use crate::interceptor::{Call, Interceptor};
use parking_lot::Mutex;
use portico_core::PorticoResult;
use portico_telemetry::metrics::{record_invocation, OUTCOME_ERROR, OUTCOME_SUCCESS};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a timed call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The call returned a value.
    Success,
    /// The call returned an error.
    Error,
}

impl Outcome {
    /// Returns the metric label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => OUTCOME_SUCCESS,
            Self::Error => OUTCOME_ERROR,
        }
    }

    fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Success
        } else {
            Self::Error
        }
    }
}

/// One measured call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingSample {
    /// Operation name.
    pub operation: String,
    /// Rendered signature, e.g. `sayHello(string)`.
    pub signature: String,
    /// Wall-clock time spent in the rest of the chain.
    pub elapsed: Duration,
    /// How the call ended.
    pub outcome: Outcome,
}

/// Receives timing samples.
pub trait TimingSink: Send + Sync + 'static {
    /// Records one sample.
    fn record(&self, sample: TimingSample);
}

/// Sink that records samples as `metrics` counters and histograms.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSink;

impl TimingSink for MetricsSink {
    fn record(&self, sample: TimingSample) {
        record_invocation(&sample.operation, sample.outcome.as_str(), sample.elapsed);
    }
}

/// Sink that keeps every sample in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Mutex<Vec<TimingSample>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded samples.
    #[must_use]
    pub fn samples(&self) -> Vec<TimingSample> {
        self.samples.lock().clone()
    }

    /// Removes and returns the recorded samples.
    pub fn take(&self) -> Vec<TimingSample> {
        std::mem::take(&mut *self.samples.lock())
    }

    /// Returns the number of recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }
}

impl TimingSink for MemorySink {
    fn record(&self, sample: TimingSample) {
        self.samples.lock().push(sample);
    }
}

/// Interceptor that times every call.
#[derive(Clone)]
pub struct TimingInterceptor {
    sink: Arc<dyn TimingSink>,
}

impl TimingInterceptor {
    /// Creates a timing interceptor reporting to [`MetricsSink`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(MetricsSink),
        }
    }

    /// Creates a timing interceptor reporting to the given sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn TimingSink>) -> Self {
        Self { sink }
    }
}

impl Default for TimingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimingInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimingInterceptor").finish_non_exhaustive()
    }
}

impl Interceptor for TimingInterceptor {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn intercept(&self, call: Call<'_>) -> PorticoResult<Value> {
        let operation = call.operation().to_string();
        let signature = call.signature().to_string();

        let start = Instant::now();
        let result = call.proceed();
        let elapsed = start.elapsed();

        self.sink.record(TimingSample {
            operation,
            signature,
            elapsed,
            outcome: Outcome::of(&result),
        });

        result
    }
}
