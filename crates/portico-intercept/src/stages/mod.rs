//! Built-in interceptor stages.
//!
//! - [`timing`] - Measure every call and report to a sink
//! - [`logging`] - Structured events on entry, completion and failure

pub mod logging;
pub mod timing;

pub use logging::LoggingInterceptor;
pub use timing::{MemorySink, MetricsSink, Outcome, TimingInterceptor, TimingSample, TimingSink};
