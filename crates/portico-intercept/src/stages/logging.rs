//! Logging interceptor.
//!
//! Emits structured `tracing` events when a call enters the chain and when it
//! completes or fails. Argument values are never logged, only their count.

use crate::interceptor::{Call, Interceptor};
use portico_core::PorticoResult;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// Interceptor that logs every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    /// Creates a logging interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn intercept(&self, call: Call<'_>) -> PorticoResult<Value> {
        let signature = call.signature();
        debug!(
            operation = signature.name(),
            signature = %signature,
            arguments = call.arguments().len(),
            "Invocation started"
        );

        let start = Instant::now();
        let result = call.proceed();
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(_) => debug!(
                operation = signature.name(),
                duration_ms,
                "Invocation completed"
            ),
            Err(error) => warn!(
                operation = signature.name(),
                duration_ms,
                error = %error,
                error_code = error.code(),
                "Invocation failed"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use portico_core::{PorticoError, Signature, TypeToken};
    use serde_json::json;

    #[test]
    fn test_logging_is_transparent() {
        let pipeline = Pipeline::builder().stage(LoggingInterceptor::new()).build();
        let sig = Signature::new("echo", vec![TypeToken::Any]);

        let ok = pipeline
            .execute(&sig, &[json!({"a": 1})], |_, args| Ok(args[0].clone()))
            .unwrap();
        assert_eq!(ok, json!({"a": 1}));

        let err = pipeline
            .execute(&sig, &[json!(null)], |_, _| {
                Err(PorticoError::argument_mismatch("echo", "nope"))
            })
            .unwrap_err();
        assert!(matches!(err, PorticoError::ArgumentMismatch { .. }));
    }

    #[test]
    fn test_name() {
        assert_eq!(LoggingInterceptor.name(), "logging");
    }
}
