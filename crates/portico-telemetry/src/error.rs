//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing the logging subscriber or metrics recorder.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    SubscriberInstalled(String),

    /// Duration buckets are empty or rejected by the exporter.
    #[error("Invalid duration buckets: {0}")]
    InvalidBuckets(String),

    /// A global metrics recorder is already installed.
    #[error("Metrics already initialized: {0}")]
    RecorderInstalled(String),
}

impl TelemetryError {
    /// Returns true if the failure is a second installation attempt.
    ///
    /// Embedders that initialize telemetry from several entry points may
    /// treat these as benign.
    #[must_use]
    pub const fn is_already_installed(&self) -> bool {
        matches!(
            self,
            Self::SubscriberInstalled(_) | Self::RecorderInstalled(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_display() {
        let err = TelemetryError::InvalidFilter {
            directive: "portico=loud".to_string(),
            reason: "invalid level".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid log filter 'portico=loud': invalid level"
        );
    }

    #[test]
    fn test_already_installed() {
        assert!(TelemetryError::RecorderInstalled("set".to_string()).is_already_installed());
        assert!(TelemetryError::SubscriberInstalled("set".to_string()).is_already_installed());
        assert!(!TelemetryError::InvalidBuckets("empty".to_string()).is_already_installed());
    }
}
