//! Error types for Portico.
//!
//! This module provides the [`PorticoError`] type, which is the standard error
//! type used by the builder, the realizer and every synthesized operation.
//!
//! # Categories
//!
//! | `ErrorCategory` | Variants | Raised by |
//! |---|---|---|
//! | `Descriptor` | `InvalidDescriptor`, `DuplicateField`, `DuplicateOperationSignature` | builder mutations |
//! | `Lifecycle` | `AlreadyRealized` | builder after a terminal step |
//! | `Realization` | `Realization`, `HandlerBinding` | realizer |
//! | `Invocation` | `ArgumentMismatch`, `Invocation` | synthesized operations |
//!
//! Builder errors are raised at the call that violates the invariant. There is
//! no batching of validation errors and no retry logic anywhere in Portico.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`PorticoError`].
pub type PorticoResult<T> = Result<T, PorticoError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed or conflicting descriptors handed to the builder.
    Descriptor,
    /// Builder reused after it was consumed.
    Lifecycle,
    /// The backing type system rejected the synthesis.
    Realization,
    /// Errors raised while invoking a synthesized operation.
    Invocation,
}

impl ErrorCategory {
    /// Returns the category name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Descriptor => "descriptor",
            Self::Lifecycle => "lifecycle",
            Self::Realization => "realization",
            Self::Invocation => "invocation",
        }
    }
}

/// Standard error type for Portico.
///
/// # Example
///
/// ```
/// use portico_core::{ErrorCategory, PorticoError};
///
/// fn check_uid(uid: &str) -> Result<(), PorticoError> {
///     if uid.trim().is_empty() {
///         return Err(PorticoError::invalid_descriptor("binding uid must not be blank"));
///     }
///     Ok(())
/// }
///
/// let err = check_uid(" ").unwrap_err();
/// assert_eq!(err.category(), ErrorCategory::Descriptor);
/// ```
#[derive(Error, Debug)]
pub enum PorticoError {
    /// A descriptor is malformed (e.g., blank required uid).
    #[error("Invalid descriptor: {message}")]
    InvalidDescriptor {
        /// Human-readable error message.
        message: String,
    },

    /// A field with the same name was already declared.
    #[error("Duplicate field: '{name}' is already declared")]
    DuplicateField {
        /// The conflicting field name.
        name: String,
    },

    /// An operation with the same name and parameter types was already declared.
    #[error("Duplicate operation signature: {signature}")]
    DuplicateOperationSignature {
        /// The conflicting signature, rendered as `name(type, ...)`.
        signature: String,
    },

    /// The backing type system rejected the synthesized type.
    #[error("Realization of '{qualified_name}' failed: {reason}")]
    Realization {
        /// The qualified name drawn for the type.
        qualified_name: String,
        /// Why the type could not be realized.
        reason: String,
    },

    /// An instance could not be constructed around the call handler.
    #[error("Handler binding failed: {message}")]
    HandlerBinding {
        /// Human-readable error message.
        message: String,
    },

    /// Arguments do not match any declared signature of the operation.
    #[error("Argument mismatch for '{operation}': {message}")]
    ArgumentMismatch {
        /// The operation that was called.
        operation: String,
        /// Human-readable error message.
        message: String,
    },

    /// The builder was used after a terminal realization call.
    #[error("Contract builder was already realized")]
    AlreadyRealized,

    /// Error raised by the call handler or an interceptor.
    #[error("Invocation of '{operation}' failed: {message}")]
    Invocation {
        /// The operation that was called.
        operation: String,
        /// Human-readable error message.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl PorticoError {
    /// Creates an invalid descriptor error.
    #[must_use]
    pub fn invalid_descriptor(message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            message: message.into(),
        }
    }

    /// Creates a duplicate field error.
    #[must_use]
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateField { name: name.into() }
    }

    /// Creates a duplicate operation signature error.
    #[must_use]
    pub fn duplicate_signature(signature: impl ToString) -> Self {
        Self::DuplicateOperationSignature {
            signature: signature.to_string(),
        }
    }

    /// Creates a realization error.
    #[must_use]
    pub fn realization(qualified_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Realization {
            qualified_name: qualified_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a handler binding error.
    #[must_use]
    pub fn handler_binding(message: impl Into<String>) -> Self {
        Self::HandlerBinding {
            message: message.into(),
        }
    }

    /// Creates an argument mismatch error.
    #[must_use]
    pub fn argument_mismatch(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArgumentMismatch {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates an invocation error.
    #[must_use]
    pub fn invocation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invocation error with a source error.
    pub fn invocation_with_source(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Invocation {
            operation: operation.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDescriptor { .. }
            | Self::DuplicateField { .. }
            | Self::DuplicateOperationSignature { .. } => ErrorCategory::Descriptor,
            Self::AlreadyRealized => ErrorCategory::Lifecycle,
            Self::Realization { .. } | Self::HandlerBinding { .. } => ErrorCategory::Realization,
            Self::ArgumentMismatch { .. } | Self::Invocation { .. } => ErrorCategory::Invocation,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidDescriptor { .. } => "INVALID_DESCRIPTOR",
            Self::DuplicateField { .. } => "DUPLICATE_FIELD",
            Self::DuplicateOperationSignature { .. } => "DUPLICATE_OPERATION_SIGNATURE",
            Self::Realization { .. } => "REALIZATION_ERROR",
            Self::HandlerBinding { .. } => "HANDLER_BINDING_ERROR",
            Self::ArgumentMismatch { .. } => "ARGUMENT_MISMATCH",
            Self::AlreadyRealized => "ALREADY_REALIZED",
            Self::Invocation { .. } => "INVOCATION_ERROR",
        }
    }
}
