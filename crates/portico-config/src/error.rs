//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`PorticoConfig`](crate::PorticoConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read configuration file {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax error or unknown section key.
    #[error("invalid TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON syntax error or unknown section key.
    #[error("invalid JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The file extension is neither `toml` nor `json`.
    #[error("unsupported configuration format '{format}' (expected toml or json)")]
    UnsupportedFormat {
        /// The extension or format name that was given.
        format: String,
    },

    /// A value failed validation.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending key, e.g. `naming.suffix_length`.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An override variable carries an unparseable value.
    #[error("cannot parse {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// What was expected.
        reason: String,
    },

    /// An override variable names no configuration key.
    #[error("{var} does not name a configuration key")]
    UnknownEnvKey {
        /// The environment variable name.
        var: String,
    },

    /// A `.env` file exists but is malformed.
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_env_key(var: impl Into<String>) -> Self {
        Self::UnknownEnvKey { var: var.into() }
    }

    /// Returns the dotted key path or variable name the error refers to.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { field, .. } => Some(field),
            Self::EnvParseError { var, .. } | Self::UnknownEnvKey { var } => Some(var),
            _ => None,
        }
    }
}
