//! Error types and handling
//!
//! Every error the analyzer can raise is fatal: the input is a static file and
//! the computation has no side effects before the final report write, so the
//! binary prints a one-line diagnostic and exits with status 1.

use crate::types::{ConfigError, ConfigValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during an analyzer run
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Wrong number or shape of command line arguments
    #[error("Usage error: {0}")]
    UsageError(String),

    /// Schedule file could not be read
    #[error("Failed to read schedule file '{}'", path.display())]
    InputIoError {
        /// Schedule file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Schedule file content is malformed
    #[error("Invalid schedule: {0}")]
    InputFormatError(String),

    /// Results file could not be created or written
    #[error("Failed to write results file '{}'", path.display())]
    OutputIoError {
        /// Results file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<ConfigError> for AnalyzerError {
    fn from(error: ConfigError) -> Self {
        AnalyzerError::ConfigurationError(error.to_string())
    }
}

impl From<ConfigValidationError> for AnalyzerError {
    fn from(error: ConfigValidationError) -> Self {
        AnalyzerError::ConfigurationError(error.to_string())
    }
}

impl AnalyzerError {
    /// Create a usage error
    pub fn usage_error(msg: impl Into<String>) -> Self {
        Self::UsageError(msg.into())
    }

    /// Create an input format error
    pub fn input_format_error(msg: impl Into<String>) -> Self {
        Self::InputFormatError(msg.into())
    }

    /// Create an input format error tied to a schedule line
    pub fn line_error(line: usize, msg: impl std::fmt::Display) -> Self {
        Self::InputFormatError(format!("line {}: {}", line, msg))
    }

    /// Create an input I/O error
    pub fn input_io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InputIoError {
            path: path.into(),
            source,
        }
    }

    /// Create an output I/O error
    pub fn output_io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputIoError {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            AnalyzerError::UsageError(_) => "Usage",
            AnalyzerError::InputIoError { .. } => "Input IO",
            AnalyzerError::InputFormatError(_) => "Input Format",
            AnalyzerError::OutputIoError { .. } => "Output IO",
            AnalyzerError::ConfigurationError(_) => "Configuration",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type for analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
