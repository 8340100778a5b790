//! Error types for mcquad.
//!
//! All fallible library operations return `Result<T, McError>` instead of
//! panicking. Numeric degeneracies (single-sample variance, empty inputs)
//! are surfaced as typed errors or defined values, never as silent NaN.

use thiserror::Error;

/// Result type alias for mcquad operations.
pub type McResult<T> = Result<T, McError>;

/// Unified error type for all mcquad operations.
#[derive(Debug, Error)]
pub enum McError {
    // ===== Input validation =====
    /// Sample count must be at least 1.
    #[error("Invalid sample count {got}: at least 1 sample is required")]
    InvalidSampleCount {
        /// The rejected sample count.
        got: usize,
    },

    /// Trial count must be at least 1.
    #[error("Invalid trial count {got}: at least 1 trial is required")]
    InvalidTrialCount {
        /// The rejected trial count.
        got: usize,
    },

    /// An evaluation sequence was empty where at least one element is needed.
    #[error("Empty evaluation sequence")]
    EmptyEvaluations,

    /// Confidence level must lie strictly between 0 and 1.
    #[error("Confidence level {0} outside the open interval (0, 1)")]
    InvalidConfidence(f64),

    /// Histogram bin count must be at least 1.
    #[error("Invalid histogram bin count {got}: at least 1 bin is required")]
    InvalidBinCount {
        /// The rejected bin count.
        got: usize,
    },

    // ===== Numeric degeneracy =====
    /// A non-finite value (NaN or Inf) was detected in numeric input.
    #[error("Non-finite value detected at {location}")]
    NonFiniteValue {
        /// Location where the non-finite value was detected.
        location: String,
    },

    // ===== Configuration =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O (series export) =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl McError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a non-finite-value error for the given location.
    #[must_use]
    pub fn non_finite(location: impl Into<String>) -> Self {
        Self::NonFiniteValue {
            location: location.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Check if this error is an input-validation failure (caller bug)
    /// as opposed to a parse, I/O, or numeric failure.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidSampleCount { .. }
                | Self::InvalidTrialCount { .. }
                | Self::EmptyEvaluations
                | Self::InvalidConfidence(_)
                | Self::InvalidBinCount { .. }
        )
    }
}
