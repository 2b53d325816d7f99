//! Domain error types
//!
//! This module defines the error hierarchy for Warden. The detector and the
//! k-anonymity engine never fail on data-shape problems (they degrade to
//! reporting non-compliance), so the hard failures live here: invalid batches,
//! unusable key material, irrecoverable reversals and escalated quality gates.

use crate::domain::value::ValueKind;
use thiserror::Error;

/// Main Warden error type
///
/// This is the primary error type used throughout the application.
/// It wraps the component-specific error types.
#[derive(Debug, Error)]
pub enum WardenError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed tabular batch
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Key preparation, encryption or reversal failures
    #[error("Pseudonymization error: {0}")]
    Pseudonymization(#[from] PseudonymizationError),

    /// Escalated data-quality gate failures
    #[error("Quality gate error: {0}")]
    Quality(#[from] QualityError),

    /// Audit ledger failures
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Tabular batch errors
///
/// Raised only when a batch is constructed or combined. Operations on an
/// already valid batch report missing columns through their results instead.
#[derive(Debug, Error, PartialEq)]
pub enum BatchError {
    /// Column length differs from the batch row count
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Two columns share a name
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A value does not match its column's declared kind
    #[error("Column '{column}' is declared {expected} but row {row} holds {actual}")]
    KindMismatch {
        column: String,
        row: usize,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// A serialized value could not be decoded
    #[error("Column '{column}': cannot decode value at row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        reason: String,
    },

    /// Two batches do not share a schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// Pseudonymization errors
#[derive(Debug, Error, PartialEq)]
pub enum PseudonymizationError {
    /// The secret matches none of the accepted key forms
    #[error("Invalid pseudonymization key: {0}")]
    KeyFormat(String),

    /// The cipher rejected the input
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// The token is neither decryptable nor known to the pseudonym store
    #[error("Cannot depseudonymize value: {token}")]
    Reversal { token: String },
}

/// Data-quality gate errors
#[derive(Debug, Error)]
pub enum QualityError {
    /// Error-severity rules failed and escalation was requested
    #[error(
        "Data quality validation failed. Quality score: {:.2}%, Errors: {error_count}\n{}",
        .quality_score * 100.0,
        .failures.join("\n")
    )]
    ValidationFailed {
        quality_score: f64,
        error_count: usize,
        failures: Vec<String>,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for WardenError {
    fn from(err: std::io::Error) -> Self {
        WardenError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for WardenError {
    fn from(err: serde_json::Error) -> Self {
        WardenError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for WardenError {
    fn from(err: toml::de::Error) -> Self {
        WardenError::Configuration(format!("TOML parse error: {err}"))
    }
}
