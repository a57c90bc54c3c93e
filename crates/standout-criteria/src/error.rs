//! Error types for the criteria crate.

use thiserror::Error;

/// Errors that can occur when compiling criteria, executing plans or
/// materializing collections.
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// A collection was constructed from a value that is neither a tabular
    /// data source nor a result set.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Operator is unknown or cannot apply to its operand.
    #[error("unsupported operation '{op}' on {operand} operand")]
    UnsupportedOperation { op: String, operand: &'static str },

    /// Two field values of incompatible types met in an ordering comparison.
    #[error("cannot order field '{field}': {left} is not comparable with {right}")]
    IncomparableValues {
        field: String,
        left: &'static str,
        right: &'static str,
    },

    /// Limit sentinel below -1.
    #[error("invalid limit {0}: expected -1 (unbounded) or a non-negative count")]
    InvalidLimit(i64),

    /// The collection source was consumed by an initialization that failed.
    #[error("collection source was consumed by a failed initialization")]
    SourceConsumed,

    /// Error reading a CSV source.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Error opening a CSV source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CriteriaError {
    pub(crate) fn unsupported(op: impl ToString, operand: &'static str) -> Self {
        CriteriaError::UnsupportedOperation {
            op: op.to_string(),
            operand,
        }
    }
}

/// Result type for criteria operations.
pub type Result<T> = std::result::Result<T, CriteriaError>;
