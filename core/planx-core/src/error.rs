//! Error types for the planx rewrite stage.
//!
//! All public APIs return `PlanxResult<T>`: no panics in library code.

use crate::expressions::ExpressionGroup;
use thiserror::Error;

/// Unified error type for all planx operations.
#[derive(Debug, Error)]
pub enum PlanxError {
    /// The allocation arena refused a request
    #[error("out of memory: requested {requested} bytes, {used} of {limit} bytes in use")]
    OutOfMemory {
        requested: usize,
        used: usize,
        limit: usize,
    },

    /// Checked downcast between expression groups failed
    #[error("expression group mismatch: expected {expected}, got {actual}")]
    ExpressionGroupMismatch {
        expected: ExpressionGroup,
        actual: ExpressionGroup,
    },

    /// Expression tree violates a structural invariant
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// SQL parsing error
    #[error("SQL parse error: {message}\nSQL: {sql}")]
    SqlParse { message: String, sql: String },

    /// Unsupported SQL feature
    #[error("SQL feature not supported: {feature}\nHint: {hint}")]
    SqlNotSupported { feature: String, hint: String },

    /// Configuration value could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for all planx operations.
pub type PlanxResult<T> = Result<T, PlanxError>;

impl From<serde_json::Error> for PlanxError {
    fn from(err: serde_json::Error) -> Self {
        PlanxError::InvalidConfig(err.to_string())
    }
}
