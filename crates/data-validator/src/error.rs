//! Validation Error Types

use thiserror::Error;

/// Errors during payload validation
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Payload is not a well-formed measurement object
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Value outside the configured plausible range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    Implausible {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
