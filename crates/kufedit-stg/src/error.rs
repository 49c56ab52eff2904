//! Error types for kufedit-stg.

use thiserror::Error;

/// STG-specific error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the common layer.
    #[error(transparent)]
    Common(#[from] kufedit_common::Error),

    /// Buffer too small for the fixed header plus the declared unit array.
    #[error("buffer too small: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// A section count prefix that cannot describe valid data.
    #[error("invalid section count: {0}")]
    InvalidCount(i32),

    /// Unknown type tag in a typed parameter value.
    #[error("unknown parameter type tag: {0}")]
    UnknownParamType(u32),
}

/// Result type alias using the STG Error type.
pub type Result<T> = std::result::Result<T, Error>;
