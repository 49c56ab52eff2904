//! Error types for kufedit-common.

use thiserror::Error;

/// Common error type for kufedit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Invalid magic value encountered.
    #[error("invalid magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: u32, actual: u32 },

    /// Bytes left over after a structure that must consume its whole range.
    #[error("{count} trailing bytes after end of structure")]
    TrailingBytes { count: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
