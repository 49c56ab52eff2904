//! Error types for SOX parsing.

use thiserror::Error;

/// Errors that can occur when working with SOX files.
///
/// Any of these from `parse` means "not this format" to the auto-detector;
/// no partial model survives a failed parse.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] kufedit_common::Error),

    /// Buffer size does not match the size implied by the header.
    #[error("invalid SOX file size: expected {expected} bytes, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    /// Record count that cannot describe valid data.
    #[error("invalid record count: {0}")]
    InvalidCount(i32),

    /// A text entry index that repeats or precedes an earlier entry.
    #[error("entry index {0} is not strictly increasing")]
    OutOfOrderIndex(u32),

    /// A text entry declared a zero length.
    #[error("entry {0} has zero-length text")]
    ZeroLengthEntry(usize),

    /// A text entry contained a byte outside the accepted character set.
    #[error("entry {0} contains a disallowed byte")]
    DisallowedText(usize),

    /// The file parsed to an empty table.
    #[error("no entries decoded")]
    EmptyTable,

    /// Records did not end exactly at the footer boundary.
    #[error("record framing mismatch: cursor at {cursor}, footer starts at {footer_start}")]
    FramingMismatch { cursor: usize, footer_start: usize },
}

/// Result type for SOX operations.
pub type Result<T> = std::result::Result<T, Error>;
