//! Common utilities for kufedit.
//!
//! This crate provides foundational types used across all kufedit crates:
//!
//! - [`BinaryReader`] - Cursor-based little-endian reading from byte slices
//! - [`BinaryWriter`] - Growable output buffer with fixed-slot helpers
//! - [`ValidationIssue`] / [`Severity`] - Structured validation results
//! - [`encoding`] - CP949 (EUC-KR) game text transcoding

mod error;
mod reader;
mod validation;
mod writer;

pub mod encoding;

pub use error::{Error, Result};
pub use reader::{null_terminated, BinaryReader};
pub use validation::{Severity, ValidationIssue};
pub use writer::{
    patch_f32, patch_fixed_str, patch_i32, patch_u32, patch_u8, BinaryWriter,
};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
