//! Kufedit - Kingdom Under Fire: The Crusaders data file editing library.
//!
//! This crate provides a unified interface to the kufedit library ecosystem
//! for working with the game's data files.
//!
//! # Crates
//!
//! - [`kufedit_common`] - Common utilities (binary reading/writing, CP949
//!   transcoding, validation results)
//! - [`kufedit_sox`] - SOX record tables (troop stats, text, skill info)
//! - [`kufedit_stg`] - STG mission files (header, units, scripted tail)
//!
//! # Example
//!
//! ```no_run
//! use kufedit::prelude::*;
//!
//! let data = std::fs::read("EnglishD.sox")?;
//!
//! match detect(&data) {
//!     Some(DetectedFormat::SoxText(text)) => {
//!         println!("text entries: {}", text.entry_count());
//!     }
//!     Some(other) => println!("detected {}", other.name()),
//!     None => println!("unrecognized file"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod detect;

// Re-export all sub-crates
pub use kufedit_common as common;
pub use kufedit_sox as sox;
pub use kufedit_stg as stg;

pub use detect::{detect, DetectedFormat};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::detect::{detect, DetectedFormat};
    pub use kufedit_common::{BinaryReader, BinaryWriter, Severity, ValidationIssue};
    pub use kufedit_sox::{SoxBinary, SoxSkillInfo, SoxText};
    pub use kufedit_stg::{StgFile, StgUnit};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
