//! SOX record table codecs for Kingdom Under Fire: The Crusaders.
//!
//! SOX files are record tables sharing a common 8-byte header: a u32 format
//! marker equal to [`SOX_MAGIC`] followed by a u32 record count. Three
//! layouts exist:
//!
//! - [`SoxBinary`] - fixed 148-byte troop stat records + opaque footer
//! - [`SoxText`] - indexed variable-length text entries
//! - [`SoxSkillInfo`] - variable-length skill records with length-prefixed
//!   strings + opaque footer
//!
//! Each codec follows the same contract: `parse(&[u8]) -> Result<Self>`
//! rejects structurally invalid input with no partial model, `to_bytes()`
//! reserializes the current model, and `validate()` reports semantic issues
//! without ever blocking a save.
//!
//! Historical SOX distributions were ASCII-hex wrapped; [`hex`] provides the
//! defensive decode path for those.

mod binary;
mod error;
mod skill_info;
mod text;

pub mod hex;

pub use binary::{LevelUpSlot, SoxBinary, TroopInfo, TROOP_RECORD_SIZE};
pub use error::{Error, Result};
pub use skill_info::{SkillInfo, SoxSkillInfo};
pub use text::{SoxText, TextEntry};

/// Format marker in the first four bytes of every SOX variant.
pub const SOX_MAGIC: u32 = 100;

/// Size of the shared SOX header (magic + record count).
pub const SOX_HEADER_SIZE: usize = 8;

/// Size of the opaque footer carried by SoxBinary and SoxSkillInfo.
pub const SOX_FOOTER_SIZE: usize = 64;
