//! STG mission/scenario file codec for Kingdom Under Fire: The Crusaders.
//!
//! An STG file is a fixed 628-byte header, an array of fixed 544-byte unit
//! records, and a variable-length tail of four count-prefixed sections
//! (areas, variables, event blocks, footer). The tail is the fragile part:
//! if any section fails structural checks the whole tail degrades to an
//! opaque raw blob that round-trips byte-for-byte, while header and units
//! stay fully editable.
//!
//! Every fixed record keeps the raw byte window it was parsed from; named
//! fields are patched back into that shadow on save so reserved and unknown
//! bytes are never lost.
//!
//! # Example
//!
//! ```no_run
//! use kufedit_stg::StgFile;
//!
//! let data = std::fs::read("E1001.stg")?;
//! let mut stg = StgFile::parse(&data)?;
//!
//! stg.units_mut()[0].leader.level = 10;
//! std::fs::write("E1001.stg", stg.to_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod event;
mod file;
mod header;
mod job;
mod param;
mod slots;
mod tail;
mod unit;

pub use error::{Error, Result};
pub use event::{EventBlock, ScriptEntry, StgEvent};
pub use file::StgFile;
pub use header::StgHeader;
pub use job::{default_troop_info_index, faction_for_job, job_name, Faction, MAX_STANDARD_JOB};
pub use param::ParamValue;
pub use tail::{FooterEntry, StgArea, StgTail, StgVariable, TailData, AREA_ENTRY_SIZE};
pub use unit::{Direction, OfficerData, SkillSlot, StgUnit, Ucd};

/// Format marker in the first four bytes of every STG file. The original
/// tooling also surfaced this field as the mission id.
pub const STG_MAGIC: u32 = 1001;

/// Size of the fixed STG header.
pub const STG_HEADER_SIZE: usize = 628;

/// Size of one unit record.
pub const STG_UNIT_SIZE: usize = 544;
