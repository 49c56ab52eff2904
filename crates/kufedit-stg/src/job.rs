//! Job type catalog and derived lookups.
//!
//! Job values 0..=42 come from the game's K2JobDef table; values above 42
//! are extended model ids reserved for hero characters.

/// Highest standard job value. Non-hero units above this are invalid.
pub const MAX_STANDARD_JOB: u8 = 42;

const JOB_NAMES: [&str; 43] = [
    "H_ARCHER",
    "H_LONGBOW_MAN",
    "H_INFANTRY",
    "H_SPEARMAN",
    "H_H_INFANTRY",
    "H_KNIGHT",
    "H_PALADIN",
    "H_CAVALRY",
    "H_H_CAVALRY",
    "H_STORM_RIDER",
    "H_SAPPER",
    "H_PYRO_TECHNICIAN",
    "H_BOMBER_WING",
    "H_MORTAR",
    "H_BALLISTA",
    "H_HARPOON",
    "H_CATAPULT",
    "H_BATTALOON",
    "DE_ARCHER",
    "DE_CAVALRY_ARCHER",
    "DE_FIGHTER",
    "DE_KNIGHT",
    "DE_LIGHT_CAVALRY",
    "DO_INFANTRY",
    "DO_RIDER",
    "DO_H_A_RIDERS",
    "DO_AXE_MAN",
    "DO_H_A_INFANTRY",
    "DO_SAPPER",
    "D_SCORPION",
    "D_SWAMP_MAMMOTH",
    "D_DIRIGIBLE",
    "D_BLACK_WYVERN",
    "DO_GHOUL",
    "D_BONE_DRAGON",
    "WALL",
    "SCOUT",
    "SELFDESTRUCTION",
    "ENCABLOSA_MONSTER",
    "ENCABLOSA_FLYING_MONSTER",
    "ENCABLOSA_RANGED",
    "ELF_WALL",
    "ENCABLOSA_LARGE",
];

/// Name of a standard job value, `None` for extended model ids.
pub fn job_name(job: u8) -> Option<&'static str> {
    JOB_NAMES.get(job as usize).copied()
}

/// Faction a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Faction {
    Human,
    DarkOrc,
    DarkElf,
    DarkSpecial,
    Encablossa,
    Undead,
    Ogre,
}

impl Faction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::DarkOrc => "Dark Orc",
            Self::DarkElf => "Dark Elf",
            Self::DarkSpecial => "Dark Special",
            Self::Encablossa => "Encablossa",
            Self::Undead => "Undead",
            Self::Ogre => "Ogre",
        }
    }
}

/// Map a job value to its faction.
///
/// Unlisted values, extended hero ids included, default to Human.
pub fn faction_for_job(job: u8) -> Faction {
    match job {
        23..=28 => Faction::DarkOrc,
        18..=22 | 41 => Faction::DarkElf,
        33 | 34 => Faction::DarkSpecial,
        38..=40 | 42 => Faction::Encablossa,
        9 | 12 | 17 => Faction::Undead,
        29..=32 => Faction::Ogre,
        _ => Faction::Human,
    }
}

/// Fallback TroopInfo record index for a formation type, used by the game
/// when a unit's troop_info_index is -1.
pub fn default_troop_info_index(formation_type: u32) -> i32 {
    match formation_type {
        1 => 0,
        2 => 3,
        3 => 7,
        4 => 9,
        5 => 16,
        6 => 26,
        7 => 12,
        8 => 35,
        9 => 13,
        10 => 19,
        11 => 10,
        12 => 37,
        13 => 18,
        14 => 6,
        15 => 29,
        0x20 => 17,
        0x21 => 14,
        0x23 => 30,
        0x24 => 40,
        0x25 => 41,
        0x26 => 42,
        0x27 => 42,
        _ => 2,
    }
}
