//! 544-byte unit records.
//!
//! Each record keeps its full raw byte window. Named fields live at fixed
//! offsets and are patched back into the window on save; everything between
//! them is carried through untouched.

use kufedit_common::{patch_f32, patch_i32, patch_u32, patch_u8};

use crate::slots::{decode_cp949_slot, patch_cp949_slot_if_changed};
use crate::STG_UNIT_SIZE;

/// Unit control disposition. Governs which AI the unit runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Ucd {
    Player = 0,
    Enemy = 1,
    Ally = 2,
    Neutral = 3,
}

impl Ucd {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Player),
            1 => Some(Self::Enemy),
            2 => Some(Self::Ally),
            3 => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Facing direction, counter-clockwise from East.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Direction {
    East = 0,
    NorthEast = 1,
    North = 2,
    NorthWest = 3,
    West = 4,
    SouthWest = 5,
    South = 6,
    SouthEast = 7,
}

impl Direction {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::East),
            1 => Some(Self::NorthEast),
            2 => Some(Self::North),
            3 => Some(Self::NorthWest),
            4 => Some(Self::West),
            5 => Some(Self::SouthWest),
            6 => Some(Self::South),
            7 => Some(Self::SouthEast),
            _ => None,
        }
    }
}

/// One skill slot: skill id and level packed into two bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkillSlot {
    pub id: u8,
    pub level: u8,
}

/// Leader or officer character block inside a unit record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OfficerData {
    pub job: u8,
    pub model_variant: u8,
    pub worldmap_id: u8,
    pub level: u8,
    pub skills: [SkillSlot; 4],
    /// 23 entries for the leader and officer 1, 19 for officer 2.
    pub abilities: Vec<i32>,
}

impl OfficerData {
    fn empty(ability_count: usize) -> Self {
        Self {
            job: 0,
            model_variant: 0,
            worldmap_id: 0xFF,
            level: 1,
            skills: [SkillSlot::default(); 4],
            abilities: vec![-1; ability_count],
        }
    }

    fn parse(raw: &[u8], offset: usize, ability_count: usize) -> Self {
        let mut skills = [SkillSlot::default(); 4];
        for (i, slot) in skills.iter_mut().enumerate() {
            slot.id = raw[offset + 4 + i * 2];
            slot.level = raw[offset + 5 + i * 2];
        }

        let abilities = (0..ability_count)
            .map(|i| read_i32_at(raw, offset + 12 + i * 4))
            .collect();

        Self {
            job: raw[offset],
            model_variant: raw[offset + 1],
            worldmap_id: raw[offset + 2],
            level: raw[offset + 3],
            skills,
            abilities,
        }
    }

    fn patch(&self, raw: &mut [u8], offset: usize) {
        patch_u8(raw, offset, self.job);
        patch_u8(raw, offset + 1, self.model_variant);
        patch_u8(raw, offset + 2, self.worldmap_id);
        patch_u8(raw, offset + 3, self.level);
        for (i, slot) in self.skills.iter().enumerate() {
            patch_u8(raw, offset + 4 + i * 2, slot.id);
            patch_u8(raw, offset + 5 + i * 2, slot.level);
        }
        for (i, ability) in self.abilities.iter().enumerate() {
            patch_i32(raw, offset + 12 + i * 4, *ability);
        }
    }
}

/// A mission unit: one leader plus up to two officers and a troop body.
///
/// `officer1` and `officer2` are always present in the record;
/// `officer_count` says how many are meaningful.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StgUnit {
    /// Display name, CP949 in the file.
    pub unit_name: String,
    pub unique_id: u32,
    /// Control disposition as stored; see [`StgUnit::disposition`].
    pub ucd: u8,
    pub is_hero: u8,
    pub is_enabled: u8,
    /// Negative means no override.
    pub leader_hp_override: f32,
    pub unit_hp_override: f32,
    pub position_x: f32,
    pub position_y: f32,
    /// Facing as stored; see [`StgUnit::facing`].
    pub direction: u8,

    pub leader: OfficerData,
    pub officer_count: u32,
    pub officer1: OfficerData,
    pub officer2: OfficerData,

    pub grid_unk: u32,
    pub grid_x: u32,
    pub grid_y: u32,
    /// -1 selects the formation-type fallback, see
    /// [`default_troop_info_index`](crate::default_troop_info_index).
    pub troop_info_index: i32,
    pub formation_type: u32,
    pub stat_overrides: [f32; 22],

    #[cfg_attr(feature = "serde", serde(skip))]
    raw: Vec<u8>,
}

impl Default for StgUnit {
    fn default() -> Self {
        Self {
            unit_name: String::new(),
            unique_id: 0,
            ucd: Ucd::Enemy as u8,
            is_hero: 0,
            is_enabled: 1,
            leader_hp_override: -1.0,
            unit_hp_override: -1.0,
            position_x: 0.0,
            position_y: 0.0,
            direction: Direction::East as u8,
            leader: OfficerData::empty(23),
            officer_count: 0,
            officer1: OfficerData::empty(23),
            officer2: OfficerData::empty(19),
            grid_unk: 1,
            grid_x: 1,
            grid_y: 1,
            troop_info_index: -1,
            formation_type: 0,
            stat_overrides: [-1.0; 22],
            raw: vec![0; STG_UNIT_SIZE],
        }
    }
}

impl StgUnit {
    /// Parse a unit from its 544-byte window.
    pub(crate) fn parse(window: &[u8]) -> Self {
        debug_assert_eq!(window.len(), STG_UNIT_SIZE);
        let raw = window.to_vec();

        let mut stat_overrides = [0.0f32; 22];
        for (i, stat) in stat_overrides.iter_mut().enumerate() {
            *stat = read_f32_at(window, 0x1C8 + i * 4);
        }

        Self {
            unit_name: decode_cp949_slot(window, 0x00, 32),
            unique_id: read_u32_at(window, 0x20),
            ucd: window[0x24],
            is_hero: window[0x25],
            is_enabled: window[0x26],
            leader_hp_override: read_f32_at(window, 0x28),
            unit_hp_override: read_f32_at(window, 0x2C),
            position_x: read_f32_at(window, 0x44),
            position_y: read_f32_at(window, 0x48),
            direction: window[0x4C],
            leader: OfficerData::parse(window, 0x54, 23),
            officer_count: read_u32_at(window, 0xBC),
            officer1: OfficerData::parse(window, 0xC0, 23),
            officer2: OfficerData::parse(window, 0x128, 19),
            grid_unk: read_u32_at(window, 0x190),
            grid_x: read_u32_at(window, 0x194),
            grid_y: read_u32_at(window, 0x198),
            troop_info_index: read_i32_at(window, 0x1C0),
            formation_type: read_u32_at(window, 0x1C4),
            stat_overrides,
            raw,
        }
    }

    /// Serialize by patching the named fields into a copy of the raw window.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut raw = self.raw.clone();

        patch_cp949_slot_if_changed(&mut raw, 0x00, 32, &self.unit_name);
        patch_u32(&mut raw, 0x20, self.unique_id);
        patch_u8(&mut raw, 0x24, self.ucd);
        patch_u8(&mut raw, 0x25, self.is_hero);
        patch_u8(&mut raw, 0x26, self.is_enabled);
        patch_f32(&mut raw, 0x28, self.leader_hp_override);
        patch_f32(&mut raw, 0x2C, self.unit_hp_override);
        patch_f32(&mut raw, 0x44, self.position_x);
        patch_f32(&mut raw, 0x48, self.position_y);
        patch_u8(&mut raw, 0x4C, self.direction);

        self.leader.patch(&mut raw, 0x54);
        patch_u32(&mut raw, 0xBC, self.officer_count);
        self.officer1.patch(&mut raw, 0xC0);
        self.officer2.patch(&mut raw, 0x128);

        patch_u32(&mut raw, 0x190, self.grid_unk);
        patch_u32(&mut raw, 0x194, self.grid_x);
        patch_u32(&mut raw, 0x198, self.grid_y);
        patch_i32(&mut raw, 0x1C0, self.troop_info_index);
        patch_u32(&mut raw, 0x1C4, self.formation_type);
        for (i, stat) in self.stat_overrides.iter().enumerate() {
            patch_f32(&mut raw, 0x1C8 + i * 4, *stat);
        }

        raw
    }

    /// The control disposition, `None` for out-of-range values.
    pub fn disposition(&self) -> Option<Ucd> {
        Ucd::from_u8(self.ucd)
    }

    /// The facing direction, `None` for out-of-range values.
    pub fn facing(&self) -> Option<Direction> {
        Direction::from_u8(self.direction)
    }

    /// TroopInfo index after the formation-type fallback is applied.
    pub fn effective_troop_info_index(&self) -> i32 {
        if self.troop_info_index >= 0 {
            self.troop_info_index
        } else {
            crate::default_troop_info_index(self.formation_type)
        }
    }
}

#[inline]
fn read_u32_at(raw: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(raw[offset..offset + 4].try_into().unwrap())
}

#[inline]
fn read_i32_at(raw: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(raw[offset..offset + 4].try_into().unwrap())
}

#[inline]
fn read_f32_at(raw: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(raw[offset..offset + 4].try_into().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_window() -> Vec<u8> {
        let mut w = vec![0u8; STG_UNIT_SIZE];
        w[..8].copy_from_slice(b"TestUnit");
        w[0x20..0x24].copy_from_slice(&42u32.to_le_bytes());
        w[0x24] = 1; // Enemy
        w[0x26] = 1;
        w[0x44..0x48].copy_from_slice(&5000.0f32.to_le_bytes());
        w[0x48..0x4C].copy_from_slice(&3000.0f32.to_le_bytes());
        w[0x4C] = 6; // South
        w[0x54] = 5; // H_KNIGHT
        w[0x56] = 0xFF;
        w[0x57] = 7;
        w[0x1C0..0x1C4].copy_from_slice(&(-1i32).to_le_bytes());
        w[0x1C4..0x1C8].copy_from_slice(&5u32.to_le_bytes());
        w
    }

    #[test]
    fn test_parse_fields() {
        let unit = StgUnit::parse(&sample_window());

        assert_eq!(unit.unit_name, "TestUnit");
        assert_eq!(unit.unique_id, 42);
        assert_eq!(unit.disposition(), Some(Ucd::Enemy));
        assert_eq!(unit.facing(), Some(Direction::South));
        assert_eq!(unit.position_x, 5000.0);
        assert_eq!(unit.position_y, 3000.0);
        assert_eq!(unit.leader.job, 5);
        assert_eq!(unit.leader.worldmap_id, 0xFF);
        assert_eq!(unit.leader.level, 7);
    }

    #[test]
    fn test_round_trip_identity() {
        let window = sample_window();
        let unit = StgUnit::parse(&window);
        assert_eq!(unit.to_bytes(), window);
    }

    #[test]
    fn test_modified_field_round_trip() {
        let window = sample_window();
        let mut unit = StgUnit::parse(&window);
        unit.leader.level = 10;

        let saved = unit.to_bytes();
        assert_eq!(saved[0x57], 10);

        // Only that byte differs.
        let mut expected = window;
        expected[0x57] = 10;
        assert_eq!(saved, expected);
    }

    #[test]
    fn test_unknown_bytes_survive() {
        let mut window = sample_window();
        window[0x30] = 0xAB; // between the HP overrides and the position
        window[0x50] = 0xCD; // between the direction and the leader block

        let unit = StgUnit::parse(&window);
        assert_eq!(unit.to_bytes(), window);
    }

    #[test]
    fn test_effective_troop_info_index() {
        let unit = StgUnit::parse(&sample_window());
        assert_eq!(unit.troop_info_index, -1);
        assert_eq!(unit.effective_troop_info_index(), 16); // formation 5

        let mut unit2 = unit.clone();
        unit2.troop_info_index = 8;
        assert_eq!(unit2.effective_troop_info_index(), 8);
    }

    #[test]
    fn test_officer_ability_counts() {
        let unit = StgUnit::parse(&sample_window());
        assert_eq!(unit.leader.abilities.len(), 23);
        assert_eq!(unit.officer1.abilities.len(), 23);
        assert_eq!(unit.officer2.abilities.len(), 19);
    }
}
