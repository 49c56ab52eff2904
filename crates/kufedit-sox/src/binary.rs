//! Binary SOX: the fixed-width troop stat table.
//!
//! Layout: 8-byte header, `count` fixed 148-byte records, then a 64-byte
//! footer that is preserved verbatim. Most stat fields are stored on disk as
//! int32 but are fractional quantities in the game engine, so they surface
//! as f32 here and are truncated back to int32 on save.

use kufedit_common::{BinaryReader, BinaryWriter, Severity, ValidationIssue};

use crate::{Error, Result, SOX_FOOTER_SIZE, SOX_HEADER_SIZE, SOX_MAGIC};

/// Size of one troop record on disk.
pub const TROOP_RECORD_SIZE: usize = 148;

/// One of the three level-up bonus slots in a troop record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUpSlot {
    pub skill_id: i32,
    pub bonus_per_level: f32,
}

/// A single troop stat record.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TroopInfo {
    pub job: i32,
    pub type_id: i32,
    pub move_speed: f32,
    pub rotate_rate: f32,
    pub move_acceleration: f32,
    pub move_deceleration: f32,
    pub sight_range: f32,
    pub attack_range_max: f32,
    pub attack_range_min: f32,
    pub attack_front_range: f32,
    pub direct_attack: f32,
    pub indirect_attack: f32,
    pub defense: f32,
    pub base_width: f32,
    pub resist_melee: f32,
    pub resist_ranged: f32,
    pub resist_frontal: f32,
    pub resist_explosion: f32,
    pub resist_fire: f32,
    pub resist_ice: f32,
    pub resist_lightning: f32,
    pub resist_holy: f32,
    pub resist_curse: f32,
    pub resist_poison: f32,
    pub max_unit_speed_multiplier: f32,
    pub default_unit_hp: f32,
    pub formation_random: i32,
    pub default_unit_num_x: i32,
    pub default_unit_num_y: i32,
    pub unit_hp_level_up: f32,
    pub level_up: [LevelUpSlot; 3],
    pub damage_distribution: f32,
}

impl TroopInfo {
    /// The ten resistance stats with their field names, in record order.
    fn resistances(&self) -> [(&'static str, f32); 10] {
        [
            ("resistMelee", self.resist_melee),
            ("resistRanged", self.resist_ranged),
            ("resistFrontal", self.resist_frontal),
            ("resistExplosion", self.resist_explosion),
            ("resistFire", self.resist_fire),
            ("resistIce", self.resist_ice),
            ("resistLightning", self.resist_lightning),
            ("resistHoly", self.resist_holy),
            ("resistCurse", self.resist_curse),
            ("resistPoison", self.resist_poison),
        ]
    }
}

/// The binary SOX troop table codec.
#[derive(Debug, Clone, Default)]
pub struct SoxBinary {
    magic: u32,
    troops: Vec<TroopInfo>,
    footer: Vec<u8>,
}

// The file stores these stats as integers, not IEEE floats.
fn read_int_as_float(reader: &mut BinaryReader) -> kufedit_common::Result<f32> {
    Ok(reader.read_i32()? as f32)
}

fn write_float_as_int(writer: &mut BinaryWriter, value: f32) {
    writer.write_i32(value as i32);
}

impl SoxBinary {
    /// Parse a binary SOX buffer.
    ///
    /// The buffer must be exactly `8 + 148 * count + 64` bytes; anything
    /// else is a structural rejection.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        reader.expect_magic(SOX_MAGIC).map_err(Error::Common)?;

        let count = reader.read_i32().map_err(Error::Common)?;
        if count < 0 {
            return Err(Error::InvalidCount(count));
        }

        let expected =
            SOX_HEADER_SIZE + count as usize * TROOP_RECORD_SIZE + SOX_FOOTER_SIZE;
        if data.len() != expected {
            return Err(Error::InvalidSize {
                expected,
                actual: data.len(),
            });
        }

        let mut troops = Vec::with_capacity(count as usize);
        for _ in 0..count {
            troops.push(Self::parse_record(&mut reader)?);
        }

        let footer = reader
            .read_bytes(SOX_FOOTER_SIZE)
            .map_err(Error::Common)?
            .to_vec();

        Ok(Self {
            magic: SOX_MAGIC,
            troops,
            footer,
        })
    }

    fn parse_record(reader: &mut BinaryReader) -> Result<TroopInfo> {
        let mut troop = TroopInfo {
            job: reader.read_i32()?,
            type_id: reader.read_i32()?,
            move_speed: read_int_as_float(reader)?,
            rotate_rate: read_int_as_float(reader)?,
            move_acceleration: read_int_as_float(reader)?,
            move_deceleration: read_int_as_float(reader)?,
            sight_range: read_int_as_float(reader)?,
            attack_range_max: read_int_as_float(reader)?,
            attack_range_min: read_int_as_float(reader)?,
            attack_front_range: read_int_as_float(reader)?,
            direct_attack: read_int_as_float(reader)?,
            indirect_attack: read_int_as_float(reader)?,
            defense: read_int_as_float(reader)?,
            base_width: read_int_as_float(reader)?,
            resist_melee: read_int_as_float(reader)?,
            resist_ranged: read_int_as_float(reader)?,
            resist_frontal: read_int_as_float(reader)?,
            resist_explosion: read_int_as_float(reader)?,
            resist_fire: read_int_as_float(reader)?,
            resist_ice: read_int_as_float(reader)?,
            resist_lightning: read_int_as_float(reader)?,
            resist_holy: read_int_as_float(reader)?,
            resist_curse: read_int_as_float(reader)?,
            resist_poison: read_int_as_float(reader)?,
            max_unit_speed_multiplier: read_int_as_float(reader)?,
            default_unit_hp: read_int_as_float(reader)?,
            formation_random: reader.read_i32()?,
            default_unit_num_x: reader.read_i32()?,
            default_unit_num_y: reader.read_i32()?,
            unit_hp_level_up: read_int_as_float(reader)?,
            ..TroopInfo::default()
        };

        for slot in &mut troop.level_up {
            slot.skill_id = reader.read_i32()?;
            slot.bonus_per_level = read_int_as_float(reader)?;
        }
        troop.damage_distribution = read_int_as_float(reader)?;

        Ok(troop)
    }

    /// Serialize the table back to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let size =
            SOX_HEADER_SIZE + self.troops.len() * TROOP_RECORD_SIZE + SOX_FOOTER_SIZE;
        let mut writer = BinaryWriter::with_capacity(size);

        writer.write_u32(self.magic);
        writer.write_i32(self.troops.len() as i32);

        for troop in &self.troops {
            writer.write_i32(troop.job);
            writer.write_i32(troop.type_id);
            write_float_as_int(&mut writer, troop.move_speed);
            write_float_as_int(&mut writer, troop.rotate_rate);
            write_float_as_int(&mut writer, troop.move_acceleration);
            write_float_as_int(&mut writer, troop.move_deceleration);
            write_float_as_int(&mut writer, troop.sight_range);
            write_float_as_int(&mut writer, troop.attack_range_max);
            write_float_as_int(&mut writer, troop.attack_range_min);
            write_float_as_int(&mut writer, troop.attack_front_range);
            write_float_as_int(&mut writer, troop.direct_attack);
            write_float_as_int(&mut writer, troop.indirect_attack);
            write_float_as_int(&mut writer, troop.defense);
            write_float_as_int(&mut writer, troop.base_width);
            write_float_as_int(&mut writer, troop.resist_melee);
            write_float_as_int(&mut writer, troop.resist_ranged);
            write_float_as_int(&mut writer, troop.resist_frontal);
            write_float_as_int(&mut writer, troop.resist_explosion);
            write_float_as_int(&mut writer, troop.resist_fire);
            write_float_as_int(&mut writer, troop.resist_ice);
            write_float_as_int(&mut writer, troop.resist_lightning);
            write_float_as_int(&mut writer, troop.resist_holy);
            write_float_as_int(&mut writer, troop.resist_curse);
            write_float_as_int(&mut writer, troop.resist_poison);
            write_float_as_int(&mut writer, troop.max_unit_speed_multiplier);
            write_float_as_int(&mut writer, troop.default_unit_hp);
            writer.write_i32(troop.formation_random);
            writer.write_i32(troop.default_unit_num_x);
            writer.write_i32(troop.default_unit_num_y);
            write_float_as_int(&mut writer, troop.unit_hp_level_up);
            for slot in &troop.level_up {
                writer.write_i32(slot.skill_id);
                write_float_as_int(&mut writer, slot.bonus_per_level);
            }
            write_float_as_int(&mut writer, troop.damage_distribution);
        }

        writer.write_bytes(&self.footer);
        writer.into_bytes()
    }

    /// Check every record against the troop stat plausibility rules.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (i, troop) in self.troops.iter().enumerate() {
            // Resistances: 0=immune, 100=normal, 250+=very vulnerable,
            // 1000000+=instant death. Only flag negative values or extremely
            // high non-instant-death values.
            for (field, value) in troop.resistances() {
                let v = value as i64;
                if v < 0 || (v > 500 && v < 1_000_000) {
                    issues.push(ValidationIssue::new(
                        Severity::Warning,
                        field,
                        "Resistance outside typical range",
                        i,
                    ));
                }
            }

            if troop.default_unit_hp <= 0.0 {
                issues.push(ValidationIssue::error(
                    "defaultUnitHp",
                    "HP must be positive",
                    i,
                ));
            }
        }

        issues
    }

    /// Header format marker (100 for all known files).
    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn record_count(&self) -> usize {
        self.troops.len()
    }

    pub fn troops(&self) -> &[TroopInfo] {
        &self.troops
    }

    pub fn troops_mut(&mut self) -> &mut Vec<TroopInfo> {
        &mut self.troops
    }

    /// The opaque 64-byte footer carried through unchanged.
    pub fn footer(&self) -> &[u8] {
        &self.footer
    }
}
