//! SkillInfo SOX: variable-length skill records.
//!
//! Layout: 8-byte header, `count` records of `{i32 id, u16-len loc_key,
//! u16-len icon_path, u32 slot_count, u32 max_level}`, then a 64-byte
//! opaque footer. Framing is strict: after consuming exactly `count`
//! records the cursor must land on the footer boundary, otherwise the whole
//! load is rejected.

use kufedit_common::{BinaryReader, BinaryWriter, ValidationIssue};

use crate::{Error, Result, SOX_FOOTER_SIZE, SOX_HEADER_SIZE, SOX_MAGIC};

/// A single skill record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInfo {
    pub id: i32,
    /// Localization key, e.g. `@(S_Melee)`.
    pub loc_key: String,
    /// Icon texture path, e.g. `IL_SKL_Melee.tga`.
    pub icon_path: String,
    pub slot_count: u32,
    pub max_level: u32,
}

/// The SkillInfo table codec.
#[derive(Debug, Clone, Default)]
pub struct SoxSkillInfo {
    skills: Vec<SkillInfo>,
    footer: Vec<u8>,
}

impl SoxSkillInfo {
    /// Parse a SkillInfo buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < SOX_HEADER_SIZE + SOX_FOOTER_SIZE {
            return Err(Error::InvalidSize {
                expected: SOX_HEADER_SIZE + SOX_FOOTER_SIZE,
                actual: data.len(),
            });
        }

        let footer_start = data.len() - SOX_FOOTER_SIZE;
        let mut reader = BinaryReader::new(&data[..footer_start]);
        reader.expect_magic(SOX_MAGIC).map_err(Error::Common)?;

        let count = reader.read_i32().map_err(Error::Common)?;
        if count <= 0 {
            return Err(Error::InvalidCount(count));
        }

        let mut skills = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = reader.read_i32()?;

            let loc_len = reader.read_u16()? as usize;
            let loc_key = String::from_utf8_lossy(reader.read_bytes(loc_len)?).into_owned();

            let icon_len = reader.read_u16()? as usize;
            let icon_path = String::from_utf8_lossy(reader.read_bytes(icon_len)?).into_owned();

            let slot_count = reader.read_u32()?;
            let max_level = reader.read_u32()?;

            skills.push(SkillInfo {
                id,
                loc_key,
                icon_path,
                slot_count,
                max_level,
            });
        }

        // Strict framing: records must end exactly at the footer.
        if !reader.is_empty() {
            return Err(Error::FramingMismatch {
                cursor: reader.position(),
                footer_start,
            });
        }

        let footer = data[footer_start..].to_vec();

        Ok(Self { skills, footer })
    }

    /// Serialize the table back to bytes, recomputing the total size from
    /// the current string lengths.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body: usize = self
            .skills
            .iter()
            .map(|s| 4 + 2 + s.loc_key.len() + 2 + s.icon_path.len() + 4 + 4)
            .sum();

        let mut writer =
            BinaryWriter::with_capacity(SOX_HEADER_SIZE + body + SOX_FOOTER_SIZE);
        writer.write_u32(SOX_MAGIC);
        writer.write_i32(self.skills.len() as i32);

        for skill in &self.skills {
            writer.write_i32(skill.id);
            writer.write_u16(skill.loc_key.len() as u16);
            writer.write_bytes(skill.loc_key.as_bytes());
            writer.write_u16(skill.icon_path.len() as u16);
            writer.write_bytes(skill.icon_path.as_bytes());
            writer.write_u32(skill.slot_count);
            writer.write_u32(skill.max_level);
        }

        writer.write_bytes(&self.footer);
        writer.into_bytes()
    }

    /// Check skill records against the known value ranges.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (i, skill) in self.skills.iter().enumerate() {
            if !(1..=4).contains(&skill.slot_count) {
                issues.push(ValidationIssue::warning(
                    "slotCount",
                    "Slot count outside typical range (1-4)",
                    i,
                ));
            }

            if skill.max_level == 0 || skill.max_level > 65_535 {
                issues.push(ValidationIssue::warning(
                    "maxLevel",
                    "Max level is 0 or exceeds 65535",
                    i,
                ));
            }

            if skill.loc_key.is_empty() {
                issues.push(ValidationIssue::warning(
                    "locKey",
                    "Localization key is empty",
                    i,
                ));
            }

            if skill.icon_path.is_empty() {
                issues.push(ValidationIssue::warning(
                    "iconPath",
                    "Icon path is empty",
                    i,
                ));
            }
        }

        issues
    }

    pub fn record_count(&self) -> usize {
        self.skills.len()
    }

    pub fn skills(&self) -> &[SkillInfo] {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut Vec<SkillInfo> {
        &mut self.skills
    }

    /// The opaque 64-byte footer carried through unchanged.
    pub fn footer(&self) -> &[u8] {
        &self.footer
    }
}
