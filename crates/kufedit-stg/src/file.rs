//! Whole-file STG model: header, units, tail.

use kufedit_common::{BinaryReader, BinaryWriter, Severity, ValidationIssue};

use crate::{
    Error, Result, StgHeader, StgTail, StgUnit, TailData, MAX_STANDARD_JOB, STG_HEADER_SIZE,
    STG_MAGIC, STG_UNIT_SIZE,
};

/// A loaded STG mission file.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StgFile {
    header: StgHeader,
    units: Vec<StgUnit>,
    tail: TailData,
}

impl StgFile {
    /// Parse an STG buffer.
    ///
    /// Rejects a short header, a bad magic, or a buffer smaller than the
    /// declared unit array. Tail corruption does not reject: the tail is
    /// kept raw and [`StgFile::tail_parsed`] reports false.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < STG_HEADER_SIZE {
            return Err(Error::Truncated {
                expected: STG_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut reader = BinaryReader::new(data);
        reader.expect_magic(STG_MAGIC)?;
        reader.seek(0);

        let header = StgHeader::parse(reader.read_bytes(STG_HEADER_SIZE)?);

        let count = header.stored_unit_count() as usize;
        let expected = STG_HEADER_SIZE + count * STG_UNIT_SIZE;
        if data.len() < expected {
            return Err(Error::Truncated {
                expected,
                actual: data.len(),
            });
        }

        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            units.push(StgUnit::parse(reader.read_bytes(STG_UNIT_SIZE)?));
        }

        let tail_bytes = reader.remaining_bytes();
        let tail = if tail_bytes.is_empty() {
            TailData::Raw(Vec::new())
        } else {
            match StgTail::parse(tail_bytes) {
                Ok(parsed) => TailData::Parsed(parsed),
                Err(_) => TailData::Raw(tail_bytes.to_vec()),
            }
        };

        Ok(Self {
            header,
            units,
            tail,
        })
    }

    /// Serialize the file. The header unit count is rewritten from the
    /// actual unit vector length.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(
            STG_HEADER_SIZE + self.units.len() * STG_UNIT_SIZE,
        );

        writer.write_bytes(&self.header.to_bytes(self.units.len() as u32));
        for unit in &self.units {
            writer.write_bytes(&unit.to_bytes());
        }

        match &self.tail {
            TailData::Parsed(tail) => tail.write(&mut writer),
            TailData::Raw(blob) => writer.write_bytes(blob),
        }

        writer.into_bytes()
    }

    /// Check all units against the known constraints.
    ///
    /// Duplicate unique ids are reported once per duplicate occurrence, at
    /// the later of the two indices. A raw tail is never inspected.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (i, unit) in self.units.iter().enumerate() {
            if unit.unit_name.is_empty() {
                issues.push(ValidationIssue::warning("unitName", "Unit has no name", i));
            }

            if unit.ucd > 3 {
                issues.push(ValidationIssue::error("ucd", "Invalid UCD value", i));
            }

            if unit.leader.level == 0 || unit.leader.level > 99 {
                issues.push(ValidationIssue::warning(
                    "leaderLevel",
                    "Level outside typical range (1-99)",
                    i,
                ));
            }

            if unit.leader.worldmap_id != 0xFF && unit.leader.worldmap_id > 20 {
                issues.push(ValidationIssue::warning(
                    "leaderWorldmapId",
                    "Worldmap ID may cause post-mission issues",
                    i,
                ));
            }

            if unit.is_hero == 0 && unit.leader.job > MAX_STANDARD_JOB {
                issues.push(ValidationIssue::error(
                    "leaderJobType",
                    "Job type exceeds the standard range for a non-hero unit",
                    i,
                ));
            }

            if unit.officer_count > 2 {
                issues.push(ValidationIssue::error(
                    "officerCount",
                    "Officer count exceeds maximum of 2",
                    i,
                ));
            }

            // Unit counts are small, the quadratic scan is fine.
            if self.units[..i].iter().any(|u| u.unique_id == unit.unique_id) {
                issues.push(ValidationIssue::error(
                    "uniqueId",
                    format!("Duplicate unique ID: {}", unit.unique_id),
                    i,
                ));
            }
        }

        issues
    }

    /// True when any validation issue is an error.
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    /// Whether the tail survived structural parsing.
    pub fn tail_parsed(&self) -> bool {
        self.tail.is_parsed()
    }

    pub fn header(&self) -> &StgHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut StgHeader {
        &mut self.header
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn units(&self) -> &[StgUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut Vec<StgUnit> {
        &mut self.units
    }

    pub fn tail(&self) -> &TailData {
        &self.tail
    }

    pub fn tail_mut(&mut self) -> &mut TailData {
        &mut self.tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ucd;

    fn header_bytes(unit_count: u32) -> Vec<u8> {
        let mut h = vec![0u8; STG_HEADER_SIZE];
        h[..4].copy_from_slice(&STG_MAGIC.to_le_bytes());
        h[0x048..0x051].copy_from_slice(b"E1001.map");
        h[0x270..0x274].copy_from_slice(&unit_count.to_le_bytes());
        h
    }

    fn unit_bytes(name: &str, unique_id: u32, level: u8) -> Vec<u8> {
        let mut u = vec![0u8; STG_UNIT_SIZE];
        u[..name.len()].copy_from_slice(name.as_bytes());
        u[0x20..0x24].copy_from_slice(&unique_id.to_le_bytes());
        u[0x24] = Ucd::Enemy as u8;
        u[0x26] = 1;
        u[0x44..0x48].copy_from_slice(&5000.0f32.to_le_bytes());
        u[0x48..0x4C].copy_from_slice(&3000.0f32.to_le_bytes());
        u[0x56] = 0xFF;
        u[0x57] = level;
        u[0xC2] = 0xFF;
        u[0x12A] = 0xFF;
        u
    }

    fn empty_tail() -> Vec<u8> {
        // Zero areas, variables, blocks and footer entries.
        let mut t = Vec::new();
        for _ in 0..4 {
            t.extend_from_slice(&0i32.to_le_bytes());
        }
        t
    }

    fn sample_file() -> Vec<u8> {
        let mut data = header_bytes(1);
        data.extend_from_slice(&unit_bytes("TestUnit", 42, 5));
        data.extend_from_slice(&empty_tail());
        data
    }

    #[test]
    fn test_parse_and_round_trip() {
        let data = sample_file();
        let stg = StgFile::parse(&data).unwrap();

        assert_eq!(stg.unit_count(), 1);
        assert_eq!(stg.header().map_file, "E1001.map");
        assert!(stg.tail_parsed());
        assert_eq!(stg.to_bytes(), data);
    }

    #[test]
    fn test_modified_unit_round_trip() {
        let data = sample_file();
        let mut stg = StgFile::parse(&data).unwrap();

        let unit = &mut stg.units_mut()[0];
        assert_eq!(unit.unit_name, "TestUnit");
        assert_eq!(unit.unique_id, 42);
        assert_eq!(unit.disposition(), Some(Ucd::Enemy));
        assert_eq!((unit.position_x, unit.position_y), (5000.0, 3000.0));
        unit.leader.level = 10;

        let saved = stg.to_bytes();
        let reparsed = StgFile::parse(&saved).unwrap();
        assert_eq!(reparsed.units()[0].leader.level, 10);

        // Only the one byte changed.
        let mut expected = data;
        expected[STG_HEADER_SIZE + 0x57] = 10;
        assert_eq!(saved, expected);
    }

    #[test]
    fn test_rejects_bad_magic_and_truncation() {
        let mut data = sample_file();
        data[0] = 0;
        assert!(StgFile::parse(&data).is_err());

        assert!(StgFile::parse(&[0u8; 100]).is_err());

        let full = sample_file();
        assert!(matches!(
            StgFile::parse(&full[..STG_HEADER_SIZE + 10]),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_corrupt_tail_falls_back_to_raw() {
        let mut data = header_bytes(1);
        data.extend_from_slice(&unit_bytes("U", 1, 5));
        // Area count claims more entries than the buffer holds.
        data.extend_from_slice(&100i32.to_le_bytes());
        data.extend_from_slice(&[0xAB; 10]);

        let stg = StgFile::parse(&data).unwrap();
        assert!(!stg.tail_parsed());
        assert_eq!(stg.to_bytes(), data);

        // A second pass over the saved bytes behaves identically.
        let again = StgFile::parse(&stg.to_bytes()).unwrap();
        assert!(!again.tail_parsed());
        assert_eq!(again.to_bytes(), data);
    }

    #[test]
    fn test_missing_tail_round_trips() {
        let mut data = header_bytes(1);
        data.extend_from_slice(&unit_bytes("U", 1, 5));

        let stg = StgFile::parse(&data).unwrap();
        assert!(!stg.tail_parsed());
        assert_eq!(stg.to_bytes(), data);
    }

    #[test]
    fn test_unit_count_follows_vector() {
        let data = sample_file();
        let mut stg = StgFile::parse(&data).unwrap();
        stg.units_mut().push(StgUnit::default());

        let saved = stg.to_bytes();
        let reparsed = StgFile::parse(&saved).unwrap();
        assert_eq!(reparsed.unit_count(), 2);
    }

    #[test]
    fn test_validate_duplicate_ids_at_later_index() {
        let mut data = header_bytes(3);
        data.extend_from_slice(&unit_bytes("A", 7, 5));
        data.extend_from_slice(&unit_bytes("B", 8, 5));
        data.extend_from_slice(&unit_bytes("C", 7, 5));
        data.extend_from_slice(&empty_tail());

        let stg = StgFile::parse(&data).unwrap();
        let issues = stg.validate();

        let dups: Vec<_> = issues.iter().filter(|i| i.field == "uniqueId").collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].record_index, 2);
        assert_eq!(dups[0].severity, Severity::Error);
        assert_eq!(dups[0].message, "Duplicate unique ID: 7");
    }

    #[test]
    fn test_validate_unit_rules() {
        let mut bad = unit_bytes("", 1, 0);
        bad[0x24] = 9; // bad ucd
        bad[0x56] = 21; // suspicious worldmap id
        bad[0x54] = 50; // job beyond standard range, not a hero
        bad[0xBC..0xC0].copy_from_slice(&3u32.to_le_bytes());

        let mut data = header_bytes(1);
        data.extend_from_slice(&bad);
        data.extend_from_slice(&empty_tail());

        let stg = StgFile::parse(&data).unwrap();
        let issues = stg.validate();

        let field = |f: &str| issues.iter().find(|i| i.field == f).unwrap();
        assert_eq!(field("unitName").severity, Severity::Warning);
        assert_eq!(field("ucd").severity, Severity::Error);
        assert_eq!(field("leaderLevel").severity, Severity::Warning);
        assert_eq!(field("leaderWorldmapId").severity, Severity::Warning);
        assert_eq!(field("leaderJobType").severity, Severity::Error);
        assert_eq!(field("officerCount").severity, Severity::Error);
        assert!(stg.has_errors());
    }

    #[test]
    fn test_hero_job_not_flagged() {
        let mut hero = unit_bytes("Hero", 1, 50);
        hero[0x25] = 1;
        hero[0x54] = 120; // extended model id

        let mut data = header_bytes(1);
        data.extend_from_slice(&hero);
        data.extend_from_slice(&empty_tail());

        let stg = StgFile::parse(&data).unwrap();
        assert!(!stg.validate().iter().any(|i| i.field == "leaderJobType"));
    }
}
