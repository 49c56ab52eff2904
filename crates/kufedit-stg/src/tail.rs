//! The variable-length tail after the unit array.
//!
//! Four count-prefixed sections in fixed order: trigger areas, script
//! variables, event blocks and the footer pair list. Parsing is atomic: any
//! structural failure anywhere degrades the whole tail to an opaque raw
//! blob ([`TailData::Raw`]) that round-trips byte-for-byte.

use kufedit_common::{BinaryReader, BinaryWriter};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::event::EventBlock;
use crate::slots::{decode_slot, patch_slot_if_changed};
use crate::{ParamValue, Result};

/// Size of one trigger area entry.
pub const AREA_ENTRY_SIZE: usize = 84;

const AREA_NAME_SLOT: usize = 32;
const VAR_NAME_SLOT: usize = 64;

/// A named trigger area with an axis-aligned bounding rectangle.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StgArea {
    pub name: String,
    pub unknown_20: u32,
    pub area_id: u32,
    /// x1, y1, x2, y2.
    pub bounds: [f32; 4],

    #[cfg_attr(feature = "serde", serde(skip))]
    raw: Vec<u8>,
}

impl StgArea {
    fn parse(window: &[u8]) -> Self {
        let mut bounds = [0.0f32; 4];
        for (i, b) in bounds.iter_mut().enumerate() {
            let at = 0x44 + i * 4;
            *b = f32::from_le_bytes(window[at..at + 4].try_into().unwrap());
        }

        Self {
            name: decode_slot(window, 0x00, AREA_NAME_SLOT),
            unknown_20: u32::from_le_bytes(window[0x20..0x24].try_into().unwrap()),
            area_id: u32::from_le_bytes(window[0x40..0x44].try_into().unwrap()),
            bounds,
            raw: window.to_vec(),
        }
    }

    fn write(&self, writer: &mut BinaryWriter) {
        let mut raw = self.raw.clone();
        patch_slot_if_changed(&mut raw, 0x00, AREA_NAME_SLOT, &self.name);
        kufedit_common::patch_u32(&mut raw, 0x20, self.unknown_20);
        kufedit_common::patch_u32(&mut raw, 0x40, self.area_id);
        for (i, b) in self.bounds.iter().enumerate() {
            kufedit_common::patch_f32(&mut raw, 0x44 + i * 4, *b);
        }
        writer.write_bytes(&raw);
    }
}

/// A typed script variable with its initial value.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StgVariable {
    pub name: String,
    pub id: u32,
    pub value: ParamValue,

    #[cfg_attr(feature = "serde", serde(skip))]
    name_raw: Vec<u8>,
}

impl StgVariable {
    fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let name_raw = reader.read_bytes(VAR_NAME_SLOT)?.to_vec();
        let name = decode_slot(&name_raw, 0, VAR_NAME_SLOT);
        let id = reader.read_u32()?;
        let value = ParamValue::parse(reader)?;

        Ok(Self {
            name,
            id,
            value,
            name_raw,
        })
    }

    fn write(&self, writer: &mut BinaryWriter) {
        let mut name_raw = self.name_raw.clone();
        patch_slot_if_changed(&mut name_raw, 0, VAR_NAME_SLOT, &self.name);
        writer.write_bytes(&name_raw);
        writer.write_u32(self.id);
        self.value.write(writer);
    }
}

/// One footer pair. Meaning unknown; carried through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C)]
pub struct FooterEntry {
    pub field1: u32,
    pub field2: u32,
}

/// The fully parsed tail.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StgTail {
    pub areas: Vec<StgArea>,
    pub variables: Vec<StgVariable>,
    pub event_blocks: Vec<EventBlock>,
    pub footer: Vec<FooterEntry>,
}

impl Default for StgArea {
    fn default() -> Self {
        Self {
            name: String::new(),
            unknown_20: 0,
            area_id: 0,
            bounds: [0.0; 4],
            raw: vec![0; AREA_ENTRY_SIZE],
        }
    }
}

impl StgTail {
    /// Parse the whole tail. The cursor must land exactly at the end of the
    /// buffer after the footer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let area_count = read_section_count(&mut reader, AREA_ENTRY_SIZE)?;
        let mut areas = Vec::with_capacity(area_count);
        for _ in 0..area_count {
            areas.push(StgArea::parse(reader.read_bytes(AREA_ENTRY_SIZE)?));
        }

        // Variables are variable-length, so the count is only sanity-checked
        // against the minimum entry size.
        let var_count = read_section_count(&mut reader, VAR_NAME_SLOT + 4 + 8)?;
        let mut variables = Vec::with_capacity(var_count);
        for _ in 0..var_count {
            variables.push(StgVariable::parse(&mut reader)?);
        }

        let block_count = read_section_count(&mut reader, 8)?;
        let mut event_blocks = Vec::with_capacity(block_count);
        for _ in 0..block_count {
            event_blocks.push(EventBlock::parse(&mut reader)?);
        }

        let footer_count = read_section_count(&mut reader, 8)?;
        let mut footer = Vec::with_capacity(footer_count);
        for _ in 0..footer_count {
            footer.push(reader.read_struct::<FooterEntry>()?);
        }

        if !reader.is_empty() {
            return Err(kufedit_common::Error::TrailingBytes {
                count: reader.remaining(),
            }
            .into());
        }

        Ok(Self {
            areas,
            variables,
            event_blocks,
            footer,
        })
    }

    /// Serialize all four sections, counts re-derived from the collections.
    pub fn write(&self, writer: &mut BinaryWriter) {
        writer.write_i32(self.areas.len() as i32);
        for area in &self.areas {
            area.write(writer);
        }

        writer.write_i32(self.variables.len() as i32);
        for var in &self.variables {
            var.write(writer);
        }

        writer.write_i32(self.event_blocks.len() as i32);
        for block in &self.event_blocks {
            block.write(writer);
        }

        writer.write_i32(self.footer.len() as i32);
        for entry in &self.footer {
            writer.write_bytes(entry.as_bytes());
        }
    }

    pub fn event_count(&self) -> usize {
        self.event_blocks.iter().map(|b| b.events.len()).sum()
    }
}

/// Everything after the unit array: parsed when structurally sound,
/// otherwise an opaque blob.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TailData {
    Parsed(StgTail),
    Raw(Vec<u8>),
}

impl TailData {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn as_parsed(&self) -> Option<&StgTail> {
        match self {
            Self::Parsed(tail) => Some(tail),
            Self::Raw(_) => None,
        }
    }

    pub fn as_parsed_mut(&mut self) -> Option<&mut StgTail> {
        match self {
            Self::Parsed(tail) => Some(tail),
            Self::Raw(_) => None,
        }
    }
}

/// Read an i32 count prefix and reject counts that cannot fit in the
/// remaining bytes at `min_entry_size` apiece.
fn read_section_count(reader: &mut BinaryReader<'_>, min_entry_size: usize) -> Result<usize> {
    let count = reader.read_i32()?;
    if count < 0 {
        return Err(crate::Error::InvalidCount(count));
    }
    let count = count as usize;
    if count.saturating_mul(min_entry_size) > reader.remaining() {
        return Err(kufedit_common::Error::UnexpectedEof {
            needed: count * min_entry_size,
            available: reader.remaining(),
        }
        .into());
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::event_bytes;

    fn area_bytes(name: &str, id: u32) -> Vec<u8> {
        let mut a = vec![0u8; AREA_ENTRY_SIZE];
        a[..name.len()].copy_from_slice(name.as_bytes());
        a[0x40..0x44].copy_from_slice(&id.to_le_bytes());
        a[0x44..0x48].copy_from_slice(&10.0f32.to_le_bytes());
        a[0x48..0x4C].copy_from_slice(&20.0f32.to_le_bytes());
        a[0x4C..0x50].copy_from_slice(&110.0f32.to_le_bytes());
        a[0x50..0x54].copy_from_slice(&120.0f32.to_le_bytes());
        a
    }

    fn variable_bytes(name: &str, id: u32, value: i32) -> Vec<u8> {
        let mut v = vec![0u8; VAR_NAME_SLOT];
        v[..name.len()].copy_from_slice(name.as_bytes());
        v.extend_from_slice(&id.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes()); // int tag
        v.extend_from_slice(&value.to_le_bytes());
        v
    }

    fn sample_tail() -> Vec<u8> {
        let mut t = Vec::new();
        t.extend_from_slice(&1i32.to_le_bytes());
        t.extend_from_slice(&area_bytes("Area01", 7));
        t.extend_from_slice(&1i32.to_le_bytes());
        t.extend_from_slice(&variable_bytes("gPhase", 0, 3));
        t.extend_from_slice(&1i32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes()); // block header
        t.extend_from_slice(&1i32.to_le_bytes());
        t.extend_from_slice(&event_bytes("Intro", 1));
        t.extend_from_slice(&2i32.to_le_bytes());
        t.extend_from_slice(&[1, 0, 0, 0, 2, 0, 0, 0]);
        t.extend_from_slice(&[3, 0, 0, 0, 4, 0, 0, 0]);
        t
    }

    #[test]
    fn test_parse_sections() {
        let tail = StgTail::parse(&sample_tail()).unwrap();

        assert_eq!(tail.areas.len(), 1);
        assert_eq!(tail.areas[0].name, "Area01");
        assert_eq!(tail.areas[0].area_id, 7);
        assert_eq!(tail.areas[0].bounds, [10.0, 20.0, 110.0, 120.0]);

        assert_eq!(tail.variables.len(), 1);
        assert_eq!(tail.variables[0].name, "gPhase");
        assert_eq!(tail.variables[0].value, ParamValue::Int(3));

        assert_eq!(tail.event_count(), 1);
        assert_eq!(tail.footer.len(), 2);
        assert_eq!(tail.footer[1], FooterEntry { field1: 3, field2: 4 });
    }

    #[test]
    fn test_round_trip_identity() {
        let data = sample_tail();
        let tail = StgTail::parse(&data).unwrap();

        let mut w = BinaryWriter::new();
        tail.write(&mut w);
        assert_eq!(w.into_bytes(), data);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut data = sample_tail();
        data.push(0);
        assert!(StgTail::parse(&data).is_err());
    }

    #[test]
    fn test_oversized_count_rejected() {
        let mut data = sample_tail();
        data[..4].copy_from_slice(&1000i32.to_le_bytes());
        assert!(StgTail::parse(&data).is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut data = sample_tail();
        data[..4].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            StgTail::parse(&data),
            Err(crate::Error::InvalidCount(-1))
        ));
    }

    #[test]
    fn test_area_rename_round_trip() {
        let data = sample_tail();
        let mut tail = StgTail::parse(&data).unwrap();
        tail.areas[0].name = "Area02".into();

        let mut w = BinaryWriter::new();
        tail.write(&mut w);
        let saved = w.into_bytes();
        assert_eq!(&saved[4..11], b"Area02\0");

        let reparsed = StgTail::parse(&saved).unwrap();
        assert_eq!(reparsed.areas[0].name, "Area02");
        assert_eq!(reparsed.areas[0].area_id, 7);
    }
}
