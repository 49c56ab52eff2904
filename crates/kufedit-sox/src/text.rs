//! Text SOX: indexed variable-length text entries.
//!
//! Layout: 8-byte header, then `count` entries of `{u32 index, u16 length,
//! length text bytes}`. Indices may be sparse but must be strictly
//! increasing; the entry table is padded with empty slots between them, so
//! a slot's position is its on-disk index.
//!
//! Acceptance is deliberately strict: any text byte outside printable ASCII
//! plus tab/CR/LF rejects the whole file. Downstream tooling relies on
//! non-ASCII tables falling through format detection as "unknown" rather
//! than being silently truncated, so this policy must not be relaxed.

use kufedit_common::{BinaryReader, BinaryWriter, Severity, ValidationIssue};

use crate::{Error, Result, SOX_HEADER_SIZE, SOX_MAGIC};

/// Highest record count any known text table uses.
const MAX_ENTRY_COUNT: i32 = 10_000;

/// Ceiling on sparse indices, so corrupt input cannot demand an absurd
/// allocation.
const MAX_ENTRY_INDEX: u32 = 0xFFFF;

/// A single text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEntry {
    /// The on-disk length this entry was loaded with. Text grown past it is
    /// flagged by `validate`, not rejected.
    pub max_length: u16,
    pub text: String,
}

/// The indexed text table codec.
#[derive(Debug, Clone, Default)]
pub struct SoxText {
    entries: Vec<Option<TextEntry>>,
}

fn is_accepted_byte(b: u8) -> bool {
    b == b'\t' || b == b'\n' || b == b'\r' || (0x20..=0x7E).contains(&b)
}

impl SoxText {
    /// Parse a text SOX buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        reader.expect_magic(SOX_MAGIC).map_err(Error::Common)?;

        let count = reader.read_i32().map_err(Error::Common)?;
        if !(0..=MAX_ENTRY_COUNT).contains(&count) {
            return Err(Error::InvalidCount(count));
        }

        let mut entries: Vec<Option<TextEntry>> = Vec::new();
        let mut last_index: Option<u32> = None;

        for _ in 0..count {
            let index = reader.read_u32()?;
            if index > MAX_ENTRY_INDEX {
                return Err(Error::InvalidCount(index as i32));
            }

            // Save emits slots in ascending index order, so only strictly
            // increasing indices can round-trip byte-identically.
            if last_index.is_some_and(|prev| index <= prev) {
                return Err(Error::OutOfOrderIndex(index));
            }
            last_index = Some(index);

            let text_len = reader.read_u16()?;
            if text_len == 0 {
                return Err(Error::ZeroLengthEntry(index as usize));
            }

            let bytes = reader.read_bytes(text_len as usize)?;
            if bytes.iter().any(|&b| !is_accepted_byte(b)) {
                return Err(Error::DisallowedText(index as usize));
            }

            // Pad with empty slots up to this entry's index.
            let slot = index as usize;
            if slot >= entries.len() {
                entries.resize(slot + 1, None);
            }
            entries[slot] = Some(TextEntry {
                max_length: text_len,
                // All bytes were checked ASCII above.
                text: String::from_utf8_lossy(bytes).into_owned(),
            });
        }

        // The declared count must consume the buffer exactly, otherwise this
        // could claim files that merely start with a text-shaped prefix.
        if !reader.is_empty() {
            return Err(kufedit_common::Error::TrailingBytes {
                count: reader.remaining(),
            }
            .into());
        }

        if entries.is_empty() {
            return Err(Error::EmptyTable);
        }

        Ok(Self { entries })
    }

    /// Serialize the table back to bytes. Empty padding slots are skipped;
    /// occupied slots emit their position as the entry index.
    pub fn to_bytes(&self) -> Vec<u8> {
        let occupied = self.entry_count();
        let body: usize = self
            .entries
            .iter()
            .flatten()
            .map(|e| 6 + e.text.len())
            .sum();

        let mut writer = BinaryWriter::with_capacity(SOX_HEADER_SIZE + body);
        writer.write_u32(SOX_MAGIC);
        writer.write_i32(occupied as i32);

        for (index, entry) in self.entries.iter().enumerate() {
            let Some(entry) = entry else { continue };
            writer.write_u32(index as u32);
            writer.write_u16(entry.text.len() as u16);
            writer.write_bytes(entry.text.as_bytes());
        }

        writer.into_bytes()
    }

    /// Flag entries grown past their on-disk length or containing
    /// non-printable characters.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let Some(entry) = entry else { continue };

            if entry.text.len() > entry.max_length as usize {
                issues.push(ValidationIssue::error(
                    "text",
                    "Text exceeds maximum length",
                    i,
                ));
            }

            if entry
                .text
                .bytes()
                .any(|b| b != 0 && !(0x20..=0x7E).contains(&b))
            {
                issues.push(ValidationIssue::new(
                    Severity::Warning,
                    "text",
                    "Contains non-printable characters",
                    i,
                ));
            }
        }

        issues
    }

    /// Number of occupied slots.
    pub fn entry_count(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// The slot table, padded with `None` between sparse indices.
    pub fn entries(&self) -> &[Option<TextEntry>] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<Option<TextEntry>> {
        &mut self.entries
    }

    /// The entry at a given slot index, if occupied.
    pub fn get(&self, index: usize) -> Option<&TextEntry> {
        self.entries.get(index).and_then(|e| e.as_ref())
    }
}
