//! Mission script events.
//!
//! Events are the riskiest part of the tail to rebuild, so each one keeps
//! the exact bytes it was parsed from. An untouched event is written back
//! verbatim; only events mutated through the `_mut` accessors are
//! re-serialized field by field.

use kufedit_common::{BinaryReader, BinaryWriter};

use crate::slots::{decode_slot, patch_slot_if_changed};
use crate::{ParamValue, Result};

const DESC_SLOT: usize = 64;

/// One condition or action: a script opcode plus its parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScriptEntry {
    pub type_id: u32,
    pub params: Vec<ParamValue>,
}

impl ScriptEntry {
    fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let type_id = reader.read_u32()?;
        let param_count = reader.read_u32()?;

        let mut params = Vec::with_capacity(param_count.min(1024) as usize);
        for _ in 0..param_count {
            params.push(ParamValue::parse(reader)?);
        }

        Ok(Self { type_id, params })
    }

    fn write(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.type_id);
        writer.write_u32(self.params.len() as u32);
        for param in &self.params {
            param.write(writer);
        }
    }
}

/// A scripted event: description, id, conditions and actions.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StgEvent {
    description: String,
    id: u32,
    conditions: Vec<ScriptEntry>,
    actions: Vec<ScriptEntry>,

    /// Exact bytes this event was parsed from, description slot included.
    #[cfg_attr(feature = "serde", serde(skip))]
    raw: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    modified: bool,
}

impl StgEvent {
    pub(crate) fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let start = reader.position();

        let desc_raw = reader.read_bytes(DESC_SLOT)?;
        let description = decode_slot(desc_raw, 0, DESC_SLOT);
        let id = reader.read_u32()?;

        let cond_count = reader.read_i32()?;
        if cond_count < 0 {
            return Err(crate::Error::InvalidCount(cond_count));
        }
        let mut conditions = Vec::with_capacity(cond_count.min(1024) as usize);
        for _ in 0..cond_count {
            conditions.push(ScriptEntry::parse(reader)?);
        }

        let act_count = reader.read_i32()?;
        if act_count < 0 {
            return Err(crate::Error::InvalidCount(act_count));
        }
        let mut actions = Vec::with_capacity(act_count.min(1024) as usize);
        for _ in 0..act_count {
            actions.push(ScriptEntry::parse(reader)?);
        }

        Ok(Self {
            description,
            id,
            conditions,
            actions,
            raw: reader.bytes_since(start).to_vec(),
            modified: false,
        })
    }

    pub(crate) fn write(&self, writer: &mut BinaryWriter) {
        if !self.modified {
            writer.write_bytes(&self.raw);
            return;
        }

        // Rebuild, patching the description back into its original slot so
        // slack bytes survive when only other fields changed.
        let mut desc = [0u8; DESC_SLOT];
        desc.copy_from_slice(&self.raw[..DESC_SLOT]);
        patch_slot_if_changed(&mut desc, 0, DESC_SLOT, &self.description);

        writer.write_bytes(&desc);
        writer.write_u32(self.id);
        writer.write_i32(self.conditions.len() as i32);
        for cond in &self.conditions {
            cond.write(writer);
        }
        writer.write_i32(self.actions.len() as i32);
        for act in &self.actions {
            act.write(writer);
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.modified = true;
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
        self.modified = true;
    }

    pub fn conditions(&self) -> &[ScriptEntry] {
        &self.conditions
    }

    /// Mutable access; marks the event for re-serialization.
    pub fn conditions_mut(&mut self) -> &mut Vec<ScriptEntry> {
        self.modified = true;
        &mut self.conditions
    }

    pub fn actions(&self) -> &[ScriptEntry] {
        &self.actions
    }

    /// Mutable access; marks the event for re-serialization.
    pub fn actions_mut(&mut self) -> &mut Vec<ScriptEntry> {
        self.modified = true;
        &mut self.actions
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

/// A group of events sharing one u32 block header.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EventBlock {
    pub header: u32,
    pub events: Vec<StgEvent>,
}

impl EventBlock {
    pub(crate) fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let header = reader.read_u32()?;
        let event_count = reader.read_i32()?;
        if event_count < 0 {
            return Err(crate::Error::InvalidCount(event_count));
        }

        let mut events = Vec::with_capacity(event_count.min(1024) as usize);
        for _ in 0..event_count {
            events.push(StgEvent::parse(reader)?);
        }

        Ok(Self { header, events })
    }

    pub(crate) fn write(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.header);
        writer.write_i32(self.events.len() as i32);
        for event in &self.events {
            event.write(writer);
        }
    }
}
