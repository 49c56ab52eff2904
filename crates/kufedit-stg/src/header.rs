//! The fixed 628-byte STG header.

use kufedit_common::patch_u32;

use crate::slots::{decode_slot, patch_slot_if_changed};
use crate::STG_HEADER_SIZE;

/// Offsets of the eight 64-byte file-reference slots.
const MAP_FILE: usize = 0x048;
const BITMAP_FILE: usize = 0x088;
const DEFAULT_CAMERA_FILE: usize = 0x0C8;
const USER_CAMERA_FILE: usize = 0x108;
const SETTINGS_FILE: usize = 0x148;
const SKY_CLOUD_EFFECTS: usize = 0x188;
const AI_SCRIPT_FILE: usize = 0x1C8;
const CUBEMAP_TEXTURE: usize = 0x20C;

const UNIT_COUNT: usize = 0x270;

/// Parsed header fields plus the raw 628-byte shadow.
///
/// The magic doubles as the mission id in the original tooling, so it is
/// exposed as an editable field rather than discarded after the check.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StgHeader {
    pub mission_id: u32,
    pub map_file: String,
    pub bitmap_file: String,
    pub default_camera_file: String,
    pub user_camera_file: String,
    pub settings_file: String,
    pub sky_cloud_effects: String,
    pub ai_script_file: String,
    pub cubemap_texture: String,

    #[cfg_attr(feature = "serde", serde(skip))]
    raw: Vec<u8>,
}

impl StgHeader {
    pub(crate) fn parse(window: &[u8]) -> Self {
        debug_assert_eq!(window.len(), STG_HEADER_SIZE);

        Self {
            mission_id: u32::from_le_bytes(window[..4].try_into().unwrap()),
            map_file: decode_slot(window, MAP_FILE, 64),
            bitmap_file: decode_slot(window, BITMAP_FILE, 64),
            default_camera_file: decode_slot(window, DEFAULT_CAMERA_FILE, 64),
            user_camera_file: decode_slot(window, USER_CAMERA_FILE, 64),
            settings_file: decode_slot(window, SETTINGS_FILE, 64),
            sky_cloud_effects: decode_slot(window, SKY_CLOUD_EFFECTS, 64),
            ai_script_file: decode_slot(window, AI_SCRIPT_FILE, 64),
            cubemap_texture: decode_slot(window, CUBEMAP_TEXTURE, 64),
            raw: window.to_vec(),
        }
    }

    /// Unit count as stored in the shadow. The authoritative count on save
    /// is the length of the unit vector.
    pub(crate) fn stored_unit_count(&self) -> u32 {
        u32::from_le_bytes(self.raw[UNIT_COUNT..UNIT_COUNT + 4].try_into().unwrap())
    }

    /// Serialize by patching named fields into a copy of the shadow.
    pub(crate) fn to_bytes(&self, unit_count: u32) -> Vec<u8> {
        let mut raw = self.raw.clone();

        patch_u32(&mut raw, 0, self.mission_id);
        patch_slot_if_changed(&mut raw, MAP_FILE, 64, &self.map_file);
        patch_slot_if_changed(&mut raw, BITMAP_FILE, 64, &self.bitmap_file);
        patch_slot_if_changed(&mut raw, DEFAULT_CAMERA_FILE, 64, &self.default_camera_file);
        patch_slot_if_changed(&mut raw, USER_CAMERA_FILE, 64, &self.user_camera_file);
        patch_slot_if_changed(&mut raw, SETTINGS_FILE, 64, &self.settings_file);
        patch_slot_if_changed(&mut raw, SKY_CLOUD_EFFECTS, 64, &self.sky_cloud_effects);
        patch_slot_if_changed(&mut raw, AI_SCRIPT_FILE, 64, &self.ai_script_file);
        patch_slot_if_changed(&mut raw, CUBEMAP_TEXTURE, 64, &self.cubemap_texture);
        patch_u32(&mut raw, UNIT_COUNT, unit_count);

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STG_MAGIC;

    fn sample_window(unit_count: u32) -> Vec<u8> {
        let mut w = vec![0u8; STG_HEADER_SIZE];
        w[..4].copy_from_slice(&STG_MAGIC.to_le_bytes());
        w[MAP_FILE..MAP_FILE + 9].copy_from_slice(b"E1001.map");
        w[AI_SCRIPT_FILE..AI_SCRIPT_FILE + 9].copy_from_slice(b"E1001.dat");
        w[UNIT_COUNT..UNIT_COUNT + 4].copy_from_slice(&unit_count.to_le_bytes());
        w
    }

    #[test]
    fn test_parse_fields() {
        let header = StgHeader::parse(&sample_window(3));

        assert_eq!(header.mission_id, STG_MAGIC);
        assert_eq!(header.map_file, "E1001.map");
        assert_eq!(header.ai_script_file, "E1001.dat");
        assert_eq!(header.bitmap_file, "");
        assert_eq!(header.stored_unit_count(), 3);
    }

    #[test]
    fn test_round_trip_identity() {
        let window = sample_window(2);
        let header = StgHeader::parse(&window);
        assert_eq!(header.to_bytes(2), window);
    }

    #[test]
    fn test_unit_count_rewritten_on_save() {
        let window = sample_window(2);
        let header = StgHeader::parse(&window);

        let saved = header.to_bytes(5);
        assert_eq!(
            u32::from_le_bytes(saved[UNIT_COUNT..UNIT_COUNT + 4].try_into().unwrap()),
            5
        );
    }

    #[test]
    fn test_edited_path_patched() {
        let mut header = StgHeader::parse(&sample_window(0));
        header.map_file = "E1002.map".into();

        let saved = header.to_bytes(0);
        assert_eq!(&saved[MAP_FILE..MAP_FILE + 10], b"E1002.map\0");
    }
}
