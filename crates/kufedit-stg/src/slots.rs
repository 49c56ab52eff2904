//! Fixed-size string slot helpers shared by the STG record types.
//!
//! Slots are only patched when the decoded value actually changed, so any
//! stale bytes after the terminator in untouched records survive a
//! round-trip untouched.

use kufedit_common::{encoding, null_terminated, patch_fixed_str};

/// Decode an ASCII/UTF-8 slot, replacing invalid sequences.
pub(crate) fn decode_slot(raw: &[u8], offset: usize, slot: usize) -> String {
    String::from_utf8_lossy(null_terminated(&raw[offset..offset + slot])).into_owned()
}

/// Decode a CP949 name slot, falling back to lossy UTF-8.
pub(crate) fn decode_cp949_slot(raw: &[u8], offset: usize, slot: usize) -> String {
    let bytes = null_terminated(&raw[offset..offset + slot]);
    match encoding::cp949_to_utf8(bytes) {
        Some(text) => text,
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Patch a string slot only if the value differs from what the slot decodes
/// to now.
pub(crate) fn patch_slot_if_changed(raw: &mut [u8], offset: usize, slot: usize, value: &str) {
    if decode_slot(raw, offset, slot) != value {
        patch_fixed_str(raw, offset, slot, value.as_bytes());
    }
}

/// Patch a CP949 name slot only if the value changed. An unmappable value
/// leaves the original bytes in place rather than writing a mangled name.
pub(crate) fn patch_cp949_slot_if_changed(raw: &mut [u8], offset: usize, slot: usize, value: &str) {
    if decode_cp949_slot(raw, offset, slot) == value {
        return;
    }
    if let Some(encoded) = encoding::utf8_to_cp949(value) {
        patch_fixed_str(raw, offset, slot, &encoded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_value_preserves_slack_bytes() {
        let mut raw = *b"name\0garbage\0\0\0\0";
        patch_slot_if_changed(&mut raw, 0, 16, "name");
        assert_eq!(&raw, b"name\0garbage\0\0\0\0");
    }

    #[test]
    fn test_changed_value_zeroes_slot() {
        let mut raw = *b"name\0garbage\0\0\0\0";
        patch_slot_if_changed(&mut raw, 0, 16, "other");
        assert_eq!(&raw[..6], b"other\0");
        assert!(raw[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_cp949_round_trip() {
        let mut raw = [0u8; 32];
        patch_cp949_slot_if_changed(&mut raw, 0, 32, "\u{AE30}\u{C0AC}");
        assert_eq!(&raw[..4], &[0xB1, 0xE2, 0xBB, 0xE7]);
        assert_eq!(decode_cp949_slot(&raw, 0, 32), "\u{AE30}\u{C0AC}");
    }

    #[test]
    fn test_unmappable_name_keeps_original_bytes() {
        let mut raw = [0u8; 32];
        raw[..4].copy_from_slice(b"orig");
        patch_cp949_slot_if_changed(&mut raw, 0, 32, "\u{1F600}");
        assert_eq!(&raw[..5], b"orig\0");
    }

    #[test]
    fn test_undecodable_name_survives_decode_and_patch() {
        // 0xFF 0xFF is not valid EUC-KR; the lossy fallback still yields a
        // stable string, so an untouched unit never patches the slot.
        let mut raw = [0u8; 32];
        raw[0] = 0xFF;
        raw[1] = 0xFF;
        let decoded = decode_cp949_slot(&raw, 0, 32);
        patch_cp949_slot_if_changed(&mut raw, 0, 32, &decoded);
        assert_eq!(raw[..2], [0xFF, 0xFF]);
    }
}
