//! Format auto-detection.
//!
//! Codecs are tried in a fixed priority order; the first one to accept the
//! buffer wins. SoxBinary goes first because its exact-size check makes it
//! the most selective; SoxText comes before SoxSkillInfo because its strict
//! framing and byte acceptance reject skill tables reliably while the
//! reverse does not hold.

use kufedit_sox::{hex, SoxBinary, SoxSkillInfo, SoxText};
use kufedit_stg::StgFile;

/// A successfully detected and parsed file.
#[derive(Debug)]
pub enum DetectedFormat {
    SoxBinary(SoxBinary),
    SoxText(SoxText),
    SoxSkillInfo(SoxSkillInfo),
    Stg(StgFile),
}

impl DetectedFormat {
    /// Short format name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SoxBinary(_) => "SOX troop table",
            Self::SoxText(_) => "SOX text table",
            Self::SoxSkillInfo(_) => "SOX skill table",
            Self::Stg(_) => "STG mission",
        }
    }

    /// Re-serialize the parsed model.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::SoxBinary(sox) => sox.to_bytes(),
            Self::SoxText(sox) => sox.to_bytes(),
            Self::SoxSkillInfo(sox) => sox.to_bytes(),
            Self::Stg(stg) => stg.to_bytes(),
        }
    }

    /// Run the format's validation pass.
    pub fn validate(&self) -> Vec<kufedit_common::ValidationIssue> {
        match self {
            Self::SoxBinary(sox) => sox.validate(),
            Self::SoxText(sox) => sox.validate(),
            Self::SoxSkillInfo(sox) => sox.validate(),
            Self::Stg(stg) => stg.validate(),
        }
    }
}

/// Detect and parse a data file.
///
/// Legacy ASCII-hex wrapped SOX files are transparently decoded first.
/// Returns `None` when no codec accepts the buffer.
pub fn detect(data: &[u8]) -> Option<DetectedFormat> {
    if hex::is_hex_encoded(data) {
        if let Some(decoded) = hex::hex_decode(data) {
            if let Some(format) = detect_raw(&decoded) {
                return Some(format);
            }
        }
    }
    detect_raw(data)
}

fn detect_raw(data: &[u8]) -> Option<DetectedFormat> {
    if let Ok(sox) = SoxBinary::parse(data) {
        return Some(DetectedFormat::SoxBinary(sox));
    }
    if let Ok(sox) = SoxText::parse(data) {
        return Some(DetectedFormat::SoxText(sox));
    }
    if let Ok(sox) = SoxSkillInfo::parse(data) {
        return Some(DetectedFormat::SoxSkillInfo(sox));
    }
    if let Ok(stg) = StgFile::parse(data) {
        return Some(DetectedFormat::Stg(stg));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use kufedit_sox::{SOX_FOOTER_SIZE, TROOP_RECORD_SIZE};
    use kufedit_stg::{STG_HEADER_SIZE, STG_MAGIC, STG_UNIT_SIZE};

    fn sox_binary_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend(std::iter::repeat(0u8).take(TROOP_RECORD_SIZE));
        data.extend(std::iter::repeat(0u8).take(SOX_FOOTER_SIZE));
        data
    }

    fn sox_text_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&5u16.to_le_bytes());
        data.extend_from_slice(b"Hello");
        data
    }

    fn sox_skill_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&1i32.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());
        data.extend_from_slice(&10u16.to_le_bytes());
        data.extend_from_slice(b"@(S_Melee)");
        data.extend_from_slice(&16u16.to_le_bytes());
        data.extend_from_slice(b"IL_SKL_Melee.tga");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&50u32.to_le_bytes());
        data.extend(std::iter::repeat(0u8).take(SOX_FOOTER_SIZE));
        data
    }

    fn stg_bytes() -> Vec<u8> {
        let mut data = vec![0u8; STG_HEADER_SIZE + STG_UNIT_SIZE];
        data[..4].copy_from_slice(&STG_MAGIC.to_le_bytes());
        data[0x270..0x274].copy_from_slice(&1u32.to_le_bytes());
        data
    }

    #[test]
    fn test_detects_each_format() {
        assert!(matches!(
            detect(&sox_binary_bytes()),
            Some(DetectedFormat::SoxBinary(_))
        ));
        assert!(matches!(
            detect(&sox_text_bytes()),
            Some(DetectedFormat::SoxText(_))
        ));
        assert!(matches!(detect(&stg_bytes()), Some(DetectedFormat::Stg(_))));
    }

    #[test]
    fn test_skill_table_not_claimed_by_text() {
        // The skill record's trailing fields and footer fail SoxText's
        // framing, so the probe falls through to SoxSkillInfo.
        assert!(matches!(
            detect(&sox_skill_bytes()),
            Some(DetectedFormat::SoxSkillInfo(_))
        ));
    }

    #[test]
    fn test_detects_hex_wrapped_sox() {
        let encoded = hex::hex_encode(&sox_text_bytes());
        assert!(matches!(
            detect(&encoded),
            Some(DetectedFormat::SoxText(_))
        ));
    }

    #[test]
    fn test_unknown_data_returns_none() {
        assert!(detect(b"not a game file").is_none());
        assert!(detect(&[]).is_none());
    }

    #[test]
    fn test_binary_wins_over_skill_info() {
        // An all-zero troop table is also not a valid skill table, but the
        // priority order must still hand it to SoxBinary first.
        assert!(matches!(
            detect(&sox_binary_bytes()),
            Some(DetectedFormat::SoxBinary(_))
        ));
    }
}
