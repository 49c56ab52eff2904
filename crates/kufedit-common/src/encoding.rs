//! CP949 (EUC-KR) game text transcoding.
//!
//! Fixed-size text fields inside STG unit records use the game's original
//! Korean locale encoding. Both directions return `None` on any undecodable
//! or unmappable sequence; callers fall back to preserving the original
//! bytes so no data is ever lost or replaced.

use encoding_rs::EUC_KR;

/// Decode CP949 bytes to a UTF-8 string.
///
/// Returns `None` if any byte sequence is invalid; the caller should keep
/// the raw bytes instead.
pub fn cp949_to_utf8(bytes: &[u8]) -> Option<String> {
    let (decoded, had_errors) = EUC_KR.decode_without_bom_handling(bytes);
    if had_errors {
        None
    } else {
        Some(decoded.into_owned())
    }
}

/// Encode a UTF-8 string back to CP949 bytes.
///
/// Returns `None` if any character has no CP949 mapping; the caller should
/// leave the previously retained raw bytes untouched.
pub fn utf8_to_cp949(text: &str) -> Option<Vec<u8>> {
    let (encoded, _, had_errors) = EUC_KR.encode(text);
    if had_errors {
        None
    } else {
        Some(encoded.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(cp949_to_utf8(b"TestUnit").as_deref(), Some("TestUnit"));
        assert_eq!(utf8_to_cp949("TestUnit").as_deref(), Some(&b"TestUnit"[..]));
    }

    #[test]
    fn test_korean_round_trip() {
        // "기사" (knight) in EUC-KR.
        let cp949 = [0xB1, 0xE2, 0xBB, 0xE7];
        let utf8 = cp949_to_utf8(&cp949).unwrap();
        assert_eq!(utf8, "\u{AE30}\u{C0AC}");
        assert_eq!(utf8_to_cp949(&utf8).unwrap(), cp949);
    }

    #[test]
    fn test_invalid_sequence_returns_none() {
        // 0xFF 0xFF is not a valid EUC-KR sequence.
        assert_eq!(cp949_to_utf8(&[0xFF, 0xFF]), None);
    }

    #[test]
    fn test_unmappable_char_returns_none() {
        assert_eq!(utf8_to_cp949("\u{1F600}"), None);
    }
}
