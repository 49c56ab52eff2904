//! Legacy ASCII-hex wrapping of SOX data.
//!
//! Early distributions stored SOX tables with every logical byte expanded to
//! two ASCII hex characters (u32 value 100 appears as `"64000000"`). Current
//! files are raw binary, so this is a defensive decode path: callers
//! pre-check with [`is_hex_encoded`] before attempting a decode.

/// Check whether data looks like ASCII-hex wrapped SOX.
///
/// The first 16 characters must be hex digits and the decoded first u16 of
/// the header must match the SOX marker (0x64, 0x00).
pub fn is_hex_encoded(data: &[u8]) -> bool {
    if data.len() < 16 {
        return false;
    }
    if !data[..16].iter().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    // Little-endian marker 100 begins "6400...".
    matches!(
        (hex_val(data[0]), hex_val(data[1]), hex_val(data[2]), hex_val(data[3])),
        (Some(h0), Some(h1), Some(h2), Some(h3))
            if (h0 << 4) | h1 == 0x64 && (h2 << 4) | h3 == 0x00
    )
}

/// Decode ASCII-hex wrapped data to binary.
///
/// Returns `None` for odd-length input or any non-hex byte.
pub fn hex_decode(encoded: &[u8]) -> Option<Vec<u8>> {
    if encoded.len() % 2 != 0 {
        return None;
    }

    let mut decoded = Vec::with_capacity(encoded.len() / 2);
    for pair in encoded.chunks_exact(2) {
        let high = hex_val(pair[0])?;
        let low = hex_val(pair[1])?;
        decoded.push((high << 4) | low);
    }
    Some(decoded)
}

/// Encode binary data to uppercase ASCII hex.
pub fn hex_encode(decoded: &[u8]) -> Vec<u8> {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    let mut encoded = Vec::with_capacity(decoded.len() * 2);
    for &b in decoded {
        encoded.push(DIGITS[(b >> 4) as usize]);
        encoded.push(DIGITS[(b & 0xF) as usize]);
    }
    encoded
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_header() {
        let decoded = hex_decode(b"64000000").unwrap();
        assert_eq!(decoded, [0x64, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(hex_decode(b"aBcDeF").unwrap(), [0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn test_decode_rejects_invalid() {
        assert!(hex_decode(b"abc").is_none()); // odd length
        assert!(hex_decode(b"zz").is_none()); // non-hex
    }

    #[test]
    fn test_encode_decode_inverse() {
        let data = [0x64, 0x00, 0xFF, 0x10, 0xAB];
        assert_eq!(hex_decode(&hex_encode(&data)).unwrap(), data);
        assert_eq!(hex_encode(&data), b"6400FF10AB".to_vec());
    }

    #[test]
    fn test_is_hex_encoded() {
        assert!(is_hex_encoded(b"6400000001000000"));
        assert!(!is_hex_encoded(b"6500000001000000")); // wrong marker
        assert!(!is_hex_encoded(b"64000000")); // too short
        assert!(!is_hex_encoded(&[0x64, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])); // raw binary
    }
}
