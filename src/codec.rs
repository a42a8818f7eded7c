//! Hex <-> bytes, as the wire wants them: uppercase going out, either case
//! coming in.

use crate::Result;

/// Encodes bytes as an uppercase hex string, high nibble first. Empty in,
/// empty out.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decodes a hex string into bytes, high nibble first.
///
/// Odd-length strings and characters outside `0-9A-Fa-f` are rejected with
/// `Error::InvalidFormat`; this codec never wraps or guesses.
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn to_hex_is_uppercase() {
        assert_eq!(to_hex(&[0x00, 0xA4, 0x04, 0x00]), "00A40400");
        assert_eq!(to_hex(&[0xDE, 0xAD, 0xBE, 0xEF]), "DEADBEEF");
    }

    #[test]
    fn to_hex_empty() {
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn from_hex_either_case() {
        let want = vec![0xF2, 0x22, 0x22, 0x22, 0x22];
        assert_eq!(from_hex("F222222222").unwrap(), want);
        assert_eq!(from_hex("f222222222").unwrap(), want);
    }

    #[test]
    fn from_hex_empty() {
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn from_hex_odd_length() {
        assert!(matches!(from_hex("ABC"), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn from_hex_rejects_junk() {
        assert!(matches!(from_hex("GG"), Err(Error::InvalidFormat(_))));
        assert!(matches!(from_hex("90 00"), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn round_trip() {
        let all: Vec<u8> = (0u8..=255).collect();
        assert_eq!(from_hex(&to_hex(&all)).unwrap(), all);
    }
}
