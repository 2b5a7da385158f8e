//! URL-safe Base64 alphabet and transcoding helpers
//!
//! The alphabet matches RFC 4648 §5 (`-` and `_` in place of `+` and `/`) and
//! never emits `=` padding, so bit-packed payloads and compressed byte strings
//! share one character set.

use alloc::string::String;
use alloc::vec::Vec;

use crate::bitstream::BitStream;

/// The 64 symbols, indexed by sextet value
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Marker for bytes outside the alphabet in [`DECODE_TABLE`]
const INVALID: u8 = 0xFF;

/// Reverse lookup table, built at compile time
static DECODE_TABLE: [u8; 256] = generate_decode_table();

const fn generate_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;

    while i < 64 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }

    table
}

/// Symbol for a sextet; only the low six bits are used
#[inline]
pub fn symbol(sextet: u8) -> char {
    ALPHABET[(sextet & 0x3F) as usize] as char
}

/// Sextet value for a symbol, `None` for characters outside the alphabet
#[inline]
pub fn value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_TABLE[c as usize] {
        INVALID => None,
        v => Some(v),
    }
}

/// Decode text into bits, skipping characters outside the alphabet
///
/// Returns the bits and the number of skipped characters. Skipping keeps
/// links with stray characters readable but can shift every later field.
pub fn decode_lenient(text: &str) -> (BitStream, usize) {
    let mut bits = BitStream::with_capacity(text.len() * 6);
    let mut skipped = 0;

    for c in text.chars() {
        match value(c) {
            Some(v) => bits.write(v as u32, 6),
            None => skipped += 1,
        }
    }

    (bits, skipped)
}

/// Encode bytes as unpadded Base64URL text
pub fn encode_bytes(bytes: &[u8]) -> String {
    BitStream::from_bytes(bytes).to_base64()
}

/// Decode Base64URL text into whole bytes
///
/// Trailing bits that do not fill a byte are padding and are dropped.
pub fn decode_bytes(text: &str) -> (Vec<u8>, usize) {
    let (bits, skipped) = decode_lenient(text);
    let mut bytes = bits.to_bytes();
    bytes.truncate(bits.len() / 8);
    (bytes, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_lookup() {
        for (i, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(symbol(i as u8), c as char);
            assert_eq!(value(c as char), Some(i as u8));
        }
        assert_eq!(value('='), None);
        assert_eq!(value('+'), None);
        assert_eq!(value('é'), None);
    }

    #[test]
    fn test_known_byte_vectors() {
        // RFC 4648 test vectors without padding
        assert_eq!(encode_bytes(b""), "");
        assert_eq!(encode_bytes(b"f"), "Zg");
        assert_eq!(encode_bytes(b"fo"), "Zm8");
        assert_eq!(encode_bytes(b"foo"), "Zm9v");
        assert_eq!(encode_bytes(b"foob"), "Zm9vYg");
        assert_eq!(encode_bytes(&[0xFB, 0xFF]), "-_8");
    }

    #[test]
    fn test_decode_bytes_drops_padding_bits() {
        let (bytes, skipped) = decode_bytes("Zm9vYg");
        assert_eq!(bytes, b"foob");
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_decode_lenient_counts_skipped() {
        let (bits, skipped) = decode_lenient("Zm 9v=\n");
        assert_eq!(skipped, 3);
        assert_eq!(bits.len(), 24);
        let (bytes, _) = decode_bytes("Zm9v");
        assert_eq!(bytes, b"foo");
    }
}
