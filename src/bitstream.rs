//! MSB-first bit buffer with a forward-only read cursor
//!
//! Every payload is built by appending fixed-width fields to a [`BitStream`]
//! and read back by consuming them in the same order. Reads past the end are
//! lenient: missing bits count as zero and the cursor parks at the end, so
//! record loops can probe [`BitStream::remaining`] instead of validating the
//! total length up front.

use alloc::string::String;
use alloc::vec::Vec;

use crate::base64;

/// Widest field a single `write` or `read` call handles
pub const MAX_FIELD_BITS: u32 = 32;

/// Append-only bit sequence plus a read cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    len: usize,
    pos: usize,
}

impl BitStream {
    /// Create an empty stream
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `bits` bits
    #[inline]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
            pos: 0,
        }
    }

    /// Wrap whole bytes, eight bits per byte, MSB first
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            len: bytes.len() * 8,
            pos: 0,
        }
    }

    /// Decode Base64URL text, skipping characters outside the alphabet
    ///
    /// See [`base64::decode_lenient`] to also learn how many were skipped.
    pub fn from_base64(text: &str) -> Self {
        base64::decode_lenient(text).0
    }

    /// Total number of bits written
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read position in bits
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits still available to read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len - self.pos
    }

    /// Append a single bit
    #[inline]
    pub fn push_bit(&mut self, bit: bool) {
        let byte_idx = self.len / 8;
        if byte_idx == self.bytes.len() {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[byte_idx] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Append the low `width` bits of `value`, most significant bit first
    ///
    /// Bits of `value` above `width` are dropped; callers clamp beforehand.
    #[inline]
    pub fn write(&mut self, value: u32, width: u32) {
        debug_assert!(width <= MAX_FIELD_BITS, "field wider than 32 bits");
        for i in (0..width.min(MAX_FIELD_BITS)).rev() {
            self.push_bit((value >> i) & 1 != 0);
        }
    }

    /// Append a single flag bit
    #[inline]
    pub fn write_flag(&mut self, flag: bool) {
        self.push_bit(flag);
    }

    #[inline]
    fn bit_at(&self, idx: usize) -> bool {
        self.bytes[idx / 8] & (0x80 >> (idx % 8)) != 0
    }

    /// Consume the next bit, zero once the stream is exhausted
    #[inline]
    pub fn read_bit(&mut self) -> bool {
        if self.pos >= self.len {
            return false;
        }
        let bit = self.bit_at(self.pos);
        self.pos += 1;
        bit
    }

    /// Consume `width` bits as an unsigned integer, MSB first
    #[inline]
    pub fn read(&mut self, width: u32) -> u32 {
        debug_assert!(width <= MAX_FIELD_BITS, "field wider than 32 bits");
        let mut value = 0u32;
        for _ in 0..width.min(MAX_FIELD_BITS) {
            value = (value << 1) | self.read_bit() as u32;
        }
        value
    }

    /// Consume a single flag bit
    #[inline]
    pub fn read_flag(&mut self) -> bool {
        self.read_bit()
    }

    /// Consume `width` bits as an `width`-bit two's complement integer
    #[inline]
    pub fn read_signed(&mut self, width: u32) -> i32 {
        let raw = self.read(width);
        match width {
            0 => 0,
            w if w >= MAX_FIELD_BITS => raw as i32,
            w => {
                let sign = 1u32 << (w - 1);
                if raw & sign != 0 {
                    (raw as i64 - (1i64 << w)) as i32
                } else {
                    raw as i32
                }
            }
        }
    }

    /// Bytes holding every written bit; the last byte is zero padded
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Render the whole stream as Base64URL text
    ///
    /// The bit count is padded with zero bits to a multiple of six on the
    /// rendered copy only; the stream itself is left untouched.
    pub fn to_base64(&self) -> String {
        let mut out = String::with_capacity(self.len.div_ceil(6));
        let mut idx = 0;
        while idx < self.len {
            let mut sextet = 0u8;
            for offset in 0..6 {
                let bit = idx + offset < self.len && self.bit_at(idx + offset);
                sextet = (sextet << 1) | bit as u8;
            }
            out.push(base64::symbol(sextet));
            idx += 6;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_write_read_msb_first() {
        let mut bits = BitStream::new();
        bits.write(0b101, 3);
        bits.write(0xABCDE, 20);
        bits.write_flag(true);

        assert_eq!(bits.len(), 24);
        assert_eq!(bits.to_bytes(), vec![0b1011_0101, 0b0111_1001, 0b1011_1101]);

        assert_eq!(bits.read(3), 0b101);
        assert_eq!(bits.read(20), 0xABCDE);
        assert!(bits.read_flag());
        assert_eq!(bits.remaining(), 0);
    }

    #[test]
    fn test_write_masks_wide_values() {
        let mut bits = BitStream::new();
        bits.write(0b1111_0110, 4);
        assert_eq!(bits.read(4), 0b0110);
    }

    #[test]
    fn test_read_past_end_is_zero_filled() {
        let mut bits = BitStream::new();
        bits.write(0b11, 2);

        assert_eq!(bits.read(4), 0b1100);
        assert_eq!(bits.remaining(), 0);
        assert_eq!(bits.position(), 2);
        assert_eq!(bits.read(8), 0);
        assert_eq!(bits.position(), 2);
    }

    #[test]
    fn test_read_signed() {
        let mut bits = BitStream::new();
        bits.write(0b1111, 4);
        bits.write(0b0111, 4);
        bits.write(0b1000, 4);
        bits.write(u32::MAX, 32);

        assert_eq!(bits.read_signed(4), -1);
        assert_eq!(bits.read_signed(4), 7);
        assert_eq!(bits.read_signed(4), -8);
        assert_eq!(bits.read_signed(32), -1);
        assert_eq!(bits.read_signed(0), 0);
    }

    #[test]
    fn test_full_width_fields() {
        let mut bits = BitStream::new();
        bits.write(u32::MAX, 32);
        bits.write(1_700_000_000, 32);
        assert_eq!(bits.read(32), u32::MAX);
        assert_eq!(bits.read(32), 1_700_000_000);
    }

    #[test]
    fn test_base64_padding_does_not_mutate() {
        let mut bits = BitStream::new();
        bits.write(4, 8);

        // 8 bits pad to 12: 000001 00|0000
        assert_eq!(bits.to_base64(), "BA");
        assert_eq!(bits.len(), 8);
        assert_eq!(bits.to_base64(), "BA");
    }

    #[test]
    fn test_base64_roundtrip_keeps_bits() {
        let mut bits = BitStream::new();
        bits.write(0x3F, 6);
        bits.write(0, 6);
        bits.write(0x2A, 6);

        let text = bits.to_base64();
        assert_eq!(text, "_Aq");

        let mut back = BitStream::from_base64(&text);
        assert_eq!(back.len(), 18);
        assert_eq!(back.read(6), 0x3F);
        assert_eq!(back.read(6), 0);
        assert_eq!(back.read(6), 0x2A);
    }

    #[test]
    fn test_from_bytes() {
        let mut bits = BitStream::from_bytes(&[0x80, 0x01]);
        assert_eq!(bits.len(), 16);
        assert!(bits.read_flag());
        assert_eq!(bits.read(15), 1);
    }

    #[test]
    fn test_empty_stream() {
        let bits = BitStream::new();
        assert!(bits.is_empty());
        assert_eq!(bits.to_base64(), "");
        assert!(bits.to_bytes().is_empty());
    }
}
