//! Whole-payload compression and its negotiation
//!
//! Compression runs over the bytes behind the Base64 text, after bit packing,
//! and is kept only when the re-encoded text comes out strictly shorter. The
//! choice is recorded with the single reserved tag character. Compression can
//! never make encoding fail: any problem falls back to the raw text.
//!
//! Decompression is bounded by [`MAX_INFLATED_LEN`]; tagged links come from
//! untrusted input and a few kilobytes of gzip can expand to gigabytes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::base64;
use crate::bitstream::BitStream;
use crate::diagnostics::{CodecEvent, Diagnostics, SkipReason};
use crate::error::{Error, Result};
use crate::frame::FormatTag;

/// Largest payload, in bytes, a compressed link may inflate to
pub const MAX_INFLATED_LEN: usize = 1 << 20;

/// Synchronous lossless byte transform
///
/// `decompress` must not produce more than [`MAX_INFLATED_LEN`] bytes; the
/// provided compressors fail with [`Error::DecompressedTooLarge`] instead.
pub trait Compressor {
    /// Whether this compressor can run at all
    fn is_available(&self) -> bool {
        true
    }

    /// Compress a byte string
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Reverse [`Compressor::compress`]
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

impl<C: Compressor + ?Sized> Compressor for &C {
    #[inline]
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    #[inline]
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).compress(data)
    }

    #[inline]
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).decompress(data)
    }
}

/// Stand-in for builds without a compressor
///
/// Encoding always keeps the raw text; tagged payloads cannot be decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompressor;

impl Compressor for NoCompressor {
    #[inline]
    fn is_available(&self) -> bool {
        false
    }

    fn compress(&self, _data: &[u8]) -> Result<Vec<u8>> {
        Err(Error::CompressionUnavailable)
    }

    fn decompress(&self, _data: &[u8]) -> Result<Vec<u8>> {
        Err(Error::CompressionUnavailable)
    }
}

/// Gzip members, the format links from the web viewer use
#[cfg(feature = "gzip")]
#[derive(Debug, Clone, Copy)]
pub struct Gzip {
    level: u32,
}

#[cfg(feature = "gzip")]
impl Default for Gzip {
    fn default() -> Self {
        Self { level: 9 }
    }
}

#[cfg(feature = "gzip")]
impl Gzip {
    /// Gzip at a given level, 0 (store) to 9 (smallest)
    pub fn with_level(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }
}

#[cfg(feature = "gzip")]
impl Compressor for Gzip {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(
            Vec::with_capacity(data.len() / 2 + 32),
            Compression::new(self.level),
        );
        encoder
            .write_all(data)
            .map_err(|_| Error::CompressionFailed)?;
        encoder.finish().map_err(|_| Error::CompressionFailed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let mut out = Vec::with_capacity(data.len().saturating_mul(3).min(MAX_INFLATED_LEN));
        GzDecoder::new(data)
            .take(MAX_INFLATED_LEN as u64 + 1)
            .read_to_end(&mut out)
            .map_err(|_| Error::DecompressionFailed)?;
        if out.len() > MAX_INFLATED_LEN {
            return Err(Error::DecompressedTooLarge);
        }
        Ok(out)
    }
}

/// LZ4 block with the uncompressed size prepended
#[cfg(feature = "lz4")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4;

#[cfg(feature = "lz4")]
impl Compressor for Lz4 {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(lz4_flex::compress_prepend_size(data))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        // little-endian u32 size prefix written by compress_prepend_size
        let declared = match data {
            [a, b, c, d, ..] => u32::from_le_bytes([*a, *b, *c, *d]) as usize,
            _ => return Err(Error::DecompressionFailed),
        };
        if declared > MAX_INFLATED_LEN {
            return Err(Error::DecompressedTooLarge);
        }
        lz4_flex::decompress_size_prepended(data).map_err(|_| Error::DecompressionFailed)
    }
}

/// Compressor used when none is injected
#[cfg(feature = "gzip")]
pub type DefaultCompressor = Gzip;

/// Compressor used when none is injected
#[cfg(not(feature = "gzip"))]
pub type DefaultCompressor = NoCompressor;

/// Render a packed payload, compressed and tagged when that is shorter
pub fn negotiate<C, D>(payload: &BitStream, compress: bool, compressor: &C, diagnostics: &D) -> String
where
    C: Compressor + ?Sized,
    D: Diagnostics + ?Sized,
{
    let raw = payload.to_base64();

    if !compress {
        diagnostics.record(&CodecEvent::CompressionSkipped {
            reason: SkipReason::Disabled,
        });
        return raw;
    }
    if !compressor.is_available() {
        diagnostics.record(&CodecEvent::CompressionSkipped {
            reason: SkipReason::Unavailable,
        });
        return raw;
    }

    match compressor.compress(&payload.to_bytes()) {
        Ok(bytes) => {
            let packed = base64::encode_bytes(&bytes);
            let used = packed.len() < raw.len();
            diagnostics.record(&CodecEvent::CompressionEvaluated {
                raw_len: raw.len(),
                compressed_len: packed.len(),
                used,
            });
            if used {
                FormatTag::Compressed.apply(&packed)
            } else {
                raw
            }
        }
        Err(error) => {
            diagnostics.record(&CodecEvent::CompressionFailed { error });
            raw
        }
    }
}

/// Turn encoded text back into the packed payload
///
/// Returns the payload bits and how many characters outside the alphabet
/// were skipped on the way.
pub fn restore<C>(text: &str, compressor: &C) -> Result<(BitStream, usize)>
where
    C: Compressor + ?Sized,
{
    match FormatTag::split(text) {
        (FormatTag::Raw, body) => Ok(base64::decode_lenient(body)),
        (FormatTag::Compressed, body) => {
            if !compressor.is_available() {
                return Err(Error::CompressionUnavailable);
            }
            let (bytes, skipped) = base64::decode_bytes(body);
            let raw = compressor.decompress(&bytes)?;
            if raw.len() > MAX_INFLATED_LEN {
                return Err(Error::DecompressedTooLarge);
            }
            Ok((BitStream::from_bytes(&raw), skipped))
        }
    }
}
