//! Payload framing: the version header and the compression tag

use alloc::string::String;

use crate::bitstream::BitStream;
use crate::error::{Error, Result};
use crate::schema::{widths, RosterSchema, SingleSchema};
use crate::COMPRESSED_TAG;

/// Version header at the start of every bit-packed payload (8 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadHeader {
    /// Format version
    pub version: u8,
}

impl PayloadHeader {
    /// Header size in bits
    pub const BITS: usize = widths::VERSION as usize;

    /// Create a header for the given version
    #[inline]
    pub const fn new(version: u8) -> Self {
        Self { version }
    }

    /// Append the header to a fresh stream
    #[inline]
    pub fn encode(&self, bits: &mut BitStream) {
        debug_assert_eq!(bits.len(), 0, "header must open the payload");
        bits.write(self.version as u32, widths::VERSION);
    }

    /// Read the header, failing if the payload is shorter than one header
    #[inline]
    pub fn decode(bits: &mut BitStream) -> Result<Self> {
        if bits.remaining() < Self::BITS {
            return Err(Error::UnexpectedEof);
        }
        Ok(Self::new(bits.read(widths::VERSION) as u8))
    }

    /// Roster layout named by this header
    #[inline]
    pub fn roster_schema(&self) -> Result<RosterSchema> {
        RosterSchema::from_version(self.version).ok_or(Error::UnsupportedVersion {
            found: self.version,
        })
    }

    /// Single-export layout named by this header
    #[inline]
    pub fn single_schema(&self) -> Result<SingleSchema> {
        SingleSchema::from_version(self.version).ok_or(Error::UnsupportedVersion {
            found: self.version,
        })
    }
}

/// Whether the text after the optional tag is compressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// Base64 of the bit-packed payload
    Raw,
    /// Base64 of the compressed bytes of the raw payload
    Compressed,
}

impl FormatTag {
    /// Detect the tag and return the text behind it
    #[inline]
    pub fn split(text: &str) -> (Self, &str) {
        match text.strip_prefix(COMPRESSED_TAG) {
            Some(body) => (FormatTag::Compressed, body),
            None => (FormatTag::Raw, text),
        }
    }

    /// Prefix this tag onto a body
    pub fn apply(self, body: &str) -> String {
        match self {
            FormatTag::Raw => String::from(body),
            FormatTag::Compressed => {
                let mut out = String::with_capacity(body.len() + 1);
                out.push(COMPRESSED_TAG);
                out.push_str(body);
                out
            }
        }
    }
}
