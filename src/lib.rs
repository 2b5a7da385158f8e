//! umapack: compact, URL-safe sharing codec for uma roster records
//!
//! This crate packs roster records into a versioned bit layout, frames the
//! bits as Base64URL text and optionally compresses the result, so a whole
//! roster fits into a URL fragment.
//!
//! # Payload Format
//!
//! ```text
//! text    := ['z'] base64url
//!              'z' present => base64url holds compressed bytes of payload
//!
//! payload := version u8 | record | record | ...      (no count, no separator)
//!
//! record (roster v4):
//! +-----------+---------+-----------------+-----------+--------------+
//! | card 20   | talent 3| score? 1 (+15)  | stats 5x11| aptitude 10x3|
//! +-----------+---------+-----------------+-----------+--------------+
//! | factors 4 + n x 24  | skills 6 + n x (20 + 1)     | parents 2 + n x parent |
//! +---------------------+-----------------------------+------------------------+
//! parent := card 20 | talent 3 | factors 4 + n x 24
//! ```
//!
//! Decoding stops once fewer bits remain than the smallest possible record.
//! Single-record exports use their own, independently numbered layouts (see
//! [`single`]).
//!
//! # Features
//!
//! - MSB-first bit packing with clamped numeric fields and prefix-truncated lists
//! - Closed, per-version schema descriptors dispatched once on the header byte
//! - Pluggable compression: gzip (default), LZ4, or none
//! - Structured diagnostics through an injectable sink, `tracing` by default
//! - `no_std` support with `alloc`
//!
//! # Example
//!
//! ```rust
//! use umapack::{Codec, Skill, Stats, Uma};
//!
//! let roster = vec![Uma {
//!     card_id: 100_101,
//!     talent_level: 3,
//!     stats: Stats { speed: 1200, stamina: 800, power: 950, guts: 700, wiz: 600 },
//!     skills: vec![Skill::new(200_012, 1)],
//!     ..Uma::default()
//! }];
//!
//! let codec = Codec::new();
//! let text = codec.encode(&roster);
//! assert_eq!(codec.decode(&text), roster);
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod base64;
pub mod bitstream;
pub mod codec;
pub mod compression;
pub mod diagnostics;
pub mod error;
pub mod frame;
pub mod record;
pub mod roster;
pub mod schema;
pub mod single;

use alloc::string::String;
use alloc::vec::Vec;

// Re-export main types
pub use bitstream::BitStream;
pub use codec::{estimate_encoded_length, Codec, EncodeOptions};
pub use compression::{Compressor, DefaultCompressor, NoCompressor, MAX_INFLATED_LEN};
pub use diagnostics::{CodecEvent, CollectingDiagnostics, Diagnostics, NullDiagnostics, TracingDiagnostics};
pub use error::{Error, Result};
pub use record::{Aptitudes, Parent, Skill, Stats, Uma};
pub use schema::{Family, RosterSchema, SingleSchema};
pub use single::SingleExport;

#[cfg(feature = "gzip")]
pub use compression::Gzip;
#[cfg(feature = "lz4")]
pub use compression::Lz4;

/// Roster layout version written by the encoder
pub const ROSTER_VERSION: u8 = RosterSchema::CURRENT.version();

/// Single-export layout version written by the encoder
pub const SINGLE_EXPORT_VERSION: u8 = SingleSchema::CURRENT.version();

/// Reserved first character marking a compressed payload
pub const COMPRESSED_TAG: char = 'z';

/// Bits in the smallest roster record (no score, empty lists)
pub const MIN_RECORD_BITS: usize = RosterSchema::CURRENT.min_record_bits();

/// Encode a roster with the default codec
pub fn encode_roster(records: &[Uma]) -> String {
    Codec::new().encode(records)
}

/// Decode a roster with the default codec; empty on any failure
pub fn decode_roster(text: &str) -> Vec<Uma> {
    Codec::new().decode(text)
}

/// Encode a single export with the default codec
pub fn encode_single(export: &SingleExport) -> String {
    Codec::new().encode_single(export)
}

/// Decode a single export with the default codec; `None` on any failure
pub fn decode_single(text: &str) -> Option<SingleExport> {
    Codec::new().decode_single(text)
}
