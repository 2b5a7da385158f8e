//! Encode and decode entry points
//!
//! [`Codec`] wires the record layouts, Base64 framing and compression
//! negotiation together around an injected [`Compressor`] and
//! [`Diagnostics`] sink. The `try_*` methods expose why a payload was
//! rejected; the others report the failure to the sink and return an empty
//! result, which is what callers handling untrusted URL fragments want.

use alloc::string::String;
use alloc::vec::Vec;

use crate::base64;
use crate::compression::{self, Compressor, DefaultCompressor};
use crate::diagnostics::{CodecEvent, Diagnostics, TracingDiagnostics};
use crate::error::Result;
use crate::frame::PayloadHeader;
use crate::record::Uma;
use crate::roster;
use crate::schema::{Family, RosterSchema, SingleSchema};
use crate::single::{self, SingleExport};

/// Per-call encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Try compression and keep it when shorter
    pub compress: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl EncodeOptions {
    /// Options that never compress
    #[inline]
    pub const fn raw() -> Self {
        Self { compress: false }
    }
}

/// Roster and single-export codec
#[derive(Debug, Clone)]
pub struct Codec<C = DefaultCompressor, D = TracingDiagnostics> {
    compressor: C,
    diagnostics: D,
}

impl Codec {
    /// Codec with the default compressor, reporting to `tracing`
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Default, D: Default> Default for Codec<C, D> {
    fn default() -> Self {
        Self {
            compressor: C::default(),
            diagnostics: D::default(),
        }
    }
}

impl<C: Compressor, D: Diagnostics> Codec<C, D> {
    /// Swap the compressor
    pub fn with_compressor<C2: Compressor>(self, compressor: C2) -> Codec<C2, D> {
        Codec {
            compressor,
            diagnostics: self.diagnostics,
        }
    }

    /// Swap the diagnostics sink
    pub fn with_diagnostics<D2: Diagnostics>(self, diagnostics: D2) -> Codec<C, D2> {
        Codec {
            compressor: self.compressor,
            diagnostics,
        }
    }

    /// Compressor in use
    #[inline]
    pub fn compressor(&self) -> &C {
        &self.compressor
    }

    /// Diagnostics sink in use
    #[inline]
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Encode a roster, compressing when that is shorter
    pub fn encode(&self, records: &[Uma]) -> String {
        self.encode_with(records, EncodeOptions::default())
    }

    /// Encode a roster with explicit options
    pub fn encode_with(&self, records: &[Uma], options: EncodeOptions) -> String {
        let layout = RosterSchema::CURRENT;
        let payload = roster::encode_payload(records, layout);
        self.diagnostics.record(&CodecEvent::Encoded {
            family: Family::Roster,
            version: layout.version(),
            records: records.len(),
            bits: payload.len(),
        });
        compression::negotiate(
            &payload,
            options.compress,
            &self.compressor,
            &self.diagnostics,
        )
    }

    /// Decode a roster, reporting why it failed
    pub fn try_decode(&self, text: &str) -> Result<Vec<Uma>> {
        let (mut bits, skipped) = compression::restore(text, &self.compressor)?;
        self.report_skipped(skipped);

        let (layout, records) = roster::decode_payload(&mut bits)?;
        self.diagnostics.record(&CodecEvent::Decoded {
            family: Family::Roster,
            version: layout.version(),
            records: records.len(),
            trailing_bits: bits.remaining(),
        });
        Ok(records)
    }

    /// Decode a roster; any failure yields no records
    pub fn decode(&self, text: &str) -> Vec<Uma> {
        self.try_decode(text).unwrap_or_else(|error| {
            self.diagnostics.record(&CodecEvent::DecodeFailed {
                family: Family::Roster,
                error,
            });
            Vec::new()
        })
    }

    /// Encode one record in the current single-export layout
    pub fn encode_single(&self, export: &SingleExport) -> String {
        self.encode_single_as(export, SingleSchema::CURRENT)
    }

    /// Encode one record in a specific single-export layout
    ///
    /// Single exports are short and always left uncompressed.
    pub fn encode_single_as(&self, export: &SingleExport, layout: SingleSchema) -> String {
        let payload = single::encode(export, layout);
        self.diagnostics.record(&CodecEvent::Encoded {
            family: Family::SingleExport,
            version: layout.version(),
            records: 1,
            bits: payload.len(),
        });
        payload.to_base64()
    }

    /// Decode a single export, reporting why it failed
    pub fn try_decode_single(&self, text: &str) -> Result<SingleExport> {
        let (mut bits, skipped) = base64::decode_lenient(text);
        self.report_skipped(skipped);

        let (layout, export) = single::decode(&mut bits)?;
        self.diagnostics.record(&CodecEvent::Decoded {
            family: Family::SingleExport,
            version: layout.version(),
            records: 1,
            trailing_bits: bits.remaining(),
        });
        Ok(export)
    }

    /// Decode a single export; any failure yields `None`
    pub fn decode_single(&self, text: &str) -> Option<SingleExport> {
        match self.try_decode_single(text) {
            Ok(export) => Some(export),
            Err(error) => {
                self.diagnostics.record(&CodecEvent::DecodeFailed {
                    family: Family::SingleExport,
                    error,
                });
                None
            }
        }
    }

    fn report_skipped(&self, count: usize) {
        if count > 0 {
            self.diagnostics.record(&CodecEvent::CharactersSkipped { count });
        }
    }
}

/// Exact length of the uncompressed roster text for `records`
pub fn estimate_encoded_length(records: &[Uma]) -> usize {
    let body: usize = records.iter().map(roster::encoded_bits).sum();
    (PayloadHeader::BITS + body).div_ceil(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::NoCompressor;
    use crate::diagnostics::{CollectingDiagnostics, SkipReason};
    use crate::error::Error;
    use crate::record::{Aptitudes, Skill, Stats};
    use alloc::vec;

    fn collecting() -> Codec<NoCompressor, CollectingDiagnostics> {
        Codec::default()
    }

    fn trainee(card_id: u32) -> Uma {
        Uma {
            card_id,
            talent_level: 4,
            rank_score: Some(12_000),
            stats: Stats {
                speed: 1100,
                stamina: 700,
                power: 900,
                guts: 400,
                wiz: 500,
            },
            aptitudes: Aptitudes::uniform(7),
            factor_ids: vec![101, 202, 303],
            skills: vec![Skill::new(200_331, 1), Skill::new(200_332, 2)],
            ..Uma::default()
        }
    }

    #[test]
    fn test_roster_roundtrip_reports_events() {
        let codec = collecting();
        let records = vec![trainee(100_101), trainee(100_201)];
        let text = codec.encode(&records);
        assert_eq!(codec.decode(&text), records);

        let events = codec.diagnostics().take();
        assert!(matches!(
            events[0],
            CodecEvent::Encoded {
                family: Family::Roster,
                version: 4,
                records: 2,
                ..
            }
        ));
        assert_eq!(
            events[1],
            CodecEvent::CompressionSkipped {
                reason: SkipReason::Unavailable
            }
        );
        assert!(matches!(events[2], CodecEvent::Decoded { records: 2, .. }));
    }

    #[test]
    fn test_length_estimate_is_exact() {
        let codec = collecting();
        let records = vec![trainee(1), trainee(2), Uma::default()];
        assert_eq!(
            estimate_encoded_length(&records),
            codec.encode_with(&records, EncodeOptions::raw()).len()
        );
        assert_eq!(estimate_encoded_length(&[]), 2);
    }

    #[test]
    fn test_decode_failure_is_empty() {
        let codec = collecting();
        assert!(codec.decode("").is_empty());
        assert!(codec.decode("zAAAA").is_empty());
        assert_eq!(codec.try_decode("A"), Err(Error::UnexpectedEof));
        assert_eq!(codec.try_decode("zAAAA"), Err(Error::CompressionUnavailable));

        let events = codec.diagnostics().take();
        assert_eq!(
            events,
            vec![
                CodecEvent::DecodeFailed {
                    family: Family::Roster,
                    error: Error::UnexpectedEof,
                },
                CodecEvent::DecodeFailed {
                    family: Family::Roster,
                    error: Error::CompressionUnavailable,
                },
            ]
        );
    }

    #[test]
    fn test_skipped_characters_reported() {
        let codec = collecting();
        let text = codec.encode(&[trainee(7)]);
        let noisy = alloc::format!("{}\n{}", &text[..4], &text[4..]);
        assert_eq!(codec.decode(&noisy), vec![trainee(7)]);
        assert!(codec
            .diagnostics()
            .events()
            .contains(&CodecEvent::CharactersSkipped { count: 1 }));
    }

    #[test]
    fn test_single_export_roundtrip() {
        let codec = collecting();
        let export = SingleExport {
            create_time: Some(1_700_000_000),
            ..SingleExport::from(&trainee(100_101))
        };

        let text = codec.encode_single(&export);
        assert!(text.starts_with('A'));
        assert_eq!(codec.decode_single(&text), Some(export.clone()));

        let v1 = codec.encode_single_as(&export, SingleSchema::V1);
        let decoded = codec.decode_single(&v1).unwrap();
        assert_eq!(decoded.create_time, None);
        assert_eq!(decoded.skills, export.skills);
    }

    #[test]
    fn test_families_do_not_cross() {
        let codec = collecting();
        let roster = codec.encode(&[trainee(1)]);
        assert_eq!(
            codec.try_decode_single(&roster),
            Err(Error::UnsupportedVersion { found: 4 })
        );
        assert_eq!(codec.decode_single(&roster), None);

        let single = codec.encode_single(&SingleExport::from(&trainee(1)));
        assert_eq!(
            codec.try_decode(&single),
            Err(Error::UnsupportedVersion { found: 2 })
        );
    }

    #[test]
    fn test_swapping_parts() {
        let sink = CollectingDiagnostics::new();
        let codec = Codec::new()
            .with_compressor(NoCompressor)
            .with_diagnostics(&sink);
        codec.encode(&[]);
        assert_eq!(sink.events().len(), 2);
        assert!(!codec.compressor().is_available());
    }
}
