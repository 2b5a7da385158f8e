//! Single-record export payloads
//!
//! A reduced, independently versioned layout for sharing one record without
//! roster context. Its version numbers mean nothing to the roster decoder and
//! vice versa.

use alloc::vec::Vec;

use crate::bitstream::BitStream;
use crate::error::{Error, Result};
use crate::frame::PayloadHeader;
use crate::record::{Aptitudes, Skill, Stats, Uma};
use crate::schema::{self, widths, SingleSchema};

/// One exported record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleExport {
    /// Card identifier
    pub card_id: u32,
    /// Trained stats
    pub stats: Stats,
    /// Aptitude grades
    pub aptitudes: Aptitudes,
    /// Creation time in Unix seconds; version 2 only
    ///
    /// Version 2 stores an absent time as 0, so 0 is reserved: `Some(0)`
    /// encodes exactly like `None` and decodes as `None`.
    pub create_time: Option<u32>,
    /// Evaluation score; version 2 only
    pub rank_score: Option<u16>,
    /// Learned skills with full levels
    pub skills: Vec<Skill>,
}

impl From<&Uma> for SingleExport {
    fn from(uma: &Uma) -> Self {
        Self {
            card_id: uma.card_id,
            stats: uma.stats,
            aptitudes: uma.aptitudes,
            create_time: uma.create_time,
            rank_score: uma.rank_score,
            skills: uma.skills.clone(),
        }
    }
}

impl SingleExport {
    /// Expand into a roster record; fields not exported take decode defaults
    pub fn into_uma(self) -> Uma {
        Uma {
            card_id: self.card_id,
            rank_score: self.rank_score,
            create_time: self.create_time,
            stats: self.stats,
            aptitudes: self.aptitudes,
            skills: self.skills,
            ..Uma::default()
        }
    }
}

/// Pack an export in the given layout, header included
pub fn encode(export: &SingleExport, layout: SingleSchema) -> BitStream {
    let skills = export.skills.len().min(schema::max_len(widths::SKILL_COUNT));
    let mut bits = BitStream::with_capacity(
        layout.min_bits() + skills * layout.skill_levels().entry_width() as usize + 16,
    );

    PayloadHeader::new(layout.version()).encode(&mut bits);
    bits.write(export.card_id, widths::CARD_ID);
    schema::write_stats(&mut bits, &export.stats);
    schema::write_aptitudes(&mut bits, &export.aptitudes, layout.aptitudes());
    if layout.has_provenance() {
        bits.write(export.create_time.unwrap_or(0), widths::CREATE_TIME);
        schema::write_rank_score(&mut bits, export.rank_score);
    }
    schema::write_skills(&mut bits, &export.skills, layout.skill_levels());
    bits
}

/// Unpack an export, header included
///
/// The payload must hold at least the smallest layout before the header is
/// even looked at. The skill list ends early when the payload runs out.
pub fn decode(bits: &mut BitStream) -> Result<(SingleSchema, SingleExport)> {
    if bits.remaining() < SingleSchema::V1.min_bits() {
        return Err(Error::UnexpectedEof);
    }
    let layout = PayloadHeader::decode(bits)?.single_schema()?;
    if bits.remaining() + PayloadHeader::BITS < layout.min_bits() {
        return Err(Error::UnexpectedEof);
    }

    let card_id = bits.read(widths::CARD_ID);
    let stats = schema::read_stats(bits);
    let aptitudes = schema::read_aptitudes(bits, layout.aptitudes());
    let (create_time, rank_score) = if layout.has_provenance() {
        let time = bits.read(widths::CREATE_TIME);
        (
            if time == 0 { None } else { Some(time) },
            schema::read_rank_score(bits),
        )
    } else {
        (None, None)
    };
    let skills = schema::read_skills(bits, layout.skill_levels(), true);

    Ok((
        layout,
        SingleExport {
            card_id,
            stats,
            aptitudes,
            create_time,
            rank_score,
            skills,
        },
    ))
}
