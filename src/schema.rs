//! Schema descriptors and the field helpers shared by every layout
//!
//! Each format family is a closed enum with one variant per version number.
//! The header byte is matched against it exactly once; everything after that
//! asks the variant for its widths and transforms, so two versions can never
//! silently share a bit-width decision.

use alloc::vec::Vec;

use crate::bitstream::BitStream;
use crate::record::{Aptitudes, Skill, Stats};

/// Field widths in bits
pub mod widths {
    /// Format version header
    pub const VERSION: u32 = 8;
    /// Card identifier
    pub const CARD_ID: u32 = 20;
    /// Talent level (1..=5 stored as 0..=4)
    pub const TALENT_LEVEL: u32 = 3;
    /// Optional evaluation score
    pub const RANK_SCORE: u32 = 15;
    /// One stat
    pub const STAT: u32 = 11;
    /// Factor list length
    pub const FACTOR_COUNT: u32 = 4;
    /// Factor identifier
    pub const FACTOR_ID: u32 = 24;
    /// Skill list length
    pub const SKILL_COUNT: u32 = 6;
    /// Skill identifier
    pub const SKILL_ID: u32 = 20;
    /// Parent list length
    pub const PARENT_COUNT: u32 = 2;
    /// Creation time in Unix seconds
    pub const CREATE_TIME: u32 = 32;
}

/// Largest value a field of `width` bits holds
#[inline]
pub const fn max_value(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Longest list a count field of `width` bits can describe
#[inline]
pub const fn max_len(count_width: u32) -> usize {
    max_value(count_width) as usize
}

/// Highest stat value on the wire
pub const MAX_STAT: u16 = max_value(widths::STAT) as u16;

/// Highest evaluation score on the wire
pub const MAX_RANK_SCORE: u16 = max_value(widths::RANK_SCORE) as u16;

/// Format families sharing the header width but nothing else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Multi-record roster payloads
    Roster,
    /// Single-record export payloads
    SingleExport,
}

/// How aptitude grades are packed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AptitudeEncoding {
    /// 3 bits, grade 1..=8 stored as 0..=7
    Offset3,
    /// 4 bits, grade 0..=9 stored as is
    Raw4,
}

impl AptitudeEncoding {
    /// Bits per grade
    #[inline]
    pub const fn width(self) -> u32 {
        match self {
            AptitudeEncoding::Offset3 => 3,
            AptitudeEncoding::Raw4 => 4,
        }
    }

    /// Clamp a grade into range and map it to its stored value
    #[inline]
    pub fn pack(self, grade: u8) -> u32 {
        match self {
            AptitudeEncoding::Offset3 => grade.clamp(1, 8) as u32 - 1,
            AptitudeEncoding::Raw4 => grade.min(9) as u32,
        }
    }

    /// Map a stored value back to a grade
    #[inline]
    pub fn unpack(self, raw: u32) -> u8 {
        match self {
            AptitudeEncoding::Offset3 => raw as u8 + 1,
            AptitudeEncoding::Raw4 => raw as u8,
        }
    }
}

/// How skill levels are packed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillLevelEncoding {
    /// 1 bit: whether the level is above 1; decodes to 1 or 2
    Flag,
    /// 4 bits, level 1..=16 stored as 0..=15
    Full4,
}

impl SkillLevelEncoding {
    /// Bits per level
    #[inline]
    pub const fn width(self) -> u32 {
        match self {
            SkillLevelEncoding::Flag => 1,
            SkillLevelEncoding::Full4 => 4,
        }
    }

    /// Bits per skill entry, identifier included
    #[inline]
    pub const fn entry_width(self) -> u32 {
        widths::SKILL_ID + self.width()
    }

    /// Clamp a level into range and map it to its stored value
    #[inline]
    pub fn pack(self, level: u8) -> u32 {
        match self {
            SkillLevelEncoding::Flag => (level > 1) as u32,
            SkillLevelEncoding::Full4 => (level.max(1) as u32 - 1).min(15),
        }
    }

    /// Map a stored value back to a level
    #[inline]
    pub fn unpack(self, raw: u32) -> u8 {
        raw as u8 + 1
    }
}

/// Roster layouts, one variant per version number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterSchema {
    /// Version 4: 20-bit skill ids, optional rank score, flag skill levels
    V4,
}

impl RosterSchema {
    /// Layout written by the encoder
    pub const CURRENT: Self = RosterSchema::V4;

    /// Look up the layout for a header byte
    #[inline]
    pub const fn from_version(version: u8) -> Option<Self> {
        match version {
            4 => Some(RosterSchema::V4),
            _ => None,
        }
    }

    /// Header byte for this layout
    #[inline]
    pub const fn version(self) -> u8 {
        match self {
            RosterSchema::V4 => 4,
        }
    }

    /// Aptitude packing
    #[inline]
    pub const fn aptitudes(self) -> AptitudeEncoding {
        match self {
            RosterSchema::V4 => AptitudeEncoding::Offset3,
        }
    }

    /// Skill level packing
    #[inline]
    pub const fn skill_levels(self) -> SkillLevelEncoding {
        match self {
            RosterSchema::V4 => SkillLevelEncoding::Flag,
        }
    }

    /// Bits taken by a record with no score and empty lists
    #[inline]
    pub const fn min_record_bits(self) -> usize {
        (widths::CARD_ID
            + widths::TALENT_LEVEL
            + 1
            + 5 * widths::STAT
            + 10 * self.aptitudes().width()
            + widths::FACTOR_COUNT
            + widths::SKILL_COUNT
            + widths::PARENT_COUNT) as usize
    }
}

/// Single-record export layouts, one variant per version number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleSchema {
    /// Version 1: 3-bit aptitudes, no timestamp or score
    V1,
    /// Version 2: 4-bit aptitudes, timestamp and optional score
    V2,
}

impl SingleSchema {
    /// Layout written by the encoder unless asked otherwise
    pub const CURRENT: Self = SingleSchema::V2;

    /// Look up the layout for a header byte
    #[inline]
    pub const fn from_version(version: u8) -> Option<Self> {
        match version {
            1 => Some(SingleSchema::V1),
            2 => Some(SingleSchema::V2),
            _ => None,
        }
    }

    /// Header byte for this layout
    #[inline]
    pub const fn version(self) -> u8 {
        match self {
            SingleSchema::V1 => 1,
            SingleSchema::V2 => 2,
        }
    }

    /// Aptitude packing
    #[inline]
    pub const fn aptitudes(self) -> AptitudeEncoding {
        match self {
            SingleSchema::V1 => AptitudeEncoding::Offset3,
            SingleSchema::V2 => AptitudeEncoding::Raw4,
        }
    }

    /// Skill level packing
    #[inline]
    pub const fn skill_levels(self) -> SkillLevelEncoding {
        SkillLevelEncoding::Full4
    }

    /// Whether the layout carries a creation timestamp and optional score
    #[inline]
    pub const fn has_provenance(self) -> bool {
        matches!(self, SingleSchema::V2)
    }

    /// Bits required before the skill list, header included
    #[inline]
    pub const fn min_bits(self) -> usize {
        let provenance = if self.has_provenance() {
            widths::CREATE_TIME + 1
        } else {
            0
        };
        (widths::VERSION
            + widths::CARD_ID
            + 5 * widths::STAT
            + 10 * self.aptitudes().width()
            + provenance
            + widths::SKILL_COUNT) as usize
    }
}

// ---------------------------------------------------------------------------
// Field helpers

#[inline]
pub(crate) fn write_talent(bits: &mut BitStream, level: u8) {
    bits.write(level.clamp(1, 8) as u32 - 1, widths::TALENT_LEVEL);
}

#[inline]
pub(crate) fn read_talent(bits: &mut BitStream) -> u8 {
    bits.read(widths::TALENT_LEVEL) as u8 + 1
}

pub(crate) fn write_stats(bits: &mut BitStream, stats: &Stats) {
    for stat in stats.to_array() {
        bits.write(stat.min(MAX_STAT) as u32, widths::STAT);
    }
}

pub(crate) fn read_stats(bits: &mut BitStream) -> Stats {
    let mut values = [0u16; 5];
    for v in values.iter_mut() {
        *v = bits.read(widths::STAT) as u16;
    }
    Stats::from_array(values)
}

pub(crate) fn write_aptitudes(bits: &mut BitStream, apt: &Aptitudes, enc: AptitudeEncoding) {
    for grade in apt.to_array() {
        bits.write(enc.pack(grade), enc.width());
    }
}

pub(crate) fn read_aptitudes(bits: &mut BitStream, enc: AptitudeEncoding) -> Aptitudes {
    let mut grades = [0u8; 10];
    for g in grades.iter_mut() {
        *g = enc.unpack(bits.read(enc.width()));
    }
    Aptitudes::from_array(grades)
}

/// Presence flag, then the clamped score only when present
pub(crate) fn write_rank_score(bits: &mut BitStream, score: Option<u16>) {
    match score {
        Some(score) => {
            bits.write_flag(true);
            bits.write(score.min(MAX_RANK_SCORE) as u32, widths::RANK_SCORE);
        }
        None => bits.write_flag(false),
    }
}

pub(crate) fn read_rank_score(bits: &mut BitStream) -> Option<u16> {
    if bits.read_flag() {
        Some(bits.read(widths::RANK_SCORE) as u16)
    } else {
        None
    }
}

/// Count field followed by ids; ids past the count's maximum are dropped
pub(crate) fn write_ids(bits: &mut BitStream, ids: &[u32], count_width: u32, id_width: u32) {
    let kept = &ids[..ids.len().min(max_len(count_width))];
    bits.write(kept.len() as u32, count_width);
    for &id in kept {
        bits.write(id, id_width);
    }
}

pub(crate) fn read_ids(bits: &mut BitStream, count_width: u32, id_width: u32) -> Vec<u32> {
    let count = bits.read(count_width) as usize;
    (0..count).map(|_| bits.read(id_width)).collect()
}

/// Count field followed by skill entries; entries past the maximum are dropped
pub(crate) fn write_skills(bits: &mut BitStream, skills: &[Skill], enc: SkillLevelEncoding) {
    let kept = &skills[..skills.len().min(max_len(widths::SKILL_COUNT))];
    bits.write(kept.len() as u32, widths::SKILL_COUNT);
    for skill in kept {
        bits.write(skill.skill_id, widths::SKILL_ID);
        bits.write(enc.pack(skill.level), enc.width());
    }
}

/// Read a skill list
///
/// With `stop_when_short`, the list ends early once a whole entry no longer
/// fits in the remaining bits; otherwise missing bits read as zero.
pub(crate) fn read_skills(
    bits: &mut BitStream,
    enc: SkillLevelEncoding,
    stop_when_short: bool,
) -> Vec<Skill> {
    let count = bits.read(widths::SKILL_COUNT) as usize;
    let mut skills = Vec::with_capacity(count);
    for _ in 0..count {
        if stop_when_short && bits.remaining() < enc.entry_width() as usize {
            break;
        }
        let skill_id = bits.read(widths::SKILL_ID);
        let level = enc.unpack(bits.read(enc.width()));
        skills.push(Skill::new(skill_id, level));
    }
    skills
}
