//! Multi-record roster payloads
//!
//! A roster payload is the version header followed by records packed back to
//! back. There is no record count: decoding continues while at least one
//! minimal record still fits, and whatever is left after that is padding.

use alloc::vec::Vec;

use crate::bitstream::BitStream;
use crate::error::Result;
use crate::frame::PayloadHeader;
use crate::record::{Parent, Uma, DEFAULT_RARITY};
use crate::schema::{self, max_len, widths, RosterSchema};

/// Parent slots a record can carry
pub const MAX_PARENTS: usize = max_len(widths::PARENT_COUNT);

/// Append one record
pub fn encode_record(bits: &mut BitStream, uma: &Uma, layout: RosterSchema) {
    bits.write(uma.card_id, widths::CARD_ID);
    schema::write_talent(bits, uma.talent_level);
    schema::write_rank_score(bits, uma.rank_score);
    schema::write_stats(bits, &uma.stats);
    schema::write_aptitudes(bits, &uma.aptitudes, layout.aptitudes());
    schema::write_ids(bits, &uma.factor_ids, widths::FACTOR_COUNT, widths::FACTOR_ID);
    schema::write_skills(bits, &uma.skills, layout.skill_levels());

    let parents = &uma.parents[..uma.parents.len().min(MAX_PARENTS)];
    bits.write(parents.len() as u32, widths::PARENT_COUNT);
    for parent in parents {
        encode_parent(bits, parent);
    }
}

fn encode_parent(bits: &mut BitStream, parent: &Parent) {
    bits.write(parent.card_id, widths::CARD_ID);
    schema::write_talent(bits, parent.talent_level);
    schema::write_ids(
        bits,
        &parent.factor_ids,
        widths::FACTOR_COUNT,
        widths::FACTOR_ID,
    );
}

/// Consume one record
///
/// Fields that are not on the wire come back with their decode defaults.
pub fn decode_record(bits: &mut BitStream, layout: RosterSchema) -> Uma {
    let card_id = bits.read(widths::CARD_ID);
    let talent_level = schema::read_talent(bits);
    let rank_score = schema::read_rank_score(bits);
    let stats = schema::read_stats(bits);
    let aptitudes = schema::read_aptitudes(bits, layout.aptitudes());
    let factor_ids = schema::read_ids(bits, widths::FACTOR_COUNT, widths::FACTOR_ID);
    let skills = schema::read_skills(bits, layout.skill_levels(), false);

    let parent_count = bits.read(widths::PARENT_COUNT) as usize;
    let parents = (0..parent_count)
        .map(|i| decode_parent(bits, i as u8 + 1))
        .collect();

    Uma {
        card_id,
        talent_level,
        rank_score,
        create_time: None,
        rarity: DEFAULT_RARITY,
        chara_seed: None,
        stats,
        aptitudes,
        factor_ids,
        skills,
        parents,
        win_saddle_ids: Vec::new(),
    }
}

fn decode_parent(bits: &mut BitStream, position_id: u8) -> Parent {
    Parent {
        position_id,
        card_id: bits.read(widths::CARD_ID),
        talent_level: schema::read_talent(bits),
        factor_ids: schema::read_ids(bits, widths::FACTOR_COUNT, widths::FACTOR_ID),
        win_saddle_ids: Vec::new(),
    }
}

/// Header plus every record, ready for Base64 framing
pub fn encode_payload(records: &[Uma], layout: RosterSchema) -> BitStream {
    let body: usize = records.iter().map(|r| record_bits(r, layout)).sum();
    let mut bits = BitStream::with_capacity(PayloadHeader::BITS + body);
    PayloadHeader::new(layout.version()).encode(&mut bits);
    for uma in records {
        encode_record(&mut bits, uma, layout);
    }
    bits
}

/// Read the header and every complete record
///
/// Fails on a truncated header or an unknown version; never fails once the
/// layout is known. Bits left unread afterwards are padding.
pub fn decode_payload(bits: &mut BitStream) -> Result<(RosterSchema, Vec<Uma>)> {
    let layout = PayloadHeader::decode(bits)?.roster_schema()?;
    let min = layout.min_record_bits();

    let mut records = Vec::with_capacity(bits.remaining() / min);
    while bits.remaining() >= min {
        records.push(decode_record(bits, layout));
    }
    Ok((layout, records))
}

/// Exact size of one record in the current layout, in bits
pub fn encoded_bits(uma: &Uma) -> usize {
    record_bits(uma, RosterSchema::CURRENT)
}

fn record_bits(uma: &Uma, layout: RosterSchema) -> usize {
    let factor_bits =
        |ids: &[u32]| ids.len().min(max_len(widths::FACTOR_COUNT)) * widths::FACTOR_ID as usize;

    let score = if uma.rank_score.is_some() {
        widths::RANK_SCORE as usize
    } else {
        0
    };
    let skills = uma.skills.len().min(max_len(widths::SKILL_COUNT))
        * layout.skill_levels().entry_width() as usize;
    let parents: usize = uma
        .parents
        .iter()
        .take(MAX_PARENTS)
        .map(|p| {
            (widths::CARD_ID + widths::TALENT_LEVEL + widths::FACTOR_COUNT) as usize
                + factor_bits(&p.factor_ids)
        })
        .sum();

    layout.min_record_bits() + score + factor_bits(&uma.factor_ids) + skills + parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::record::{Aptitudes, Skill, Stats};
    use alloc::vec;

    fn scenario() -> Uma {
        Uma {
            card_id: 12345,
            talent_level: 3,
            stats: Stats {
                speed: 1200,
                stamina: 800,
                power: 950,
                guts: 700,
                wiz: 600,
            },
            aptitudes: Aptitudes::uniform(5),
            factor_ids: vec![100, 250],
            skills: vec![Skill::new(900, 3)],
            parents: vec![Parent {
                position_id: 1,
                card_id: 777,
                talent_level: 2,
                factor_ids: vec![50],
                win_saddle_ids: Vec::new(),
            }],
            ..Uma::default()
        }
    }

    fn roundtrip(records: &[Uma]) -> Vec<Uma> {
        let mut bits = encode_payload(records, RosterSchema::CURRENT);
        decode_payload(&mut bits).unwrap().1
    }

    #[test]
    fn test_scenario_record() {
        let decoded = roundtrip(&[scenario()]);
        assert_eq!(decoded.len(), 1);

        let uma = &decoded[0];
        assert_eq!(uma.card_id, 12345);
        assert_eq!(uma.talent_level, 3);
        assert_eq!(uma.rank_score, None);
        assert_eq!(uma.stats, scenario().stats);
        assert_eq!(uma.aptitudes, Aptitudes::uniform(5));
        assert_eq!(uma.factor_ids, vec![100, 250]);
        assert_eq!(uma.skills, vec![Skill::new(900, 2)]);
        assert_eq!(uma.parents.len(), 1);
        assert_eq!(uma.parents[0].card_id, 777);
        assert_eq!(uma.parents[0].talent_level, 2);
        assert_eq!(uma.parents[0].factor_ids, vec![50]);
        assert_eq!(uma.parents[0].position_id, 1);
    }

    #[test]
    fn test_record_size() {
        let uma = scenario();
        // 121 + 2 factors + 1 skill + parent with one factor
        assert_eq!(encoded_bits(&uma), 121 + 48 + 21 + (27 + 24));

        let mut bits = BitStream::new();
        encode_record(&mut bits, &uma, RosterSchema::V4);
        assert_eq!(bits.len(), encoded_bits(&uma));

        let empty = Uma::default();
        assert_eq!(encoded_bits(&empty), 121);
    }

    #[test]
    fn test_size_counts_truncation() {
        let uma = Uma {
            rank_score: Some(5000),
            factor_ids: (0..20).collect(),
            skills: (0..70).map(|i| Skill::new(i, 1)).collect(),
            parents: vec![Parent::default(); 5],
            ..Uma::default()
        };
        let mut bits = BitStream::new();
        encode_record(&mut bits, &uma, RosterSchema::V4);
        assert_eq!(bits.len(), encoded_bits(&uma));

        let decoded = decode_record(&mut bits, RosterSchema::V4);
        assert_eq!(decoded.factor_ids.len(), 15);
        assert_eq!(decoded.skills.len(), 63);
        assert_eq!(decoded.parents.len(), 3);
        assert_eq!(decoded.rank_score, Some(5000));
        assert_eq!(bits.remaining(), 0);
    }

    #[test]
    fn test_decode_defaults() {
        let uma = Uma {
            rarity: 5,
            chara_seed: Some(42),
            create_time: Some(1_700_000_000),
            win_saddle_ids: vec![1, 2, 3],
            parents: vec![Parent {
                position_id: 9,
                win_saddle_ids: vec![4],
                ..Parent::default()
            }],
            ..scenario()
        };
        let decoded = &roundtrip(&[uma])[0];
        assert_eq!(decoded.rarity, DEFAULT_RARITY);
        assert_eq!(decoded.chara_seed, None);
        assert_eq!(decoded.create_time, None);
        assert!(decoded.win_saddle_ids.is_empty());
        assert_eq!(decoded.parents[0].position_id, 1);
        assert!(decoded.parents[0].win_saddle_ids.is_empty());
    }

    #[test]
    fn test_trailing_bits_are_padding() {
        let mut bits = encode_payload(&[scenario(), Uma::default()], RosterSchema::V4);
        for _ in 0..4 {
            bits.write(0, 30);
        }
        let (layout, records) = decode_payload(&mut bits).unwrap();
        assert_eq!(layout, RosterSchema::V4);
        assert_eq!(records.len(), 2);
        assert_eq!(bits.remaining(), 120);
    }

    #[test]
    fn test_header_only_payload() {
        let mut bits = encode_payload(&[], RosterSchema::V4);
        assert_eq!(bits.len(), 8);
        assert_eq!(bits.to_base64(), "BA");
        assert!(decode_payload(&mut bits).unwrap().1.is_empty());
    }

    #[test]
    fn test_version_gate() {
        let mut bits = BitStream::new();
        bits.write(3, widths::VERSION);
        encode_record(&mut bits, &scenario(), RosterSchema::V4);
        assert_eq!(
            decode_payload(&mut bits).unwrap_err(),
            Error::UnsupportedVersion { found: 3 }
        );

        let mut short = BitStream::new();
        short.write(4, 5);
        assert_eq!(decode_payload(&mut short).unwrap_err(), Error::UnexpectedEof);
    }
}
