//! Basic usage example for umapack
//!
//! Run with: cargo run --example basic_usage
//! Set `RUST_LOG=umapack=debug` to see the codec's diagnostics.

use tracing_subscriber::EnvFilter;
use umapack::*;

fn sample_roster() -> Vec<Uma> {
    (0..6u32)
        .map(|i| Uma {
            card_id: 100_101 + i * 100,
            talent_level: 3 + (i % 3) as u8,
            rank_score: Some(11_000 + i as u16 * 350),
            stats: Stats {
                speed: 1200,
                stamina: 800 + i as u16 * 10,
                power: 950,
                guts: 700,
                wiz: 600,
            },
            aptitudes: Aptitudes::uniform(7),
            factor_ids: vec![101, 2_102, 3_201_003, 10_110_101],
            skills: vec![Skill::new(200_012, 1), Skill::new(100_051, 4)],
            parents: vec![
                Parent {
                    position_id: 1,
                    card_id: 100_201,
                    talent_level: 4,
                    factor_ids: vec![301, 1_101],
                    win_saddle_ids: Vec::new(),
                },
                Parent {
                    position_id: 2,
                    card_id: 100_301,
                    talent_level: 2,
                    factor_ids: vec![201],
                    win_saddle_ids: Vec::new(),
                },
            ],
            ..Uma::default()
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("umapack=info")),
        )
        .init();

    println!("umapack Basic Usage Example");
    println!("===========================");

    // Example 1: Roster link
    println!("\n1. Roster Link:");
    let roster = sample_roster();
    let codec = Codec::new();
    {
        let raw = codec.encode_with(&roster, EncodeOptions::raw());
        let text = codec.encode(&roster);
        println!("  {} records", roster.len());
        println!("  Raw:        {} chars", raw.len());
        println!(
            "  Negotiated: {} chars (compressed: {})",
            text.len(),
            text.starts_with(COMPRESSED_TAG)
        );
        println!("  Estimated raw length: {}", estimate_encoded_length(&roster));

        let decoded = codec.try_decode(&text)?;
        println!("  Decoded {} records, first card {}", decoded.len(), decoded[0].card_id);
        println!(
            "  Skill levels after the roster layout: {:?}",
            decoded[0].skills.iter().map(|s| s.level).collect::<Vec<_>>()
        );
    }

    // Example 2: Single export
    println!("\n2. Single Export:");
    {
        let export = SingleExport {
            create_time: Some(1_717_171_717),
            ..SingleExport::from(&roster[0])
        };
        let text = codec.encode_single(&export);
        println!("  Encoded: {}", text);

        let decoded = codec.try_decode_single(&text)?;
        println!(
            "  Decoded card {} with skill levels {:?}",
            decoded.card_id,
            decoded.skills.iter().map(|s| s.level).collect::<Vec<_>>()
        );

        let legacy = codec.encode_single_as(&export, SingleSchema::V1);
        println!("  Version 1 form: {} chars", legacy.len());
    }

    // Example 3: Bad input degrades to nothing
    println!("\n3. Untrusted Input:");
    {
        for text in ["", "AAAA", "z____", "not a link!"] {
            match codec.try_decode(text) {
                Ok(records) => println!("  {:?}: {} records", text, records.len()),
                Err(e) => println!("  {:?}: rejected ({})", text, e),
            }
        }
    }

    // Example 4: Size per record
    println!("\n4. Record Size Analysis:");
    {
        for uma in roster.iter().take(3) {
            println!(
                "  card {}: {} bits",
                uma.card_id,
                umapack::roster::encoded_bits(uma)
            );
        }
        println!("  Empty record: {} bits", MIN_RECORD_BITS);
    }

    Ok(())
}
