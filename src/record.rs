//! Roster record types
//!
//! These are plain values handed to and returned by the codec. Identifier
//! fields (`card_id`, factor ids, skill ids, saddle ids) are opaque keys into
//! game data tables owned by the caller.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rarity assigned to decoded records, which do not carry one on the wire
pub const DEFAULT_RARITY: u8 = 3;

/// The five trained stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stats {
    /// Speed
    pub speed: u16,
    /// Stamina
    pub stamina: u16,
    /// Power
    pub power: u16,
    /// Guts
    pub guts: u16,
    /// Wisdom
    pub wiz: u16,
}

impl Stats {
    /// Stats in wire order
    #[inline]
    pub const fn to_array(&self) -> [u16; 5] {
        [self.speed, self.stamina, self.power, self.guts, self.wiz]
    }

    /// Build from values in wire order
    #[inline]
    pub const fn from_array(v: [u16; 5]) -> Self {
        Self {
            speed: v[0],
            stamina: v[1],
            power: v[2],
            guts: v[3],
            wiz: v[4],
        }
    }
}

/// Distance, surface and running-style aptitude grades
///
/// Grades run 1 (G) to 8 (S) in game data; the single-export V2 layout also
/// admits 0 and 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aptitudes {
    /// Short distance
    pub distance_short: u8,
    /// Mile distance
    pub distance_mile: u8,
    /// Middle distance
    pub distance_middle: u8,
    /// Long distance
    pub distance_long: u8,
    /// Turf surface
    pub ground_turf: u8,
    /// Dirt surface
    pub ground_dirt: u8,
    /// Front runner
    pub style_nige: u8,
    /// Pace chaser
    pub style_senko: u8,
    /// Late surger
    pub style_sashi: u8,
    /// End closer
    pub style_oikomi: u8,
}

impl Default for Aptitudes {
    fn default() -> Self {
        Self::uniform(1)
    }
}

impl Aptitudes {
    /// Every aptitude at the same grade
    #[inline]
    pub const fn uniform(grade: u8) -> Self {
        Self::from_array([grade; 10])
    }

    /// Grades in wire order
    #[inline]
    pub const fn to_array(&self) -> [u8; 10] {
        [
            self.distance_short,
            self.distance_mile,
            self.distance_middle,
            self.distance_long,
            self.ground_turf,
            self.ground_dirt,
            self.style_nige,
            self.style_senko,
            self.style_sashi,
            self.style_oikomi,
        ]
    }

    /// Build from grades in wire order
    #[inline]
    pub const fn from_array(v: [u8; 10]) -> Self {
        Self {
            distance_short: v[0],
            distance_mile: v[1],
            distance_middle: v[2],
            distance_long: v[3],
            ground_turf: v[4],
            ground_dirt: v[5],
            style_nige: v[6],
            style_senko: v[7],
            style_sashi: v[8],
            style_oikomi: v[9],
        }
    }
}

/// A learned skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Skill {
    /// Skill identifier
    pub skill_id: u32,
    /// Skill level, starting at 1
    pub level: u8,
}

impl Skill {
    /// Create a skill entry
    #[inline]
    pub const fn new(skill_id: u32, level: u8) -> Self {
        Self { skill_id, level }
    }
}

/// A parent in a record's lineage; parents never carry parents of their own
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parent {
    /// Slot in the lineage, 1-based; not on the wire, decoded from order
    pub position_id: u8,
    /// Card identifier
    pub card_id: u32,
    /// Talent level 1..=5
    pub talent_level: u8,
    /// Inheritable factor identifiers
    pub factor_ids: Vec<u32>,
    /// Race-win identifiers filled in by the caller; not on the wire
    pub win_saddle_ids: Vec<u32>,
}

/// One roster entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Uma {
    /// Card identifier
    pub card_id: u32,
    /// Talent level 1..=5
    pub talent_level: u8,
    /// Evaluation score, if known
    pub rank_score: Option<u16>,
    /// Creation time in Unix seconds, if known
    pub create_time: Option<u32>,
    /// Card rarity; not on the wire
    pub rarity: u8,
    /// Trainee seed; not on the wire
    pub chara_seed: Option<u32>,
    /// Trained stats
    pub stats: Stats,
    /// Aptitude grades
    pub aptitudes: Aptitudes,
    /// Inheritable factor identifiers
    pub factor_ids: Vec<u32>,
    /// Learned skills
    pub skills: Vec<Skill>,
    /// Lineage
    pub parents: Vec<Parent>,
    /// Race-win identifiers filled in by the caller; not on the wire
    pub win_saddle_ids: Vec<u32>,
}

impl Default for Uma {
    fn default() -> Self {
        Self {
            card_id: 0,
            talent_level: 1,
            rank_score: None,
            create_time: None,
            rarity: DEFAULT_RARITY,
            chara_seed: None,
            stats: Stats::default(),
            aptitudes: Aptitudes::default(),
            factor_ids: Vec::new(),
            skills: Vec::new(),
            parents: Vec::new(),
            win_saddle_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_wire_order() {
        let stats = Stats {
            speed: 1,
            stamina: 2,
            power: 3,
            guts: 4,
            wiz: 5,
        };
        assert_eq!(stats.to_array(), [1, 2, 3, 4, 5]);
        assert_eq!(Stats::from_array(stats.to_array()), stats);
    }

    #[test]
    fn test_aptitudes_wire_order() {
        let grades = [1, 2, 3, 4, 5, 6, 7, 8, 1, 2];
        let apt = Aptitudes::from_array(grades);
        assert_eq!(apt.distance_short, 1);
        assert_eq!(apt.ground_turf, 5);
        assert_eq!(apt.style_oikomi, 2);
        assert_eq!(apt.to_array(), grades);
    }

    #[test]
    fn test_default_record() {
        let uma = Uma::default();
        assert_eq!(uma.talent_level, 1);
        assert_eq!(uma.rarity, DEFAULT_RARITY);
        assert_eq!(uma.aptitudes, Aptitudes::uniform(1));
    }
}
