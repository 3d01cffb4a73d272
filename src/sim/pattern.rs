//! Row pattern library
//!
//! Hand-authored three-lane row templates, grouped by difficulty tier.
//! Patterns are written as three-letter codes: `Y` collectible (yarn),
//! `T` hazard (triangle), `X` empty.

use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// What occupies one lane of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Empty,
    Collectible,
    Hazard,
}

impl SlotKind {
    const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'X' => Some(SlotKind::Empty),
            b'Y' => Some(SlotKind::Collectible),
            b'T' => Some(SlotKind::Hazard),
            _ => None,
        }
    }

    fn code(self) -> char {
        match self {
            SlotKind::Empty => 'X',
            SlotKind::Collectible => 'Y',
            SlotKind::Hazard => 'T',
        }
    }
}

/// Difficulty tier, ordered easy < medium < hard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];
}

/// One slot kind per lane, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RowPattern(pub [SlotKind; 3]);

impl RowPattern {
    /// Build from a literal code, panicking at compile time on a typo
    const fn lit(code: &[u8; 3]) -> Self {
        const fn slot(c: u8) -> SlotKind {
            match SlotKind::from_code(c) {
                Some(kind) => kind,
                None => panic!("bad pattern code"),
            }
        }
        RowPattern([slot(code[0]), slot(code[1]), slot(code[2])])
    }

    pub fn parse(code: &str) -> Result<Self, PatternError> {
        let bad = || PatternError::BadCode {
            code: code.to_string(),
        };
        let bytes: &[u8; 3] = code.as_bytes().try_into().map_err(|_| bad())?;
        let mut slots = [SlotKind::Empty; 3];
        for (slot, &byte) in slots.iter_mut().zip(bytes) {
            *slot = SlotKind::from_code(byte.to_ascii_uppercase()).ok_or_else(bad)?;
        }
        Ok(RowPattern(slots))
    }

    pub fn slots(&self) -> &[SlotKind; 3] {
        &self.0
    }

    pub fn collectible_count(&self) -> usize {
        self.count(SlotKind::Collectible)
    }

    pub fn hazard_count(&self) -> usize {
        self.count(SlotKind::Hazard)
    }

    /// True if at least one lane is passable
    pub fn has_open_lane(&self) -> bool {
        self.hazard_count() < self.0.len()
    }

    fn count(&self, kind: SlotKind) -> usize {
        self.0.iter().filter(|&&s| s == kind).count()
    }

    pub fn code(&self) -> String {
        self.0.iter().map(|s| s.code()).collect()
    }
}

impl TryFrom<String> for RowPattern {
    type Error = PatternError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        RowPattern::parse(&code)
    }
}

impl From<RowPattern> for String {
    fn from(pattern: RowPattern) -> Self {
        pattern.code()
    }
}

const EASY: [RowPattern; 7] = [
    RowPattern::lit(b"YXY"),
    RowPattern::lit(b"YYX"),
    RowPattern::lit(b"XYY"),
    RowPattern::lit(b"XXX"),
    RowPattern::lit(b"YXX"),
    RowPattern::lit(b"XYX"),
    RowPattern::lit(b"YYY"),
];

const MEDIUM: [RowPattern; 9] = [
    RowPattern::lit(b"YTX"),
    RowPattern::lit(b"XTY"),
    RowPattern::lit(b"YXT"),
    RowPattern::lit(b"XYX"),
    RowPattern::lit(b"TXX"),
    RowPattern::lit(b"XXY"),
    RowPattern::lit(b"TXY"),
    RowPattern::lit(b"YYT"),
    RowPattern::lit(b"TYY"),
];

// Never author a TTT row: every row must leave a lane open.
const HARD: [RowPattern; 9] = [
    RowPattern::lit(b"TYT"),
    RowPattern::lit(b"XTX"),
    RowPattern::lit(b"TXT"),
    RowPattern::lit(b"TTX"),
    RowPattern::lit(b"XTT"),
    RowPattern::lit(b"TXY"),
    RowPattern::lit(b"YTT"),
    RowPattern::lit(b"YTY"),
    RowPattern::lit(b"XYX"),
];

/// Validated pattern lists for each tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPatternTable")]
pub struct PatternTable {
    easy: Vec<RowPattern>,
    medium: Vec<RowPattern>,
    hard: Vec<RowPattern>,
}

#[derive(Deserialize)]
struct RawPatternTable {
    easy: Vec<RowPattern>,
    medium: Vec<RowPattern>,
    hard: Vec<RowPattern>,
}

impl TryFrom<RawPatternTable> for PatternTable {
    type Error = PatternError;

    fn try_from(raw: RawPatternTable) -> Result<Self, Self::Error> {
        PatternTable::new(raw.easy, raw.medium, raw.hard)
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            easy: EASY.to_vec(),
            medium: MEDIUM.to_vec(),
            hard: HARD.to_vec(),
        }
    }
}

impl PatternTable {
    /// Build a table, rejecting empty tiers and rows that block all lanes
    pub fn new(
        easy: Vec<RowPattern>,
        medium: Vec<RowPattern>,
        hard: Vec<RowPattern>,
    ) -> Result<Self, PatternError> {
        let table = Self { easy, medium, hard };
        table.validate()?;
        Ok(table)
    }

    pub fn from_json(json: &str) -> Result<Self, PatternError> {
        serde_json::from_str(json).map_err(|e| PatternError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), PatternError> {
        for tier in Tier::ALL {
            let patterns = self.tier(tier);
            if patterns.is_empty() {
                return Err(PatternError::EmptyTier { tier });
            }
            if let Some(index) = patterns.iter().position(|p| !p.has_open_lane()) {
                return Err(PatternError::AllHazardRow { tier, index });
            }
        }
        Ok(())
    }

    pub fn tier(&self, tier: Tier) -> &[RowPattern] {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
        }
    }

    /// Most collectibles any single pattern in the tier offers
    pub fn max_collectibles(&self, tier: Tier) -> usize {
        self.tier(tier)
            .iter()
            .map(RowPattern::collectible_count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = PatternTable::default();
        assert!(table.validate().is_ok());
        for tier in Tier::ALL {
            assert!(table.tier(tier).iter().all(RowPattern::has_open_lane));
        }
        assert_eq!(table.max_collectibles(Tier::Easy), 3);
        assert_eq!(table.max_collectibles(Tier::Medium), 2);
        assert_eq!(table.max_collectibles(Tier::Hard), 2);
    }

    #[test]
    fn test_parse_codes() {
        let p = RowPattern::parse("ytx").unwrap();
        assert_eq!(
            p.slots(),
            &[SlotKind::Collectible, SlotKind::Hazard, SlotKind::Empty]
        );
        assert_eq!(p.code(), "YTX");
        assert_eq!(p.collectible_count(), 1);
        assert_eq!(p.hazard_count(), 1);

        assert!(RowPattern::parse("YT").is_err());
        assert!(RowPattern::parse("YTZ").is_err());
        assert!(RowPattern::parse("YTXX").is_err());
    }

    #[test]
    fn test_all_hazard_row_rejected_on_load() {
        let ttt = RowPattern::parse("TTT").unwrap();
        let err = PatternTable::new(EASY.to_vec(), vec![MEDIUM[0], ttt], HARD.to_vec());
        assert_eq!(
            err,
            Err(PatternError::AllHazardRow {
                tier: Tier::Medium,
                index: 1
            })
        );
    }

    #[test]
    fn test_empty_tier_rejected() {
        let err = PatternTable::new(EASY.to_vec(), MEDIUM.to_vec(), Vec::new());
        assert_eq!(err, Err(PatternError::EmptyTier { tier: Tier::Hard }));
    }

    #[test]
    fn test_json_table_is_validated() {
        let json = r#"{ "easy": ["YYY"], "medium": ["YTX"], "hard": ["TYT"] }"#;
        let table = PatternTable::from_json(json).unwrap();
        assert_eq!(table.tier(Tier::Easy), &[RowPattern::parse("YYY").unwrap()]);

        let json = r#"{ "easy": ["YYY"], "medium": ["YTX"], "hard": ["TTT"] }"#;
        assert!(matches!(
            PatternTable::from_json(json),
            Err(PatternError::Parse(_))
        ));
    }
}
