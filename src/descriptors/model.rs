use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DescriptorError;

/// Prefix marking a grade-band that reuses another band's rubric.
pub const ALIAS_PREFIX: &str = "same_as_";

/// Prefix of the numbered grade-band scheme ("pei1" .. "pei5").
pub const NUMBERED_BAND_PREFIX: &str = "pei";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CriterionLetter {
    A,
    B,
    C,
    D,
}

impl CriterionLetter {
    pub const ALL: [CriterionLetter; 4] = [
        CriterionLetter::A,
        CriterionLetter::B,
        CriterionLetter::C,
        CriterionLetter::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionLetter::A => "A",
            CriterionLetter::B => "B",
            CriterionLetter::C => "C",
            CriterionLetter::D => "D",
        }
    }
}

impl fmt::Display for CriterionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriterionLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(CriterionLetter::A),
            "B" => Ok(CriterionLetter::B),
            "C" => Ok(CriterionLetter::C),
            "D" => Ok(CriterionLetter::D),
            _ => Err(format!("'{}' is not a criterion letter (expected A, B, C or D)", s)),
        }
    }
}

impl TryFrom<String> for CriterionLetter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CriterionLetter> for String {
    fn from(letter: CriterionLetter) -> Self {
        letter.as_str().to_string()
    }
}

/// Achievement band of a rubric ("0", "1-2", ... "7-8").
///
/// Ordering follows the numeric bounds, so a `BTreeMap` keyed by `LevelRange`
/// iterates from the null descriptor up to the most rigorous band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelRange {
    low: u8,
    high: u8,
}

impl LevelRange {
    pub const ZERO: LevelRange = LevelRange { low: 0, high: 0 };

    pub fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    pub fn low(&self) -> u8 {
        self.low
    }

    pub fn high(&self) -> u8 {
        self.high
    }

    pub fn is_zero(&self) -> bool {
        self.high == 0
    }
}

impl fmt::Display for LevelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

impl FromStr for LevelRange {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed =
            || DescriptorError::MalformedDescriptorData(format!("invalid level range '{}'", s));
        let parse_bound = |part: &str| part.trim().parse::<u8>().map_err(|_| malformed());

        let (low, high) = match s.split_once('-') {
            Some((low, high)) => (parse_bound(low)?, parse_bound(high)?),
            None => {
                let single = parse_bound(s)?;
                (single, single)
            }
        };

        if low > high {
            return Err(malformed());
        }
        Ok(LevelRange { low, high })
    }
}

impl TryFrom<String> for LevelRange {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LevelRange> for String {
    fn from(range: LevelRange) -> Self {
        range.to_string()
    }
}

/// One lettered criterion of a rubric: its title and the prose of each level range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionBlock {
    pub title: String,
    pub levels: BTreeMap<LevelRange, String>,
}

impl CriterionBlock {
    pub fn level(&self, label: &str) -> Option<&str> {
        let range = label.parse::<LevelRange>().ok()?;
        self.levels.get(&range).map(String::as_str)
    }

    pub fn null_descriptor(&self) -> Option<&str> {
        self.levels.get(&LevelRange::ZERO).map(String::as_str)
    }

    /// Non-zero level ranges in ascending rigor.
    pub fn graded_levels(&self) -> impl Iterator<Item = (&LevelRange, &str)> {
        self.levels
            .iter()
            .filter(|(range, _)| !range.is_zero())
            .map(|(range, text)| (range, text.as_str()))
    }

    pub fn highest_level(&self) -> Option<(&LevelRange, &str)> {
        self.graded_levels().last()
    }
}

/// Target of a `same_as_<band>` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BandAlias(String);

impl BandAlias {
    pub fn target(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BandAlias {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.strip_prefix(ALIAS_PREFIX) {
            Some(target) if !target.is_empty() => Ok(BandAlias(target.to_string())),
            _ => Err(format!("'{}' is not a band alias", value)),
        }
    }
}

impl From<BandAlias> for String {
    fn from(alias: BandAlias) -> Self {
        format!("{}{}", ALIAS_PREFIX, alias.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BandEntry {
    Alias(BandAlias),
    Criteria(BTreeMap<CriterionLetter, CriterionBlock>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDescriptors {
    pub bands: BTreeMap<String, BandEntry>,
    /// Named-scheme subjects map a grade digit to a band label.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub grade_bands: BTreeMap<u8, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorTable {
    pub subjects: BTreeMap<String, SubjectDescriptors>,
}
