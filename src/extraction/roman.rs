use std::{cmp::Ordering, fmt};

use serde::{Serialize, Serializer};

/// Integer value of a lower- or upper-case roman numeral made of `i`, `v` and `x`.
///
/// Only canonical spellings are accepted: "iiv" or "vx" are rejected rather
/// than ranked alongside "v".
pub fn roman_rank(numeral: &str) -> Option<u32> {
    if numeral.is_empty() {
        return None;
    }

    let values = numeral
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            'i' => Some(1),
            'v' => Some(5),
            'x' => Some(10),
            _ => None,
        })
        .collect::<Option<Vec<u32>>>()?;

    let mut total = 0;
    for (idx, value) in values.iter().enumerate() {
        match values.get(idx + 1) {
            Some(next) if value < next => total -= *value as i64,
            _ => total += *value as i64,
        }
    }

    let rank = u32::try_from(total).ok().filter(|rank| *rank > 0)?;
    canonical_numeral(rank)
        .filter(|canonical| canonical.eq_ignore_ascii_case(numeral))
        .map(|_| rank)
}

/// Standard lower-case spelling of `rank`, for values `i`, `v` and `x` can express.
fn canonical_numeral(rank: u32) -> Option<String> {
    if rank == 0 || rank >= 40 {
        return None;
    }
    const ONES: [&str; 10] = ["", "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix"];
    let mut text = "x".repeat((rank / 10) as usize);
    text.push_str(ONES[(rank % 10) as usize]);
    Some(text)
}

/// Sorts numeral strings by their integer value; anything unparsable goes last.
pub fn sort_numerals<S: AsRef<str>>(numerals: &mut [S]) {
    numerals.sort_by_key(|numeral| roman_rank(numeral.as_ref()).unwrap_or(u32::MAX));
}

/// Lower-cased roman numeral indexing a sub-criterion.
///
/// Orders by integer value so "iv" < "v" < "ix", which plain string
/// comparison gets wrong.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RomanNumeral {
    text: String,
    rank: u32,
}

impl RomanNumeral {
    pub fn parse(numeral: &str) -> Option<Self> {
        let rank = roman_rank(numeral)?;
        Some(Self {
            text: numeral.to_ascii_lowercase(),
            rank,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }
}

impl Ord for RomanNumeral {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for RomanNumeral {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RomanNumeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for RomanNumeral {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
