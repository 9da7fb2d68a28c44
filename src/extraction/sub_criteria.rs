use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{descriptors::CriterionBlock, extraction::roman::RomanNumeral};

/// Numbered clauses of a rubric, iterated in numeral order.
pub type SubCriteria = BTreeMap<RomanNumeral, String>;

// A numeral glued to the end of a word ("aussi.") is not a marker.
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([ivx]+)\.").expect("MARKER is a valid regex pattern"));

const CLAUSE_PUNCTUATION: [char; 4] = ['.', ';', ',', ':'];

/// Splits one level-range string into its numbered clauses.
///
/// A clause runs from its `<numeral>.` marker to the first semicolon or the
/// next marker. Text without markers yields an empty map.
pub fn extract_sub_criteria(text: &str) -> SubCriteria {
    let markers: Vec<(RomanNumeral, usize, usize)> = MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let numeral = RomanNumeral::parse(caps.get(1)?.as_str())?;
            Some((numeral, whole.start(), whole.end()))
        })
        .collect();

    let mut sub_criteria = SubCriteria::new();
    for (idx, (numeral, _, clause_start)) in markers.iter().enumerate() {
        let clause_end = markers
            .get(idx + 1)
            .map_or(text.len(), |(_, next_start, _)| *next_start);

        let clause = text[*clause_start..clause_end]
            .split(';')
            .next()
            .unwrap_or_default();
        let clause = clean_clause(clause);

        if !clause.is_empty() {
            sub_criteria.insert(numeral.clone(), clause.to_string());
        }
    }

    sub_criteria
}

/// Merges the clauses of every graded level range of `block`.
///
/// Ranges are visited in ascending rigor and later ranges overwrite earlier
/// ones, so each numeral keeps the wording of the highest range that states it.
pub fn get_all_sub_criteria(block: &CriterionBlock) -> SubCriteria {
    let mut all = SubCriteria::new();
    for (_, text) in block.graded_levels() {
        all.extend(extract_sub_criteria(text));
    }
    all
}

/// "i. clause" lines, or a placeholder sentence when nothing was extracted.
pub fn format_sub_criteria(sub_criteria: &SubCriteria) -> String {
    if sub_criteria.is_empty() {
        return "Aucun sous-critère spécifique défini.".to_string();
    }

    sub_criteria
        .iter()
        .map(|(numeral, clause)| format!("{}. {}", numeral, clause))
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_clause(clause: &str) -> &str {
    clause.trim_matches(|c: char| c.is_whitespace() || CLAUSE_PUNCTUATION.contains(&c))
}
