use std::{collections::BTreeMap, fs, path::Path};

use crate::{
    descriptors::model::{
        BandEntry, CriterionBlock, CriterionLetter, DescriptorTable, SubjectDescriptors,
        NUMBERED_BAND_PREFIX,
    },
    errors::DescriptorError,
};

const EMBEDDED_DESCRIPTORS: &str = include_str!("../../assets/descriptors.json");

type Criteria = BTreeMap<CriterionLetter, CriterionBlock>;

/// Read-only rubric table.
///
/// Built once at startup and shared behind an `Arc`; every lookup goes through
/// the resolution functions so subject normalization, grade banding and alias
/// indirection are applied the same way for every caller.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    table: DescriptorTable,
}

/// A concrete (non-alias) criterion block together with its coordinates.
#[derive(Debug, Clone, Copy)]
pub struct BlockRef<'a> {
    pub subject: &'a str,
    pub band: &'a str,
    pub letter: CriterionLetter,
    pub block: &'a CriterionBlock,
}

impl DescriptorStore {
    pub fn from_table(table: DescriptorTable) -> Result<Self, DescriptorError> {
        validate(&table)?;
        Ok(Self { table })
    }

    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        let table: DescriptorTable = serde_json::from_str(json)
            .map_err(|e| DescriptorError::MalformedDescriptorData(e.to_string()))?;
        Self::from_table(table)
    }

    /// The rubric corpus compiled into the binary.
    pub fn embedded() -> Result<Self, DescriptorError> {
        Self::from_json(EMBEDDED_DESCRIPTORS)
    }

    /// Loads from `path` when given, otherwise falls back to the embedded corpus.
    pub fn load(path: Option<&Path>) -> Result<Self, DescriptorError> {
        match path {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|e| {
                    DescriptorError::MalformedDescriptorData(format!(
                        "cannot read {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_json(&json)
            }
            None => Self::embedded(),
        }
    }

    pub fn subject_keys(&self) -> Vec<String> {
        self.table.subjects.keys().cloned().collect()
    }

    /// Finds the table key for a free-text subject name.
    ///
    /// Candidates are tried in the order produced by [`subject_key_variants`].
    pub fn normalize_subject_key(&self, subject: &str) -> Result<&str, DescriptorError> {
        self.subject(subject).map(|(key, _)| key)
    }

    pub fn resolve_grade_band(
        &self,
        subject: &str,
        grade_label: &str,
    ) -> Result<String, DescriptorError> {
        let (_, descriptors) = self.subject(subject)?;
        Ok(band_for_grade(descriptors, grade_label))
    }

    pub fn resolve_criterion_block(
        &self,
        subject: &str,
        grade_label: &str,
        letter: CriterionLetter,
    ) -> Result<&CriterionBlock, DescriptorError> {
        let (key, descriptors) = self.subject(subject)?;
        let band = band_for_grade(descriptors, grade_label);
        let criteria = band_criteria(key, descriptors, &band)?;

        criteria
            .get(&letter)
            .ok_or_else(|| DescriptorError::CriterionNotFound {
                subject: key.to_string(),
                band,
                letter: letter.to_string(),
            })
    }

    /// Every concrete criterion block in the table; alias bands are skipped.
    pub fn blocks(&self) -> impl Iterator<Item = BlockRef<'_>> {
        self.table.subjects.iter().flat_map(|(subject, descriptors)| {
            descriptors
                .bands
                .iter()
                .filter_map(|(band, entry)| match entry {
                    BandEntry::Criteria(criteria) => Some((band, criteria)),
                    BandEntry::Alias(_) => None,
                })
                .flat_map(move |(band, criteria)| {
                    criteria.iter().map(move |(letter, block)| BlockRef {
                        subject: subject.as_str(),
                        band: band.as_str(),
                        letter: *letter,
                        block,
                    })
                })
        })
    }

    fn subject(&self, subject: &str) -> Result<(&str, &SubjectDescriptors), DescriptorError> {
        let attempted = subject_key_variants(subject);
        let found = attempted
            .iter()
            .find_map(|candidate| self.table.subjects.get_key_value(candidate.as_str()));

        match found {
            Some((key, descriptors)) => Ok((key.as_str(), descriptors)),
            None => Err(DescriptorError::SubjectNotFound {
                subject: subject.to_string(),
                attempted,
            }),
        }
    }
}

/// Lookup candidates for a subject name, in precedence order and without duplicates:
/// exact, lower-cased, lower-cased with spaces as underscores, lower-cased with
/// spaces as hyphens, then the trimmed original casing.
pub fn subject_key_variants(subject: &str) -> Vec<String> {
    let trimmed = subject.trim();
    let lower = trimmed.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    let candidates = [
        subject.to_string(),
        words.join(" "),
        words.join("_"),
        words.join("-"),
        trimmed.to_string(),
    ];

    let mut variants: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// "PEI 3" -> "pei3"
pub fn normalize_grade_label(grade_label: &str) -> String {
    grade_label
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn band_for_grade(descriptors: &SubjectDescriptors, grade_label: &str) -> String {
    let normalized = normalize_grade_label(grade_label);

    let named = descriptors
        .grade_bands
        .iter()
        .find(|(grade, _)| normalized.contains(&grade.to_string()));
    if let Some((_, band)) = named {
        return band.clone();
    }

    if normalized.starts_with(NUMBERED_BAND_PREFIX) {
        normalized
    } else {
        format!("{}{}", NUMBERED_BAND_PREFIX, normalized)
    }
}

/// Criteria of `band`, following at most one alias hop.
fn band_criteria<'a>(
    subject: &str,
    descriptors: &'a SubjectDescriptors,
    band: &str,
) -> Result<&'a Criteria, DescriptorError> {
    let not_found = |band: &str| DescriptorError::GradeBandNotFound {
        subject: subject.to_string(),
        band: band.to_string(),
    };

    match descriptors.bands.get(band) {
        Some(BandEntry::Criteria(criteria)) => Ok(criteria),
        Some(BandEntry::Alias(alias)) => match descriptors.bands.get(alias.target()) {
            Some(BandEntry::Criteria(criteria)) => Ok(criteria),
            _ => Err(not_found(alias.target())),
        },
        None => Err(not_found(band)),
    }
}

fn validate(table: &DescriptorTable) -> Result<(), DescriptorError> {
    let malformed = DescriptorError::MalformedDescriptorData;

    if table.subjects.is_empty() {
        return Err(malformed("descriptor table has no subjects".to_string()));
    }

    for (subject, descriptors) in &table.subjects {
        if descriptors.bands.is_empty() {
            return Err(malformed(format!("subject '{}' has no grade bands", subject)));
        }

        for (band, entry) in &descriptors.bands {
            match entry {
                BandEntry::Criteria(criteria) => {
                    if criteria.is_empty() {
                        return Err(malformed(format!(
                            "band '{}' of '{}' has no criteria",
                            band, subject
                        )));
                    }
                    for (letter, block) in criteria {
                        validate_block(subject, band, *letter, block)?;
                    }
                }
                BandEntry::Alias(alias) => match descriptors.bands.get(alias.target()) {
                    Some(BandEntry::Criteria(_)) => {}
                    Some(BandEntry::Alias(_)) => {
                        return Err(malformed(format!(
                            "band '{}' of '{}' aliases '{}', which is itself an alias",
                            band,
                            subject,
                            alias.target()
                        )));
                    }
                    None => {
                        return Err(malformed(format!(
                            "band '{}' of '{}' aliases missing band '{}'",
                            band,
                            subject,
                            alias.target()
                        )));
                    }
                },
            }
        }

        for (grade, band) in &descriptors.grade_bands {
            if !descriptors.bands.contains_key(band) {
                return Err(malformed(format!(
                    "grade {} of '{}' maps to missing band '{}'",
                    grade, subject, band
                )));
            }
        }
    }

    Ok(())
}

fn validate_block(
    subject: &str,
    band: &str,
    letter: CriterionLetter,
    block: &CriterionBlock,
) -> Result<(), DescriptorError> {
    let location = format!("{} / {} / {}", subject, band, letter);

    if block.title.trim().is_empty() {
        return Err(DescriptorError::MalformedDescriptorData(format!(
            "{} has an empty title",
            location
        )));
    }
    if block.null_descriptor().is_none() {
        return Err(DescriptorError::MalformedDescriptorData(format!(
            "{} is missing the \"0\" level range",
            location
        )));
    }
    if block.graded_levels().next().is_none() {
        return Err(DescriptorError::MalformedDescriptorData(format!(
            "{} has no graded level range",
            location
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{sample_descriptor_json, sample_store};

    #[test]
    fn subject_variants_follow_precedence() {
        assert_eq!(
            subject_key_variants("Langue et Littérature"),
            vec![
                "Langue et Littérature",
                "langue et littérature",
                "langue_et_littérature",
                "langue-et-littérature",
            ]
        );
        assert_eq!(subject_key_variants("design"), vec!["design"]);
        assert_eq!(subject_key_variants(" Arts "), vec![" Arts ", "arts", "Arts"]);
    }

    #[test]
    fn normalize_subject_key_accepts_spelling_variants() {
        let store = sample_store();

        assert_eq!(store.normalize_subject_key("Design").unwrap(), "design");
        assert_eq!(
            store.normalize_subject_key("Individus et Sociétés").unwrap(),
            "individus_et_sociétés"
        );
        assert_eq!(store.normalize_subject_key("  ARTS ").unwrap(), "arts");
    }

    #[test]
    fn unknown_subject_reports_attempts() {
        let store = sample_store();

        match store.normalize_subject_key("Musique") {
            Err(DescriptorError::SubjectNotFound { subject, attempted }) => {
                assert_eq!(subject, "Musique");
                assert_eq!(attempted, vec!["Musique", "musique"]);
            }
            other => panic!("expected SubjectNotFound, got {:?}", other),
        }
    }

    #[test]
    fn numbered_scheme_prefixes_grade() {
        let store = sample_store();

        assert_eq!(store.resolve_grade_band("design", "PEI 3").unwrap(), "pei3");
        assert_eq!(store.resolve_grade_band("design", "pei1").unwrap(), "pei1");
        assert_eq!(store.resolve_grade_band("design", "2").unwrap(), "pei2");
    }

    #[test]
    fn named_scheme_uses_grade_bands() {
        let store = sample_store();

        assert_eq!(store.resolve_grade_band("Arts", "PEI 1").unwrap(), "débutant");
        assert_eq!(store.resolve_grade_band("Arts", "PEI 2").unwrap(), "débutant");
        assert_eq!(store.resolve_grade_band("Arts", "PEI 3").unwrap(), "intermédiaire");
        assert_eq!(store.resolve_grade_band("Arts", "PEI 5").unwrap(), "compétent");
    }

    #[test]
    fn named_scheme_without_digit_falls_back_to_numbered_key() {
        let store = sample_store();

        assert_eq!(store.resolve_grade_band("Arts", "terminale").unwrap(), "peiterminale");
        assert!(matches!(
            store.resolve_criterion_block("Arts", "terminale", CriterionLetter::A),
            Err(DescriptorError::GradeBandNotFound { .. })
        ));
    }

    #[test]
    fn alias_band_resolves_to_target() {
        let store = sample_store();

        let aliased = store
            .resolve_criterion_block("design", "PEI 2", CriterionLetter::A)
            .unwrap();
        let direct = store
            .resolve_criterion_block("design", "PEI 1", CriterionLetter::A)
            .unwrap();

        assert_eq!(aliased, direct);
        assert_eq!(aliased.title, "Recherche et analyse");
    }

    #[test]
    fn missing_band_and_criterion_are_distinguished() {
        let store = sample_store();

        match store.resolve_criterion_block("design", "PEI 9", CriterionLetter::A) {
            Err(DescriptorError::GradeBandNotFound { subject, band }) => {
                assert_eq!(subject, "design");
                assert_eq!(band, "pei9");
            }
            other => panic!("expected GradeBandNotFound, got {:?}", other),
        }

        match store.resolve_criterion_block("design", "PEI 1", CriterionLetter::D) {
            Err(DescriptorError::CriterionNotFound {
                subject,
                band,
                letter,
            }) => {
                assert_eq!(subject, "design");
                assert_eq!(band, "pei1");
                assert_eq!(letter, "D");
            }
            other => panic!("expected CriterionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn blocks_skip_alias_bands() {
        let store = sample_store();

        let coordinates: Vec<(String, String, CriterionLetter)> = store
            .blocks()
            .map(|b| (b.subject.to_string(), b.band.to_string(), b.letter))
            .collect();

        assert!(coordinates.contains(&("design".into(), "pei1".into(), CriterionLetter::A)));
        assert!(!coordinates.iter().any(|(_, band, _)| band == "pei2"));
    }

    #[test]
    fn rejects_block_without_null_descriptor() {
        let json = r#"{"subjects": {"design": {"bands": {"pei1": {
            "A": {"title": "T", "levels": {"1-2": "i. fait"}}
        }}}}}"#;

        assert!(matches!(
            DescriptorStore::from_json(json),
            Err(DescriptorError::MalformedDescriptorData(msg)) if msg.contains("\"0\"")
        ));
    }

    #[test]
    fn rejects_block_without_graded_range() {
        let json = r#"{"subjects": {"design": {"bands": {"pei1": {
            "A": {"title": "T", "levels": {"0": "rien"}}
        }}}}}"#;

        assert!(DescriptorStore::from_json(json).is_err());
    }

    #[test]
    fn rejects_dangling_and_chained_aliases() {
        let dangling = r#"{"subjects": {"design": {"bands": {
            "pei1": {"A": {"title": "T", "levels": {"0": "rien", "1-2": "i. fait"}}},
            "pei2": "same_as_pei7"
        }}}}"#;
        let chained = r#"{"subjects": {"design": {"bands": {
            "pei1": {"A": {"title": "T", "levels": {"0": "rien", "1-2": "i. fait"}}},
            "pei2": "same_as_pei1",
            "pei3": "same_as_pei2"
        }}}}"#;

        assert!(matches!(
            DescriptorStore::from_json(dangling),
            Err(DescriptorError::MalformedDescriptorData(msg)) if msg.contains("missing band")
        ));
        assert!(matches!(
            DescriptorStore::from_json(chained),
            Err(DescriptorError::MalformedDescriptorData(msg)) if msg.contains("itself an alias")
        ));
    }

    #[test]
    fn rejects_grade_band_pointing_nowhere() {
        let json = r#"{"subjects": {"arts": {
            "bands": {"débutant": {"A": {"title": "T", "levels": {"0": "rien", "1-2": "i. fait"}}}},
            "grade_bands": {"1": "débutant", "5": "compétent"}
        }}}"#;

        assert!(DescriptorStore::from_json(json).is_err());
    }

    #[test]
    fn rejects_invalid_json_and_empty_table() {
        assert!(DescriptorStore::from_json("{").is_err());
        assert!(DescriptorStore::from_json(r#"{"subjects": {}}"#).is_err());
    }

    #[test]
    fn fixture_round_trips_through_loader() {
        assert!(DescriptorStore::from_json(sample_descriptor_json()).is_ok());
    }

    #[test]
    fn embedded_corpus_is_valid() {
        let store = DescriptorStore::embedded().expect("embedded descriptors should validate");
        assert_eq!(store.subject_keys().len(), 7);
    }

    #[test]
    fn load_without_path_uses_embedded_corpus() {
        let store = DescriptorStore::load(None).unwrap();
        assert!(store.subject_keys().contains(&"sciences".to_string()));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = DescriptorStore::load(Some(Path::new("/nonexistent/descriptors.json")));
        assert!(matches!(
            result,
            Err(DescriptorError::MalformedDescriptorData(msg)) if msg.contains("cannot read")
        ));
    }
}
