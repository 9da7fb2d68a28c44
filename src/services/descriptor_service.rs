use std::sync::Arc;

use crate::{
    descriptors::{CriterionBlock, CriterionLetter, DescriptorStore},
    errors::{AppError, AppResult, DescriptorError},
    extraction::{get_all_sub_criteria, SubCriteria},
    models::dto::response::{CriterionView, LevelDescriptorView, SubCriterionView},
};

/// A criterion block together with its merged sub-criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCriterion {
    pub letter: CriterionLetter,
    pub band: String,
    pub block: CriterionBlock,
    pub sub_criteria: SubCriteria,
}

pub struct DescriptorService {
    store: Arc<DescriptorStore>,
}

impl DescriptorService {
    pub fn new(store: Arc<DescriptorStore>) -> Self {
        Self { store }
    }

    pub fn subjects(&self) -> Vec<String> {
        self.store.subject_keys()
    }

    /// Table key for a free-text subject name.
    pub fn subject_key(&self, subject: &str) -> AppResult<String> {
        self.store
            .normalize_subject_key(subject)
            .map(str::to_string)
            .map_err(|e| self.map_error(e))
    }

    pub fn resolve(&self, subject: &str, grade: &str, letter: &str) -> AppResult<ResolvedCriterion> {
        let letter: CriterionLetter = letter.parse().map_err(AppError::ValidationError)?;

        let band = self
            .store
            .resolve_grade_band(subject, grade)
            .map_err(|e| self.map_error(e))?;
        let block = self
            .store
            .resolve_criterion_block(subject, grade, letter)
            .map_err(|e| self.map_error(e))?;

        Ok(ResolvedCriterion {
            letter,
            band,
            sub_criteria: get_all_sub_criteria(block),
            block: block.clone(),
        })
    }

    /// Resolves several letters for one subject and grade; the first failure aborts.
    pub fn resolve_many(
        &self,
        subject: &str,
        grade: &str,
        letters: &[String],
    ) -> AppResult<Vec<ResolvedCriterion>> {
        letters
            .iter()
            .map(|letter| self.resolve(subject, grade, letter))
            .collect()
    }

    pub fn criterion(&self, subject: &str, grade: &str, letter: &str) -> AppResult<CriterionView> {
        let resolved = self.resolve(subject, grade, letter)?;
        let subject_key = self
            .store
            .normalize_subject_key(subject)
            .map_err(|e| self.map_error(e))?;

        Ok(CriterionView {
            subject: subject_key.to_string(),
            band: resolved.band,
            letter: resolved.letter.to_string(),
            title: resolved.block.title.clone(),
            levels: resolved
                .block
                .levels
                .iter()
                .map(|(range, text)| LevelDescriptorView {
                    range: range.to_string(),
                    text: text.clone(),
                })
                .collect(),
            sub_criteria: resolved
                .sub_criteria
                .iter()
                .map(|(numeral, text)| SubCriterionView {
                    numeral: numeral.to_string(),
                    text: text.clone(),
                })
                .collect(),
        })
    }

    fn map_error(&self, err: DescriptorError) -> AppError {
        match AppError::from(err) {
            AppError::UnknownSubject { message, .. } => AppError::UnknownSubject {
                message,
                available: self.store.subject_keys(),
            },
            other => other,
        }
    }
}
