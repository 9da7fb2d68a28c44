use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::DescriptorError;

const EMBEDDED_CURRICULUM: &str = include_str!("../../assets/curriculum.json");

/// Concepts a subject's units are planned around.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubjectConcepts {
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

/// Planning vocabulary: global contexts shared by every subject, plus the key
/// and related concepts of each subject. Subjects use the descriptor table keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Curriculum {
    global_contexts: Vec<String>,
    subjects: BTreeMap<String, SubjectConcepts>,
}

impl Curriculum {
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        let curriculum: Curriculum = serde_json::from_str(json)
            .map_err(|e| DescriptorError::MalformedDescriptorData(format!("curriculum: {}", e)))?;
        curriculum.validate()?;
        Ok(curriculum)
    }

    pub fn embedded() -> Result<Self, DescriptorError> {
        Self::from_json(EMBEDDED_CURRICULUM)
    }

    pub fn global_contexts(&self) -> &[String] {
        &self.global_contexts
    }

    pub fn concepts(&self, subject_key: &str) -> Option<&SubjectConcepts> {
        self.subjects.get(subject_key)
    }

    pub fn subject_keys(&self) -> Vec<String> {
        self.subjects.keys().cloned().collect()
    }

    // Units pick concepts and contexts by rotation, so neither list may be empty.
    fn validate(&self) -> Result<(), DescriptorError> {
        if self.global_contexts.is_empty() {
            return Err(DescriptorError::MalformedDescriptorData(
                "curriculum: no global contexts".to_string(),
            ));
        }
        if let Some((subject, _)) = self
            .subjects
            .iter()
            .find(|(_, concepts)| concepts.key_concepts.is_empty())
        {
            return Err(DescriptorError::MalformedDescriptorData(format!(
                "curriculum: subject '{}' has no key concepts",
                subject
            )));
        }
        Ok(())
    }
}
