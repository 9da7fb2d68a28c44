use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::{Exercise, GeneratedUnit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct LevelDescriptorView {
    pub range: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct SubCriterionView {
    pub numeral: String,
    pub text: String,
}

/// A resolved criterion as shown to clients: rubric prose per level range
/// and the merged sub-criteria in numeral order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct CriterionView {
    pub subject: String,
    pub band: String,
    pub letter: String,
    pub title: String,
    pub levels: Vec<LevelDescriptorView>,
    pub sub_criteria: Vec<SubCriterionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCriterionSummary {
    pub roman: String,
    pub description_courte: String,
    pub titre_exercice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionSummary {
    pub lettre_critere: String,
    pub nom_critere: String,
    pub sous_criteres: Vec<SubCriterionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerLine {
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedExercise {
    pub numero: u32,
    pub titre: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub critere_ref: String,
    pub sous_critere_ref: String,
    pub objectif_ref: String,
    pub contenu: String,
    pub answer_lines: Vec<AnswerLine>,
}

impl RenderedExercise {
    pub const ANSWER_LINE: &'static str = "………………………………………………………………………………………………";
    /// Upper bound on rendered answer lines; the count comes from model output.
    pub const MAX_ANSWER_LINES: u32 = 30;

    pub fn from_exercise(exercise: &Exercise) -> Self {
        RenderedExercise {
            numero: exercise.number,
            titre: exercise.title.clone(),
            kind: exercise.kind.clone(),
            critere_ref: exercise.criterion_ref.clone(),
            sous_critere_ref: exercise.sub_criterion_ref.clone(),
            objectif_ref: exercise.objective_ref.clone(),
            contenu: exercise.content.clone(),
            answer_lines: (0..exercise.answer_lines.min(Self::MAX_ANSWER_LINES))
                .map(|_| AnswerLine {
                    line: Self::ANSWER_LINE.to_string(),
                })
                .collect(),
        }
    }
}

/// Data map handed to the evaluation document template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationDocumentData {
    pub annee_pei: String,
    pub groupe_matiere: String,
    pub enonce_de_recherche: String,
    pub criteres_summary: Vec<CriterionSummary>,
    pub exercices: Vec<RenderedExercise>,
}

/// Proposed units; `ai_generated` is false when the template grouping was used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedUnits {
    #[serde(rename = "unites")]
    pub units: Vec<GeneratedUnit>,
    pub ai_generated: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}
