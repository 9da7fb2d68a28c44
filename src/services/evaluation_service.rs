use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::AppResult,
    models::{
        domain::Exercise,
        dto::{
            request::{EvaluationRequest, UnitContext},
            response::{
                CriterionSummary, EvaluationDocumentData, RenderedExercise, SubCriterionSummary,
            },
        },
    },
    services::{
        descriptor_service::{DescriptorService, ResolvedCriterion},
        exercise_service::{ExerciseContext, ExerciseService},
    },
};

const SHORT_DESCRIPTION_CHARS: usize = 60;

pub struct EvaluationService {
    descriptors: Arc<DescriptorService>,
    exercises: Arc<ExerciseService>,
}

impl EvaluationService {
    pub fn new(descriptors: Arc<DescriptorService>, exercises: Arc<ExerciseService>) -> Self {
        Self {
            descriptors,
            exercises,
        }
    }

    /// Resolves every requested criterion, generates the exercises and
    /// assembles the document data. Any unresolvable criterion fails the
    /// whole request before generation starts.
    pub async fn build_evaluation(
        &self,
        request: EvaluationRequest,
    ) -> AppResult<EvaluationDocumentData> {
        request.validate()?;

        log::info!(
            "Evaluation request: subject={}, grade={}, criteria={}",
            request.subject,
            request.grade,
            request.criteria.join(", ")
        );

        let criteria =
            self.descriptors
                .resolve_many(&request.subject, &request.grade, &request.criteria)?;

        let unit = request.unit.clone().unwrap_or_default();
        let ctx = ExerciseContext {
            subject: &request.subject,
            grade: &request.grade,
            unit_title: unit.title(),
            research_statement: unit.research_statement(),
            criteria: &criteria,
        };
        let exercises = self.exercises.generate(&ctx).await;

        Ok(assemble_evaluation_data(&request, &unit, &criteria, &exercises))
    }
}

pub fn assemble_evaluation_data(
    request: &EvaluationRequest,
    unit: &UnitContext,
    criteria: &[ResolvedCriterion],
    exercises: &[Exercise],
) -> EvaluationDocumentData {
    let criteres_summary = criteria
        .iter()
        .map(|criterion| {
            let letter = criterion.letter.as_str();
            CriterionSummary {
                lettre_critere: letter.to_string(),
                nom_critere: criterion.block.title.clone(),
                sous_criteres: criterion
                    .sub_criteria
                    .iter()
                    .map(|(numeral, clause)| SubCriterionSummary {
                        roman: numeral.to_string(),
                        description_courte: short_description(clause),
                        titre_exercice: exercise_title_for(exercises, letter, numeral.as_str()),
                    })
                    .collect(),
            }
        })
        .collect();

    EvaluationDocumentData {
        annee_pei: request.grade.clone(),
        groupe_matiere: request.subject.clone(),
        enonce_de_recherche: unit.research_statement().to_string(),
        criteres_summary,
        exercices: exercises.iter().map(RenderedExercise::from_exercise).collect(),
    }
}

/// First 60 characters of a clause, with an ellipsis when cut.
pub fn short_description(clause: &str) -> String {
    if clause.chars().count() > SHORT_DESCRIPTION_CHARS {
        let head: String = clause.chars().take(SHORT_DESCRIPTION_CHARS).collect();
        format!("{}...", head)
    } else {
        clause.to_string()
    }
}

pub fn exercise_title_for(exercises: &[Exercise], letter: &str, numeral: &str) -> String {
    exercises
        .iter()
        .find(|exercise| exercise.targets(letter, numeral))
        .map(|exercise| exercise.title.clone())
        .unwrap_or_else(|| format!("Exercice {}.{}", letter, numeral))
}
