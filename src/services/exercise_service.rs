use std::sync::Arc;

use crate::{
    constants::prompts::build_exercise_prompt,
    models::domain::{exercise::OPEN_QUESTION, Exercise},
    services::{descriptor_service::ResolvedCriterion, model_service::ExerciseGenerator},
};

pub const MAX_FALLBACK_EXERCISES: usize = 5;
const FALLBACK_ANSWER_LINES: u32 = 5;
const OBJECTIVE_CHARS: usize = 50;

/// Everything the generator needs to know about one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseContext<'a> {
    pub subject: &'a str,
    pub grade: &'a str,
    pub unit_title: &'a str,
    pub research_statement: &'a str,
    pub criteria: &'a [ResolvedCriterion],
}

pub struct ExerciseService {
    generator: Option<Arc<dyn ExerciseGenerator>>,
}

impl ExerciseService {
    pub fn new(generator: Option<Arc<dyn ExerciseGenerator>>) -> Self {
        Self { generator }
    }

    /// Never fails: without a generator, or when it errors or returns
    /// nothing, exercises are derived from the sub-criteria instead.
    pub async fn generate(&self, ctx: &ExerciseContext<'_>) -> Vec<Exercise> {
        let Some(generator) = &self.generator else {
            log::warn!("No generation model configured, using default exercises");
            return default_exercises(ctx.criteria);
        };

        let letters: Vec<String> = ctx.criteria.iter().map(|c| c.letter.to_string()).collect();
        log::info!("Generating exercises for criteria {}", letters.join(", "));

        match generator.generate_exercises(&build_exercise_prompt(ctx)).await {
            Ok(exercises) if !exercises.is_empty() => exercises,
            Ok(_) => {
                log::warn!("Generation returned no exercises, using default exercises");
                default_exercises(ctx.criteria)
            }
            Err(e) => {
                log::warn!("Exercise generation failed ({}), using default exercises", e);
                default_exercises(ctx.criteria)
            }
        }
    }
}

/// One open question per sub-criterion, criteria in request order, capped
/// at [`MAX_FALLBACK_EXERCISES`].
pub fn default_exercises(criteria: &[ResolvedCriterion]) -> Vec<Exercise> {
    criteria
        .iter()
        .flat_map(|criterion| {
            criterion
                .sub_criteria
                .iter()
                .map(move |(numeral, clause)| (criterion.letter, numeral, clause))
        })
        .take(MAX_FALLBACK_EXERCISES)
        .zip(1u32..)
        .map(|((letter, numeral, clause), number)| Exercise {
            number,
            title: format!("Évaluation {}.{}", letter, numeral),
            kind: OPEN_QUESTION.to_string(),
            criterion_ref: letter.to_string(),
            sub_criterion_ref: numeral.to_string(),
            objective_ref: clause.chars().take(OBJECTIVE_CHARS).collect(),
            content: format!(
                "Réalisez une tâche qui démontre: {}\n\nConsignes:\n1. Situez le problème dans un contexte réel\n2. Expliquez votre démarche\n3. Justifiez vos choix avec des notions du cours\n\n(À compléter par l'enseignant si nécessaire)",
                clause
            ),
            answer_lines: FALLBACK_ANSWER_LINES,
        })
        .collect()
}
