use std::sync::Arc;

use serde_json::json;
use validator::Validate;

use crate::{
    constants::prompts::build_unit_prompt,
    descriptors::{Curriculum, SubjectConcepts},
    errors::{AppError, AppResult},
    models::{
        domain::{Chapter, GeneratedUnit},
        dto::{request::GenerateUnitsRequest, response::GeneratedUnits},
    },
    services::{descriptor_service::DescriptorService, model_service::UnitGenerator},
};

const LANGUAGE_AND_LITERATURE: &str = "langue et littérature";
const LANGUAGE_AND_LITERATURE_UNITS: usize = 6;
const DEFAULT_UNITS: usize = 4;
const TEMPLATE_RELATED_CONCEPTS: usize = 3;
const TEMPLATE_OBJECTIVES: [&str; 5] = ["A.i", "A.ii", "B.i", "C.i", "D.i"];

/// Everything the generator needs to plan one subject's units.
#[derive(Debug, Clone, Copy)]
pub struct UnitPlanningContext<'a> {
    pub subject: &'a str,
    pub grade: &'a str,
    pub chapters: &'a [Chapter],
    pub concepts: &'a SubjectConcepts,
    pub global_contexts: &'a [String],
    pub unit_count: usize,
}

/// Number of units a year is split into for a subject key.
pub fn unit_count_for(subject_key: &str) -> usize {
    if subject_key == LANGUAGE_AND_LITERATURE {
        LANGUAGE_AND_LITERATURE_UNITS
    } else {
        DEFAULT_UNITS
    }
}

pub struct UnitGenerationService {
    descriptors: Arc<DescriptorService>,
    curriculum: Arc<Curriculum>,
    generator: Option<Arc<dyn UnitGenerator>>,
}

impl UnitGenerationService {
    pub fn new(
        descriptors: Arc<DescriptorService>,
        curriculum: Arc<Curriculum>,
        generator: Option<Arc<dyn UnitGenerator>>,
    ) -> Self {
        Self {
            descriptors,
            curriculum,
            generator,
        }
    }

    /// Groups the chapters into units. Model output is used only when it has
    /// exactly the expected number of units; otherwise the template grouping is
    /// returned.
    pub async fn generate(&self, request: GenerateUnitsRequest) -> AppResult<GeneratedUnits> {
        request.validate()?;

        let subject_key = self.descriptors.subject_key(&request.subject)?;
        let concepts = self.curriculum.concepts(&subject_key).ok_or_else(|| {
            AppError::NotFound(format!("No planning concepts for subject '{}'", subject_key))
        })?;

        let ctx = UnitPlanningContext {
            subject: &request.subject,
            grade: &request.grade,
            chapters: &request.chapters,
            concepts,
            global_contexts: self.curriculum.global_contexts(),
            unit_count: unit_count_for(&subject_key),
        };
        log::info!(
            "Planning {} units from {} chapters for {} {} ({})",
            ctx.unit_count,
            ctx.chapters.len(),
            subject_key,
            ctx.grade,
            request.teacher.as_deref().unwrap_or("anonymous")
        );

        if let Some(generator) = &self.generator {
            match generator.generate_units(&build_unit_prompt(&ctx)).await {
                Ok(units) if units.len() == ctx.unit_count => {
                    return Ok(GeneratedUnits {
                        units,
                        ai_generated: true,
                    });
                }
                Ok(units) => log::warn!(
                    "Generation returned {} units instead of {}, using template units",
                    units.len(),
                    ctx.unit_count
                ),
                Err(e) => log::warn!("Unit generation failed ({}), using template units", e),
            }
        } else {
            log::warn!("No generation model configured, using template units");
        }

        Ok(GeneratedUnits {
            units: generate_units_basic(&ctx),
            ai_generated: false,
        })
    }
}

/// Splits the chapters into `ctx.unit_count` consecutive groups.
///
/// Every group but the last takes `max(1, chapters / units)` chapters and the
/// last takes the rest. Key concept and global context rotate with the unit
/// index. A group left without chapters is themed on its key concept.
pub fn generate_units_basic(ctx: &UnitPlanningContext<'_>) -> Vec<GeneratedUnit> {
    let total = ctx.chapters.len();
    let per_unit = (total / ctx.unit_count.max(1)).max(1);
    let key_concepts = &ctx.concepts.key_concepts;

    (0..ctx.unit_count)
        .map(|idx| {
            let start = (idx * per_unit).min(total);
            let end = if idx + 1 < ctx.unit_count {
                (start + per_unit).min(total)
            } else {
                total
            };
            let group = &ctx.chapters[start..end];

            let key_concept = key_concepts
                .get(idx % key_concepts.len().max(1))
                .cloned()
                .unwrap_or_default();
            let global_context = ctx
                .global_contexts
                .get(idx % ctx.global_contexts.len().max(1))
                .cloned()
                .unwrap_or_default();

            let titles: Vec<&str> = group.iter().map(|c| c.title.as_str()).collect();
            let theme = titles.first().copied().unwrap_or(key_concept.as_str());
            let heading = if titles.is_empty() {
                theme.to_string()
            } else {
                titles.iter().take(2).copied().collect::<Vec<_>>().join(" et ")
            };

            GeneratedUnit {
                title: format!("Unité {}: {}", idx + 1, heading),
                chapters: group
                    .iter()
                    .enumerate()
                    .map(|(offset, chapter)| {
                        chapter.id.clone().unwrap_or_else(|| json!(start + offset))
                    })
                    .collect(),
                duration: group.iter().map(|c| c.duration).sum(),
                related_concepts: ctx
                    .concepts
                    .related_concepts
                    .iter()
                    .take(TEMPLATE_RELATED_CONCEPTS)
                    .cloned()
                    .collect(),
                research_statement: format!("Exploration de {}", theme),
                factual_questions: vec![
                    format!("Quels sont les éléments clés de {}?", theme),
                    format!("Comment définir {}?", theme),
                ],
                conceptual_questions: vec![
                    format!("Pourquoi {} est-il important?", theme),
                    format!("Comment {} influence-t-il notre compréhension?", theme),
                ],
                debatable_questions: vec![
                    format!("Dans quelle mesure {} affecte-t-il notre société?", theme),
                    format!("Quel est l'impact de {} sur notre futur?", theme),
                ],
                objectives: TEMPLATE_OBJECTIVES.iter().map(|o| o.to_string()).collect(),
                key_concept,
                global_context,
            }
        })
        .collect()
}
