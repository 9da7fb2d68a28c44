use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    descriptors::{Curriculum, DescriptorStore},
    errors::{AppError, AppResult},
    repositories::{MongoUnitPlanRepository, UnitPlanRepository},
    services::{
        descriptor_service::DescriptorService,
        evaluation_service::EvaluationService,
        exercise_service::ExerciseService,
        model_service::{ExerciseGenerator, GeminiModelService, UnitGenerator},
        unit_generation_service::UnitGenerationService,
        unit_plan_service::UnitPlanService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub descriptor_service: Arc<DescriptorService>,
    pub evaluation_service: Arc<EvaluationService>,
    pub unit_plan_service: Arc<UnitPlanService>,
    pub unit_generation_service: Arc<UnitGenerationService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Loads the descriptor table and the curriculum before anything else;
    /// malformed data stops startup.
    pub async fn new(config: Config) -> AppResult<Self> {
        let store = DescriptorStore::load(config.descriptors_path.as_deref())
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        log::info!(
            "Loaded descriptors for {} subjects",
            store.subject_keys().len()
        );

        let curriculum =
            Curriculum::embedded().map_err(|e| AppError::InternalError(e.to_string()))?;

        let db = Database::connect(&config).await?;
        let unit_plan_repository = Arc::new(MongoUnitPlanRepository::new(
            &db,
            &config.units_collection,
        ));
        unit_plan_repository.ensure_indexes().await?;

        let model = GeminiModelService::from_config(&config).map(Arc::new);
        if model.is_none() {
            log::warn!("GEMINI_API_KEY not set, evaluations and units will use templates");
        }

        Ok(Self::from_parts(
            Arc::new(store),
            Arc::new(curriculum),
            unit_plan_repository,
            model,
            config,
        ))
    }

    pub fn from_parts(
        store: Arc<DescriptorStore>,
        curriculum: Arc<Curriculum>,
        unit_plan_repository: Arc<dyn UnitPlanRepository>,
        model: Option<Arc<GeminiModelService>>,
        config: Config,
    ) -> Self {
        let exercise_generator = model
            .clone()
            .map(|service| service as Arc<dyn ExerciseGenerator>);
        let unit_generator = model.map(|service| service as Arc<dyn UnitGenerator>);

        let descriptor_service = Arc::new(DescriptorService::new(store));
        let exercise_service = Arc::new(ExerciseService::new(exercise_generator));
        let evaluation_service = Arc::new(EvaluationService::new(
            descriptor_service.clone(),
            exercise_service,
        ));
        let unit_plan_service = Arc::new(UnitPlanService::new(unit_plan_repository));
        let unit_generation_service = Arc::new(UnitGenerationService::new(
            descriptor_service.clone(),
            curriculum,
            unit_generator,
        ));

        Self {
            descriptor_service,
            evaluation_service,
            unit_plan_service,
            unit_generation_service,
            config: Arc::new(config),
        }
    }
}
