use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{UnitPlan, UnitPlanFilter},
        dto::request::{SaveUnitPlanRequest, UnitPlanQuery},
    },
    repositories::UnitPlanRepository,
};

pub struct UnitPlanService {
    repository: Arc<dyn UnitPlanRepository>,
}

impl UnitPlanService {
    pub fn new(repository: Arc<dyn UnitPlanRepository>) -> Self {
        Self { repository }
    }

    /// Stores a plan as the next attempt for its teacher, subject and grade.
    ///
    /// A concurrent save can take the same attempt number first; the number is
    /// then recomputed once before the conflict is returned.
    pub async fn save(&self, request: SaveUnitPlanRequest) -> AppResult<UnitPlan> {
        request.validate()?;

        let title = request
            .title
            .clone()
            .or_else(|| {
                request
                    .data
                    .get("titre_unite")
                    .and_then(|t| t.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let mut retried = false;
        loop {
            let attempt = self
                .repository
                .latest_attempt(&request.teacher, &request.subject, &request.grade)
                .await?
                .map_or(1, |latest| latest + 1);

            let plan = UnitPlan::new(
                &request.teacher,
                &request.subject,
                &request.grade,
                attempt,
                &title,
                request.data.clone(),
            );

            match self.repository.create(plan).await {
                Ok(plan) => {
                    log::info!(
                        "Saved unit plan {} (attempt {}) for {}",
                        plan.id,
                        plan.attempt,
                        plan.teacher
                    );
                    return Ok(plan);
                }
                Err(AppError::AlreadyExists(message)) if !retried => {
                    log::warn!("Attempt {} already taken, retrying: {}", attempt, message);
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<UnitPlan> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Unit plan with id '{}' not found", id)))
    }

    pub async fn list_for_teacher(
        &self,
        teacher: &str,
        query: UnitPlanQuery,
    ) -> AppResult<Vec<UnitPlan>> {
        let filter = UnitPlanFilter {
            teacher: teacher.to_string(),
            subject: query.subject,
            grade: query.grade,
        };
        self.repository.find_by_teacher(&filter).await
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
