use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{UnitPlan, UnitPlanFilter},
};

const DUPLICATE_KEY_CODE: i32 = 11000;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitPlanRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the id or the attempt number is taken.
    async fn create(&self, plan: UnitPlan) -> AppResult<UnitPlan>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<UnitPlan>>;
    /// Newest first.
    async fn find_by_teacher(&self, filter: &UnitPlanFilter) -> AppResult<Vec<UnitPlan>>;
    async fn latest_attempt(
        &self,
        teacher: &str,
        subject: &str,
        grade: &str,
    ) -> AppResult<Option<u32>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
    async fn ping(&self) -> AppResult<()>;
}

pub struct MongoUnitPlanRepository {
    db: Database,
    collection: Collection<UnitPlan>,
}

impl MongoUnitPlanRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self {
            db: db.clone(),
            collection,
        }
    }
}

fn filter_document(filter: &UnitPlanFilter) -> Document {
    let mut query = doc! { "teacher": &filter.teacher };
    if let Some(subject) = &filter.subject {
        query.insert("subject", subject);
    }
    if let Some(grade) = &filter.grade {
        query.insert("grade", grade);
    }
    query
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl UnitPlanRepository for MongoUnitPlanRepository {
    async fn create(&self, plan: UnitPlan) -> AppResult<UnitPlan> {
        match self.collection.insert_one(&plan).await {
            Ok(_) => Ok(plan),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "unit plan attempt {} for {} ({} {})",
                plan.attempt, plan.teacher, plan.subject, plan.grade
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<UnitPlan>> {
        let plan = self.collection.find_one(doc! { "id": id }).await?;
        Ok(plan)
    }

    async fn find_by_teacher(&self, filter: &UnitPlanFilter) -> AppResult<Vec<UnitPlan>> {
        let plans = self
            .collection
            .find(filter_document(filter))
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(plans)
    }

    async fn latest_attempt(
        &self,
        teacher: &str,
        subject: &str,
        grade: &str,
    ) -> AppResult<Option<u32>> {
        let latest = self
            .collection
            .find_one(doc! {
                "teacher": teacher,
                "subject": subject,
                "grade": grade
            })
            .sort(doc! { "attempt": -1 })
            .await?;
        Ok(latest.map(|plan| plan.attempt))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for unit plans collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let attempt_index = IndexModel::builder()
            .keys(doc! { "teacher": 1, "subject": 1, "grade": 1, "attempt": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("teacher_subject_grade_attempt".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(attempt_index).await?;

        log::info!("Successfully created indexes for unit plans collection");
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
