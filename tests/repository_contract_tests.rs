use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use tokio::sync::RwLock;

use pei_planner::{
    errors::{AppError, AppResult},
    models::{
        domain::{UnitPlan, UnitPlanFilter},
        dto::request::{SaveUnitPlanRequest, UnitPlanQuery},
    },
    repositories::UnitPlanRepository,
    services::unit_plan_service::UnitPlanService,
};

struct InMemoryUnitPlanRepository {
    plans: Arc<RwLock<HashMap<String, UnitPlan>>>,
}

impl InMemoryUnitPlanRepository {
    fn new() -> Self {
        Self {
            plans: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UnitPlanRepository for InMemoryUnitPlanRepository {
    async fn create(&self, plan: UnitPlan) -> AppResult<UnitPlan> {
        let mut plans = self.plans.write().await;
        let duplicate = plans.values().any(|p| {
            p.teacher == plan.teacher
                && p.subject == plan.subject
                && p.grade == plan.grade
                && p.attempt == plan.attempt
        });
        if duplicate || plans.contains_key(&plan.id) {
            return Err(AppError::AlreadyExists(format!(
                "duplicate unit plan attempt {} for {}",
                plan.attempt, plan.teacher
            )));
        }
        plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<UnitPlan>> {
        let plans = self.plans.read().await;
        Ok(plans.get(id).cloned())
    }

    async fn find_by_teacher(&self, filter: &UnitPlanFilter) -> AppResult<Vec<UnitPlan>> {
        let plans = self.plans.read().await;
        let mut items: Vec<UnitPlan> = plans
            .values()
            .filter(|plan| filter.matches(plan))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn latest_attempt(
        &self,
        teacher: &str,
        subject: &str,
        grade: &str,
    ) -> AppResult<Option<u32>> {
        let plans = self.plans.read().await;
        Ok(plans
            .values()
            .filter(|p| p.teacher == teacher && p.subject == subject && p.grade == grade)
            .map(|p| p.attempt)
            .max())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

fn make_plan(teacher: &str, subject: &str, grade: &str, attempt: u32, age_minutes: i64) -> UnitPlan {
    let mut plan = UnitPlan::new(
        teacher,
        subject,
        grade,
        attempt,
        "Unité",
        json!({"titre_unite": "Unité"}),
    );
    plan.created_at = Some(Utc::now() - Duration::minutes(age_minutes));
    plan
}

fn teacher_filter(teacher: &str) -> UnitPlanFilter {
    UnitPlanFilter {
        teacher: teacher.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn unit_plan_repository_crud_and_error_paths() {
    let repo = InMemoryUnitPlanRepository::new();

    let first = make_plan("mme-durand", "Sciences", "PEI 3", 1, 30);
    let created = repo.create(first.clone()).await.expect("create first plan");
    assert_eq!(created.id, first.id);

    let duplicate = repo
        .create(make_plan("mme-durand", "Sciences", "PEI 3", 1, 0))
        .await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let found = repo.find_by_id(&first.id).await.expect("find should work");
    assert_eq!(found, Some(first.clone()));
    assert!(repo.find_by_id("missing").await.expect("find should work").is_none());

    assert_eq!(
        repo.latest_attempt("mme-durand", "Sciences", "PEI 3")
            .await
            .expect("latest attempt should work"),
        Some(1)
    );
    assert_eq!(
        repo.latest_attempt("mme-durand", "Design", "PEI 3")
            .await
            .expect("latest attempt should work"),
        None
    );
}

#[tokio::test]
async fn unit_plan_repository_lists_newest_first() {
    let repo = InMemoryUnitPlanRepository::new();

    repo.create(make_plan("mme-durand", "Sciences", "PEI 3", 1, 60))
        .await
        .expect("create");
    repo.create(make_plan("mme-durand", "Sciences", "PEI 3", 2, 10))
        .await
        .expect("create");
    repo.create(make_plan("mme-durand", "Arts", "PEI 1", 1, 30))
        .await
        .expect("create");
    repo.create(make_plan("m-martin", "Sciences", "PEI 3", 1, 5))
        .await
        .expect("create");

    let all = repo
        .find_by_teacher(&teacher_filter("mme-durand"))
        .await
        .expect("list should work");
    let order: Vec<(&str, u32)> = all.iter().map(|p| (p.subject.as_str(), p.attempt)).collect();
    assert_eq!(order, vec![("Sciences", 2), ("Arts", 1), ("Sciences", 1)]);

    let sciences = repo
        .find_by_teacher(&UnitPlanFilter {
            subject: Some("Sciences".to_string()),
            ..teacher_filter("mme-durand")
        })
        .await
        .expect("list should work");
    assert_eq!(sciences.len(), 2);
    assert!(sciences.iter().all(|p| p.teacher == "mme-durand"));
}

#[tokio::test]
async fn unit_plan_service_numbers_attempts_per_subject_and_grade() {
    let service = UnitPlanService::new(Arc::new(InMemoryUnitPlanRepository::new()));

    let request = |grade: &str| SaveUnitPlanRequest {
        teacher: "mme-durand".to_string(),
        subject: "Design".to_string(),
        grade: grade.to_string(),
        title: None,
        data: json!({"titre_unite": "Objets du quotidien"}),
    };

    let first = service.save(request("PEI 1")).await.expect("save");
    let second = service.save(request("PEI 1")).await.expect("save");
    let other_grade = service.save(request("PEI 2")).await.expect("save");

    assert_eq!(first.attempt, 1);
    assert_eq!(second.attempt, 2);
    assert_eq!(other_grade.attempt, 1);
    assert_eq!(first.title, "Objets du quotidien");

    let listed = service
        .list_for_teacher(
            "mme-durand",
            UnitPlanQuery {
                subject: None,
                grade: Some("PEI 1".to_string()),
            },
        )
        .await
        .expect("list");
    assert_eq!(listed.len(), 2);

    let missing = service.get("missing").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
