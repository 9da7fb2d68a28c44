use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated unit plan, stored once per teacher/subject/grade/attempt.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UnitPlan {
    pub id: String,
    pub teacher: String,
    pub subject: String,
    pub grade: String,
    pub attempt: u32,
    pub title: String,
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UnitPlan {
    pub fn new(
        teacher: &str,
        subject: &str,
        grade: &str,
        attempt: u32,
        title: &str,
        data: serde_json::Value,
    ) -> Self {
        UnitPlan {
            id: Uuid::new_v4().to_string(),
            teacher: teacher.to_string(),
            subject: subject.to_string(),
            grade: grade.to_string(),
            attempt,
            title: title.to_string(),
            data,
            created_at: Some(Utc::now()),
        }
    }
}

/// Listing filter: a teacher's plans, optionally narrowed by subject and grade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitPlanFilter {
    pub teacher: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
}

impl UnitPlanFilter {
    pub fn matches(&self, plan: &UnitPlan) -> bool {
        plan.teacher == self.teacher
            && self.subject.as_ref().map_or(true, |s| &plan.subject == s)
            && self.grade.as_ref().map_or(true, |g| &plan.grade == g)
    }
}
