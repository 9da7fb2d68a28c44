use serde::Deserialize;
use validator::Validate;

use crate::models::domain::Chapter;

/// Unit the evaluation belongs to. Accepts the key spellings the front-end
/// has used over time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitContext {
    #[serde(default, alias = "titreUnite", alias = "titre_unite", alias = "titre")]
    pub title: Option<String>,

    #[serde(default, alias = "enonceDeRecherche", alias = "enonce_recherche")]
    pub research_statement: Option<String>,
}

impl UnitContext {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn research_statement(&self) -> &str {
        self.research_statement.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluationRequest {
    #[serde(alias = "matiere")]
    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[serde(alias = "classe")]
    #[validate(length(min = 1, max = 20))]
    pub grade: String,

    #[serde(default, alias = "unite")]
    pub unit: Option<UnitContext>,

    #[serde(default, alias = "criteres")]
    #[validate(length(min = 1, max = 4, message = "At least one criterion must be provided"))]
    pub criteria: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveUnitPlanRequest {
    #[serde(alias = "enseignant")]
    #[validate(length(min = 1, max = 100))]
    pub teacher: String,

    #[serde(alias = "matiere")]
    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[serde(alias = "annee_pei")]
    #[validate(length(min = 1, max = 20))]
    pub grade: String,

    #[serde(default, alias = "titre_unite")]
    #[validate(length(max = 300))]
    pub title: Option<String>,

    pub data: serde_json::Value,
}

/// Chapters to group into units for one subject and grade.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateUnitsRequest {
    #[serde(default, alias = "enseignant")]
    #[validate(length(max = 100))]
    pub teacher: Option<String>,

    #[serde(alias = "matiere")]
    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[serde(alias = "annee_pei", alias = "classe")]
    #[validate(length(min = 1, max = 20))]
    pub grade: String,

    #[serde(default, alias = "chapitres")]
    #[validate(length(min = 1, max = 200, message = "At least one chapter must be provided"))]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitPlanQuery {
    #[serde(default, alias = "matiere")]
    pub subject: Option<String>,

    #[serde(default, alias = "annee_pei")]
    pub grade: Option<String>,
}
