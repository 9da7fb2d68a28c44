use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chapter of the teacher's programme, as entered in the planner.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Chapter {
    /// Free-form identifier; chapters without one are referred to by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "titre", default)]
    pub title: String,
    /// Hours.
    #[serde(rename = "duree", default)]
    pub duration: f64,
}

/// A proposed unit grouping several chapters.
///
/// Wire names are the French keys the generation prompt asks for.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneratedUnit {
    #[serde(rename = "titre_unite", default)]
    pub title: String,
    #[serde(rename = "chapitres_inclus", default)]
    pub chapters: Vec<Value>,
    #[serde(rename = "duree", default)]
    pub duration: f64,
    #[serde(rename = "concept_cle", default)]
    pub key_concept: String,
    #[serde(rename = "concepts_connexes", default)]
    pub related_concepts: Vec<String>,
    #[serde(rename = "contexte_mondial", default)]
    pub global_context: String,
    #[serde(rename = "enonce_recherche", default)]
    pub research_statement: String,
    #[serde(rename = "questions_factuelles", default)]
    pub factual_questions: Vec<String>,
    #[serde(rename = "questions_conceptuelles", default)]
    pub conceptual_questions: Vec<String>,
    #[serde(rename = "questions_debat", default)]
    pub debatable_questions: Vec<String>,
    #[serde(rename = "objectifs_specifiques", default)]
    pub objectives: Vec<String>,
}
