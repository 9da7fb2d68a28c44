use serde::{Deserialize, Serialize};

pub const OPEN_QUESTION: &str = "question_ouverte";

/// One assessment exercise.
///
/// Field names on the wire are the French keys the generation prompt asks for,
/// so model output deserializes directly.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Exercise {
    #[serde(rename = "numero", default)]
    pub number: u32,
    #[serde(rename = "titre", default)]
    pub title: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(rename = "critere_ref", default)]
    pub criterion_ref: String,
    #[serde(rename = "sous_critere_ref", default)]
    pub sub_criterion_ref: String,
    #[serde(rename = "objectif_ref", default)]
    pub objective_ref: String,
    #[serde(rename = "contenu", default)]
    pub content: String,
    #[serde(default)]
    pub answer_lines: u32,
}

fn default_kind() -> String {
    OPEN_QUESTION.to_string()
}

impl Exercise {
    pub fn targets(&self, letter: &str, numeral: &str) -> bool {
        self.criterion_ref.eq_ignore_ascii_case(letter)
            && self.sub_criterion_ref.eq_ignore_ascii_case(numeral)
    }
}
