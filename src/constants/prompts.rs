use crate::{
    extraction::format_sub_criteria,
    services::{exercise_service::ExerciseContext, unit_generation_service::UnitPlanningContext},
};

pub const EXERCISE_PROMPT_INTRO: &str =
    "Tu es un expert en évaluation PEI IB. Génère des exercices VARIÉS et CONCRETS.";

pub const EXERCISE_PROMPT_RULES: &str = "GÉNÈRE 4-6 EXERCICES VARIÉS qui évaluent ces sous-critères:

Types d'exercices à mélanger:
1. **QCM** (Critère A.i souvent) : 3-5 questions à choix multiples avec 4 options chacune
2. **Questions ouvertes** (Critères A.iii, C.ii, C.iii) : Questions nécessitant justification (3-5 lignes de réponse)
3. **Analyse de données** (Critère C.i, C.ii) : Tableaux de données à interpréter
4. **Application pratique** (Critère A.ii) : Problèmes concrets à résoudre

RÈGLES IMPORTANTES:
- Chaque exercice doit être CONCRET et DÉTAILLÉ (minimum 100 mots par exercice)
- Référencer explicitement le critère/sous-critère évalué
- VARIER les types d'exercices (pas que des QCM!)
- Pour les QCM: indiquer clairement les 4 options avec •
- Pour les questions ouvertes: prévoir espace de réponse (answer_lines)";

pub const EXERCISE_PROMPT_FORMAT: &str = r#"Réponds en JSON strict:
{
  "exercices": [
    {
      "numero": 1,
      "titre": "Résumé des connaissances sur...",
      "type": "qcm",
      "critere_ref": "A",
      "sous_critere_ref": "i",
      "objectif_ref": "décrire des connaissances scientifiques",
      "contenu": "1. Première question\n\n• Option A\n• Option B\n• Option C (correcte)\n• Option D\n",
      "answer_lines": 0
    },
    {
      "numero": 2,
      "titre": "Analyse d'un phénomène",
      "type": "question_ouverte",
      "critere_ref": "A",
      "sous_critere_ref": "iii",
      "objectif_ref": "analyser des informations",
      "contenu": "[Contexte détaillé du phénomène avec données]\n\nQuestion: Analysez ce phénomène en justifiant votre raisonnement.",
      "answer_lines": 4
    }
  ]
}"#;

/// Builds the exercise generation prompt for one evaluation.
pub fn build_exercise_prompt(ctx: &ExerciseContext<'_>) -> String {
    let letters: Vec<String> = ctx.criteria.iter().map(|c| c.letter.to_string()).collect();

    let mut criteria_context = String::new();
    for criterion in ctx.criteria {
        criteria_context.push_str(&format!(
            "\nCritère {} ({}):\nSous-critères:\n{}\n",
            criterion.letter,
            criterion.block.title,
            format_sub_criteria(&criterion.sub_criteria)
        ));
    }

    format!(
        "{intro}\n\nMatière: {subject}\nNiveau: {grade}\nUnité: {unit}\nÉnoncé de recherche: {statement}\n\nCritères à évaluer: {letters}\n{context}\n{rules}\n- Adapter au contexte de l'unité \"{unit}\"\n\n{format}",
        intro = EXERCISE_PROMPT_INTRO,
        subject = ctx.subject,
        grade = ctx.grade,
        unit = ctx.unit_title,
        statement = ctx.research_statement,
        letters = letters.join(", "),
        context = criteria_context,
        rules = EXERCISE_PROMPT_RULES,
        format = EXERCISE_PROMPT_FORMAT,
    )
}

pub const UNIT_PROMPT_INTRO: &str =
    "Tu es un expert en pédagogie du Programme d'Éducation Intermédiaire (PEI) de l'IB.";

pub const UNIT_PROMPT_FIELDS: &str = "Pour chaque unité, fournis:
1. titre_unite: Un titre engageant qui regroupe les chapitres
2. chapitres_inclus: Les identifiants des chapitres regroupés
3. duree: Durée totale en heures (somme des durées des chapitres, environ 4h par chapitre si absente)
4. concept_cle: Un concept clé parmi ceux disponibles
5. concepts_connexes: 2-3 concepts connexes pertinents
6. contexte_mondial: Un contexte mondial pertinent
7. enonce_recherche: Un énoncé de recherche stimulant
8. questions_factuelles: 2-3 questions factuelles
9. questions_conceptuelles: 2-3 questions conceptuelles
10. questions_debat: 2-3 questions invitant au débat
11. objectifs_specifiques: Les objectifs spécifiques pertinents (format: \"A.i\", \"B.ii\")";

pub const UNIT_PROMPT_FORMAT: &str = r#"Réponds UNIQUEMENT en JSON valide avec ce format:
{
  "unites": [
    {
      "titre_unite": "...",
      "chapitres_inclus": [1, 2],
      "duree": 0,
      "concept_cle": "...",
      "concepts_connexes": ["...", "..."],
      "contexte_mondial": "...",
      "enonce_recherche": "...",
      "questions_factuelles": ["...", "..."],
      "questions_conceptuelles": ["...", "..."],
      "questions_debat": ["...", "..."],
      "objectifs_specifiques": ["A.i", "A.ii", "B.i"]
    }
  ]
}"#;

/// Builds the prompt asking for exactly `ctx.unit_count` units.
pub fn build_unit_prompt(ctx: &UnitPlanningContext<'_>) -> String {
    let chapters: Vec<String> = ctx
        .chapters
        .iter()
        .enumerate()
        .map(|(position, chapter)| {
            let id = chapter
                .id
                .as_ref()
                .map_or_else(|| position.to_string(), |id| id.to_string());
            format!("- [{}] {} ({} h)", id, chapter.title, chapter.duration)
        })
        .collect();

    format!(
        "{intro}\n\nVoici les chapitres d'un programme pour la matière \"{subject}\" en année {grade}:\n{chapters}\n\nVoici les concepts clés disponibles: {key}\nVoici les concepts connexes disponibles: {related}\nVoici les contextes mondiaux disponibles: {contexts}\n\nTu dois générer EXACTEMENT {count} unités pédagogiques en regroupant les chapitres par thèmes cohérents.\n\n{fields}\n\n{format}",
        intro = UNIT_PROMPT_INTRO,
        subject = ctx.subject,
        grade = ctx.grade,
        chapters = chapters.join("\n"),
        key = ctx.concepts.key_concepts.join(", "),
        related = ctx.concepts.related_concepts.join(", "),
        contexts = ctx.global_contexts.join(", "),
        count = ctx.unit_count,
        fields = UNIT_PROMPT_FIELDS,
        format = UNIT_PROMPT_FORMAT,
    )
}
