use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{UnitPlan, UnitPlanFilter},
    repositories::UnitPlanRepository,
};

pub mod fixtures {
    use crate::{
        descriptors::{Curriculum, DescriptorStore},
        models::domain::UnitPlan,
    };
    use serde_json::json;

    /// A small descriptor table covering both band schemes, an alias band
    /// and a subject key stored with underscores.
    pub fn sample_descriptor_json() -> &'static str {
        r#"{
  "subjects": {
    "design": {
      "bands": {
        "pei1": {
          "A": {
            "title": "Recherche et analyse",
            "levels": {
              "0": "L'élève n'atteint aucun des niveaux décrits ci-dessous.",
              "1-2": "L'élève : i. indique le besoin d'apporter une solution à un problème ; ii. indique les conclusions des recherches qu'il a menées.",
              "3-4": "L'élève : i. résume le besoin d'apporter une solution à un problème ; ii. indique, avec de l'aide, quelques étapes des recherches ; iii. indique les caractéristiques principales d'un produit existant ; iv. résume quelques-unes des principales conclusions des recherches.",
              "5-6": "L'élève : i. explique le besoin d'apporter une solution à un problème ; ii. indique et hiérarchise, avec de l'aide, les grandes étapes des recherches ; iii. résume les caractéristiques principales d'un produit existant ; iv. résume les principales conclusions des recherches pertinentes.",
              "7-8": "L'élève : i. explique et justifie le besoin d'apporter une solution à un problème ; ii. indique et hiérarchise, avec peu d'aide, les grandes étapes des recherches ; iii. décrit les caractéristiques principales d'un produit existant ; iv. présente les principales conclusions des recherches pertinentes."
            }
          },
          "B": {
            "title": "Développement des idées",
            "levels": {
              "0": "L'élève n'atteint aucun des niveaux décrits ci-dessous.",
              "1-2": "L'élève : i. indique un critère de réussite élémentaire ; ii. présente une idée de conception.",
              "7-8": "L'élève : i. développe une liste des critères de réussite ; ii. présente des idées de conception réalisables ; iii. présente la conception retenue."
            }
          }
        },
        "pei2": "same_as_pei1"
      }
    },
    "individus_et_sociétés": {
      "bands": {
        "pei1": {
          "A": {
            "title": "Connaissances et compréhension",
            "levels": {
              "0": "L'élève n'atteint aucun des niveaux décrits ci-dessous.",
              "1-2": "L'élève : i. utilise un vocabulaire limité ; ii. démontre une connaissance élémentaire du contenu.",
              "7-8": "L'élève : i. utilise un vocabulaire pertinent de manière cohérente ; ii. démontre une connaissance détaillée du contenu."
            }
          }
        }
      }
    },
    "arts": {
      "bands": {
        "débutant": {
          "A": {
            "title": "Recherche",
            "levels": {
              "0": "L'élève n'atteint aucun des niveaux décrits ci-dessous.",
              "1-2": "L'élève : i. énumère des aspects limités de l'œuvre d'art créée par d'autres personnes.",
              "7-8": "L'élève : i. décrit une œuvre d'art créée par d'autres personnes ; ii. démontre l'utilisation approfondie des connaissances acquises."
            }
          },
          "D": {
            "title": "Réaction",
            "levels": {
              "0": "L'élève n'atteint aucun des niveaux décrits ci-dessous.",
              "1-2": "L'élève : i. fait des liens limités entre l'art et le contexte.",
              "7-8": "L'élève : i. établit des liens entre l'art et le contexte ; ii. évalue son travail artistique."
            }
          }
        },
        "intermédiaire": {
          "A": {
            "title": "Recherche",
            "levels": {
              "0": "L'élève n'atteint aucun des niveaux décrits ci-dessous.",
              "1-2": "L'élève : i. décrit de façon limitée un mouvement artistique.",
              "7-8": "L'élève : i. décrit en détail un mouvement artistique ; ii. analyse une œuvre d'art."
            }
          }
        },
        "compétent": {
          "A": {
            "title": "Recherche",
            "levels": {
              "0": "L'élève n'atteint aucun des niveaux décrits ci-dessous.",
              "1-2": "L'élève : i. présente une recherche limitée.",
              "7-8": "L'élève : i. présente une recherche approfondie ; ii. analyse avec perspicacité une œuvre d'art."
            }
          }
        }
      },
      "grade_bands": {
        "1": "débutant",
        "2": "débutant",
        "3": "intermédiaire",
        "4": "intermédiaire",
        "5": "compétent"
      }
    }
  }
}"#
    }

    pub fn sample_store() -> DescriptorStore {
        DescriptorStore::from_json(sample_descriptor_json())
            .expect("sample descriptors should validate")
    }

    /// Planning concepts for the subjects of [`sample_descriptor_json`].
    pub fn sample_curriculum() -> Curriculum {
        Curriculum::from_json(
            r#"{
  "global_contexts": [
    "Identités et relations",
    "Orientation dans l'espace et dans le temps",
    "Innovation scientifique et technique"
  ],
  "subjects": {
    "design": {
      "key_concepts": ["Communautés", "Communication", "Développement", "Systèmes"],
      "related_concepts": ["Adaptation", "Collaboration", "Durabilité", "Ergonomie"]
    },
    "individus_et_sociétés": {
      "key_concepts": ["Changement", "Systèmes"],
      "related_concepts": ["Causalité", "Culture"]
    },
    "arts": {
      "key_concepts": ["Esthétique", "Identité"],
      "related_concepts": ["Composition", "Expression", "Style"]
    }
  }
}"#,
        )
        .expect("sample curriculum should validate")
    }

    pub fn sample_unit_plan(teacher: &str, attempt: u32) -> UnitPlan {
        UnitPlan::new(
            teacher,
            "Sciences",
            "PEI 3",
            attempt,
            "L'énergie",
            json!({"titre_unite": "L'énergie", "criteres": ["A", "C"]}),
        )
    }
}

pub mod test_helpers {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::{
        fixtures::{sample_curriculum, sample_store},
        InMemoryUnitPlanRepository,
    };
    use crate::{app_state::AppState, config::Config};

    /// State backed by the sample descriptors, an in-memory repository and
    /// no generation model.
    pub fn test_app_state() -> AppState {
        AppState::from_parts(
            Arc::new(sample_store()),
            Arc::new(sample_curriculum()),
            Arc::new(InMemoryUnitPlanRepository::new()),
            None,
            Config::test_config(),
        )
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

pub struct InMemoryUnitPlanRepository {
    plans: Arc<RwLock<HashMap<String, UnitPlan>>>,
}

impl InMemoryUnitPlanRepository {
    pub fn new() -> Self {
        Self {
            plans: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UnitPlanRepository for InMemoryUnitPlanRepository {
    async fn create(&self, plan: UnitPlan) -> AppResult<UnitPlan> {
        let mut plans = self.plans.write().await;
        let taken = plans.values().any(|p| {
            p.teacher == plan.teacher
                && p.subject == plan.subject
                && p.grade == plan.grade
                && p.attempt == plan.attempt
        });
        if taken || plans.contains_key(&plan.id) {
            return Err(AppError::AlreadyExists(format!(
                "unit plan attempt {} for {}",
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
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.attempt.cmp(&a.attempt))
        });
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

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_sample_store_subjects() {
        let store = sample_store();
        assert_eq!(
            store.subject_keys(),
            vec!["arts", "design", "individus_et_sociétés"]
        );
    }

    #[actix_rt::test]
    async fn test_in_memory_latest_attempt() {
        let repository = InMemoryUnitPlanRepository::new();
        repository.create(sample_unit_plan("mme-durand", 1)).await.unwrap();
        repository.create(sample_unit_plan("mme-durand", 3)).await.unwrap();
        repository.create(sample_unit_plan("m-martin", 7)).await.unwrap();

        assert_eq!(
            repository
                .latest_attempt("mme-durand", "Sciences", "PEI 3")
                .await
                .unwrap(),
            Some(3)
        );
        assert_eq!(
            repository
                .latest_attempt("mme-durand", "Design", "PEI 3")
                .await
                .unwrap(),
            None
        );
    }
}
