use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Exercise, GeneratedUnit},
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const ATTEMPTS_PER_MODEL: u32 = 2;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json)?\s*\n([\s\S]*?)```").expect("code fence is a valid regex pattern")
});

/// Source of generated exercises for an evaluation prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseGenerator: Send + Sync {
    async fn generate_exercises(&self, prompt: &str) -> AppResult<Vec<Exercise>>;
}

/// Source of unit proposals for a unit-planning prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitGenerator: Send + Sync {
    async fn generate_units(&self, prompt: &str) -> AppResult<Vec<GeneratedUnit>>;
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ExercisePayload {
    #[serde(default)]
    exercices: Vec<Exercise>,
}

#[derive(Debug, Deserialize)]
struct UnitPayload {
    #[serde(default)]
    unites: Vec<GeneratedUnit>,
}

pub struct GeminiModelService {
    client: Client,
    api_key: SecretString,
    models: Vec<String>,
    retry_delay: Duration,
}

impl GeminiModelService {
    pub fn new(api_key: SecretString, models: Vec<String>, retry_delay: Duration) -> Self {
        Self {
            client: Client::new(),
            api_key,
            models,
            retry_delay,
        }
    }

    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.generation_enabled() {
            return None;
        }
        let api_key = config.gemini_api_key.clone()?;
        Some(Self::new(
            api_key,
            config.gemini_models.clone(),
            Duration::from_millis(config.generation_retry_delay_ms),
        ))
    }

    async fn call_model(&self, model: &str, prompt: &str) -> AppResult<String> {
        let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "{} returned {}: {}",
                model, status, detail
            )));
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text: String = payload
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(AppError::ExternalService(format!(
                "{} returned no text",
                model
            )));
        }

        Ok(text)
    }

    /// Tries each model in order until one returns text that `parse` accepts.
    async fn generate_with<T>(
        &self,
        what: &str,
        prompt: &str,
        parse: fn(&str) -> AppResult<Vec<T>>,
    ) -> AppResult<Vec<T>> {
        let mut last_error =
            AppError::ExternalService("no generation model configured".to_string());

        for model in &self.models {
            for attempt in 1..=ATTEMPTS_PER_MODEL {
                log::info!("Trying {} (attempt {}/{})", model, attempt, ATTEMPTS_PER_MODEL);

                let result = match self.call_model(model, prompt).await {
                    Ok(text) => parse(&text),
                    Err(e) => Err(e),
                };

                match result {
                    Ok(items) => {
                        log::info!("Generated {} {} with {}", items.len(), what, model);
                        return Ok(items);
                    }
                    Err(e) => {
                        log::error!(
                            "Generation of {} attempt {} with {} failed: {}",
                            what,
                            attempt,
                            model,
                            e
                        );
                        let retry = attempt < ATTEMPTS_PER_MODEL && is_transient(&e);
                        last_error = e;
                        if !retry {
                            break;
                        }
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl ExerciseGenerator for GeminiModelService {
    async fn generate_exercises(&self, prompt: &str) -> AppResult<Vec<Exercise>> {
        self.generate_with("exercises", prompt, parse_exercise_payload)
            .await
    }
}

#[async_trait]
impl UnitGenerator for GeminiModelService {
    async fn generate_units(&self, prompt: &str) -> AppResult<Vec<GeneratedUnit>> {
        self.generate_with("units", prompt, parse_unit_payload).await
    }
}

/// Overload responses are worth a second try on the same model.
fn is_transient(err: &AppError) -> bool {
    let message = err.to_string();
    message.contains("503") || message.contains("overloaded")
}

/// Returns the body of the first fenced block, or the text unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    if !text.contains("```") {
        return text;
    }
    CODE_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |body| body.as_str())
}

fn parse_fenced<T: DeserializeOwned>(text: &str) -> AppResult<T> {
    Ok(serde_json::from_str(strip_code_fence(text).trim())?)
}

pub fn parse_exercise_payload(text: &str) -> AppResult<Vec<Exercise>> {
    parse_fenced::<ExercisePayload>(text).map(|payload| payload.exercices)
}

pub fn parse_unit_payload(text: &str) -> AppResult<Vec<GeneratedUnit>> {
    parse_fenced::<UnitPayload>(text).map(|payload| payload.unites)
}
