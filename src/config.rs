use std::{env, path::PathBuf};

use secrecy::SecretString;

const DEFAULT_GEMINI_MODELS: &str = "gemini-2.5-flash,gemini-2.0-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub units_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub gemini_api_key: Option<SecretString>,
    pub gemini_models: Vec<String>,
    pub generation_retry_delay_ms: u64,
    pub descriptors_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "planpei".to_string()),
            units_collection: env::var("UNITS_COLLECTION").unwrap_or_else(|_| "units".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            gemini_models: parse_model_list(
                &env::var("GEMINI_MODELS").unwrap_or_else(|_| DEFAULT_GEMINI_MODELS.to_string()),
            ),
            generation_retry_delay_ms: env::var("GEMINI_RETRY_DELAY_MS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(2000),
            descriptors_path: env::var("DESCRIPTORS_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn generation_enabled(&self) -> bool {
        self.gemini_api_key.is_some() && !self.gemini_models.is_empty()
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "planpei-test".to_string(),
            units_collection: "units".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            gemini_api_key: None,
            gemini_models: parse_model_list(DEFAULT_GEMINI_MODELS),
            generation_retry_delay_ms: 0,
            descriptors_path: None,
        }
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(str::to_string)
        .collect()
}
