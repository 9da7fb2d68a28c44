use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

/// Failures of the descriptor store.
///
/// The first three are request-time lookups that the caller recovers from;
/// `MalformedDescriptorData` only happens while loading the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("subject '{subject}' not found (tried: {})", .attempted.join(", "))]
    SubjectNotFound {
        subject: String,
        attempted: Vec<String>,
    },

    #[error("grade band '{band}' not found for subject '{subject}'")]
    GradeBandNotFound { subject: String, band: String },

    #[error("criterion '{letter}' not found for subject '{subject}' in band '{band}'")]
    CriterionNotFound {
        subject: String,
        band: String,
        letter: String,
    },

    #[error("malformed descriptor data: {0}")]
    MalformedDescriptorData(String),
}

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not found: {message}")]
    UnknownSubject {
        message: String,
        available: Vec<String>,
    },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UnknownSubject { .. } => "UNKNOWN_SUBJECT",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_subjects: Vec<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownSubject { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let available_subjects = match self {
            AppError::UnknownSubject { available, .. } => available.clone(),
            _ => Vec::new(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            available_subjects,
        })
    }
}

impl From<DescriptorError> for AppError {
    fn from(err: DescriptorError) -> Self {
        match err {
            DescriptorError::SubjectNotFound { .. } => AppError::UnknownSubject {
                message: err.to_string(),
                available: Vec::new(),
            },
            DescriptorError::GradeBandNotFound { .. } | DescriptorError::CriterionNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            DescriptorError::MalformedDescriptorData(_) => AppError::InternalError(err.to_string()),
        }
    }
}
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalService(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON error: {}", err))
    }
}
impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::InternalError(err.message)
    }
}
impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.error_code());
            if let AppError::UnknownSubject { available, .. } = self {
                e.set("availableSubjects", available.clone());
            }
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
