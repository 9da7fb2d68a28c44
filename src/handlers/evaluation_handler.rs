use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{request::EvaluationRequest, response::ApiResponse},
};

/// Builds the data map for a multi-criteria evaluation document.
#[post("/api/evaluations")]
pub async fn create_evaluation(
    state: web::Data<AppState>,
    request: web::Json<EvaluationRequest>,
) -> Result<HttpResponse, AppError> {
    let data = state
        .evaluation_service
        .build_evaluation(request.into_inner())
        .await?;

    let message = format!(
        "{} exercises for {} criteria",
        data.exercices.len(),
        data.criteres_summary.len()
    );
    Ok(HttpResponse::Ok().json(ApiResponse { data, message }))
}
