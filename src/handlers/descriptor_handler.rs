use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError};

#[get("/api/subjects")]
pub async fn list_subjects(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "subjects": state.descriptor_service.subjects()
    }))
}

#[get("/api/descriptors/{subject}/{grade}/{criterion}")]
pub async fn get_criterion(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, AppError> {
    let (subject, grade, criterion) = path.into_inner();
    let view = state
        .descriptor_service
        .criterion(&subject, &grade, &criterion)?;
    Ok(HttpResponse::Ok().json(view))
}
