use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{GenerateUnitsRequest, SaveUnitPlanRequest, UnitPlanQuery},
        response::ApiResponse,
    },
};

/// Proposes units for a list of chapters; nothing is stored.
#[post("/api/units/generate")]
pub async fn generate_units(
    state: web::Data<AppState>,
    request: web::Json<GenerateUnitsRequest>,
) -> Result<HttpResponse, AppError> {
    let data = state
        .unit_generation_service
        .generate(request.into_inner())
        .await?;

    let message = format!(
        "{} units ({})",
        data.units.len(),
        if data.ai_generated { "model" } else { "template" }
    );
    Ok(HttpResponse::Ok().json(ApiResponse { data, message }))
}

#[post("/api/units")]
pub async fn save_unit_plan(
    state: web::Data<AppState>,
    request: web::Json<SaveUnitPlanRequest>,
) -> Result<HttpResponse, AppError> {
    let plan = state.unit_plan_service.save(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(plan))
}

#[get("/api/units/{id}")]
pub async fn get_unit_plan(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let plan = state.unit_plan_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[get("/api/teachers/{teacher}/units")]
pub async fn list_teacher_unit_plans(
    state: web::Data<AppState>,
    teacher: web::Path<String>,
    query: web::Query<UnitPlanQuery>,
) -> Result<HttpResponse, AppError> {
    let plans = state
        .unit_plan_service
        .list_for_teacher(&teacher, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(plans))
}
