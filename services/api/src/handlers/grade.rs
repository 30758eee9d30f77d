use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use std::sync::Arc;
use tracing::info;
use wisby_core::api::CreateGrade;
use wisby_core::models::Grade;

use crate::context::{RequestContext, RequireAdmin};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_grades).post(create_grade))
}

pub async fn list_grades(ctx: RequestContext) -> Result<Json<Vec<Grade>>, ApiError> {
    Ok(Json(ctx.db.list_grades().await?))
}

pub async fn create_grade(
    admin: RequireAdmin,
    JsonBody(payload): JsonBody<CreateGrade>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.validate().map_err(ApiError::invalid)?;
    let grade = admin.db.create_grade(name).await?;
    info!(grade_id = %grade.id, admin_id = %admin.user.id, "Grade created");
    Ok((StatusCode::CREATED, Json(grade)))
}
