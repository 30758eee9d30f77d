use axum::{
    Json, Router,
    routing::{get, patch},
};
use std::sync::Arc;
use tracing::info;
use wisby_core::api::{ListQuery, Page, UpdateUserGrade};
use wisby_core::models::User;
use wisby_core::pagination::PageRequest;

use crate::context::{RequireAdmin, RequireUser};
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(me))
        .route("/grade", patch(update_grade))
}

pub async fn me(auth: RequireUser) -> Json<User> {
    Json(auth.user)
}

/// Assigns the caller to an existing grade.
pub async fn update_grade(
    auth: RequireUser,
    JsonBody(payload): JsonBody<UpdateUserGrade>,
) -> Result<Json<User>, ApiError> {
    let grade_id = payload.validate().map_err(ApiError::invalid)?;
    if auth.db.get_grade(grade_id).await?.is_none() {
        return Err(ApiError::NotFound("Grade not found".to_string()));
    }
    let user = auth
        .db
        .set_user_grade(&auth.user.id, grade_id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    info!(user_id = %user.id, grade_id, "User grade updated");
    Ok(Json(user))
}

pub async fn list_users(
    admin: RequireAdmin,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Page<User>>, ApiError> {
    let request = PageRequest::from_query(&query).map_err(ApiError::invalid)?;
    let (rows, total) = admin.db.list_users(&request).await?;
    Ok(Json(Page::new(rows, &request, total)))
}
