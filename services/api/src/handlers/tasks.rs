use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use tracing::info;
use wisby_core::api::{CreateTask, ListQuery, Page, PatchTask};
use wisby_core::models::Task;
use wisby_core::pagination::PageRequest;

use crate::context::{RequestContext, RequireUser};
use crate::error::ApiError;
use crate::extract::{JsonBody, NumericId, QueryParams};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).patch(patch_task).delete(delete_task))
}

/// One page of tasks, newest first unless `sort=asc`.
pub async fn list_tasks(
    ctx: RequestContext,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Page<Task>>, ApiError> {
    let request = PageRequest::from_query(&query).map_err(ApiError::invalid)?;
    let (rows, total) = ctx.db.list_tasks(&request).await?;
    Ok(Json(Page::new(rows, &request, total)))
}

pub async fn create_task(
    auth: RequireUser,
    JsonBody(payload): JsonBody<CreateTask>,
) -> Result<impl IntoResponse, ApiError> {
    let task = payload.validate().map_err(ApiError::invalid)?;
    let created = auth.db.create_task(&task).await?;
    info!(task_id = created.id, user_id = %auth.user.id, "Task created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_task(
    ctx: RequestContext,
    NumericId(id): NumericId,
) -> Result<Json<Task>, ApiError> {
    ctx.db
        .get_task(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn patch_task(
    auth: RequireUser,
    NumericId(id): NumericId,
    JsonBody(payload): JsonBody<PatchTask>,
) -> Result<Json<Task>, ApiError> {
    let changes = payload.validate().map_err(ApiError::invalid)?;
    auth.db
        .update_task(id, &changes)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn delete_task(
    auth: RequireUser,
    NumericId(id): NumericId,
) -> Result<StatusCode, ApiError> {
    if auth.db.delete_task(id).await? {
        info!(task_id = id, user_id = %auth.user.id, "Task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found())
    }
}
