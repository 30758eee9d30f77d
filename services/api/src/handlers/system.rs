use axum::{Json, Router, routing::get};
use std::sync::Arc;
use wisby_core::api::HealthResponse;

use crate::context::RequestContext;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

pub async fn health(ctx: RequestContext) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        database: ctx.db.driver().to_string(),
    })
}
