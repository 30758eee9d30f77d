use axum::{Json, Router, routing::get};
use std::sync::Arc;
use wisby_core::api::{AuthSnapshot, IndexResponse};

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// Echoes the caller's auth state along with a database round-trip.
pub async fn index(ctx: RequestContext) -> Result<Json<IndexResponse>, ApiError> {
    let result = ctx.db.ping().await?;
    Ok(Json(IndexResponse {
        message: format!("Context Database Result: {}", result),
        auth: AuthSnapshot {
            user: ctx.user,
            session: ctx.session,
        },
    }))
}
