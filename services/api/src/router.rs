//! Axum Router Configuration
//!
//! Wraps the registered routes with the request-context middleware, request
//! tracing, CORS for the trusted origins, and a JSON 404 fallback.

use axum::{
    Json, Router,
    extract::OriginalUri,
    http::{HeaderValue, Method, StatusCode, header, request::Parts},
    middleware,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use wisby_core::api::Message;

use crate::{context::resolve_context, registry::register_routes, state::AppState};

async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Message::new(format!("Not Found - {}", uri.path()))),
    )
}

fn cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let auth = state.auth.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| auth.is_trusted_origin(o))
                    .unwrap_or(false)
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
}

/// Creates the main Axum router for the application.
pub fn create_router(state: Arc<AppState>) -> Router {
    register_routes(state.clone())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), resolve_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state))
}
