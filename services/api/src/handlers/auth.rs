//! Session endpoints. Sign-in and sign-up are served by the auth provider;
//! these only read and revoke the session carried by the cookie.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::info;
use wisby_core::api::SignOutResponse;
use wisby_core::models::AuthSession;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get-session", get(get_session))
        .route("/sign-out", post(sign_out))
}

/// The current session, or `null`.
pub async fn get_session(ctx: RequestContext) -> Json<Option<AuthSession>> {
    let found = match (ctx.user, ctx.session) {
        (Some(user), Some(session)) => Some(AuthSession::new(user, session)),
        _ => None,
    };
    Json(found)
}

pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SignOutResponse>), ApiError> {
    if state.auth.sign_out(&headers).await? {
        info!("Session revoked");
    }
    let jar = jar.add(state.auth.cookies().expired_session_cookie());
    Ok((jar, Json(SignOutResponse { success: true })))
}
