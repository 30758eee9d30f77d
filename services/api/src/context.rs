//! Request Context
//!
//! [`resolve_context`] runs before every route. It resolves the caller's
//! session once and stores a [`RequestContext`] in the request extensions, so
//! handlers and guards read the same `user`/`session` pair without touching
//! the auth layer again.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;
use wisby_core::models::{AuthSession, Session, User};
use wisby_core::store::DataStore;

use crate::error::ApiError;
use crate::state::AppState;

/// Per-request view of who is calling and where data lives.
#[derive(Clone)]
pub struct RequestContext {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub db: Arc<dyn DataStore>,
}

impl RequestContext {
    pub fn new(found: Option<AuthSession>, db: Arc<dyn DataStore>) -> Self {
        match found {
            Some(AuthSession { user, session, .. }) => Self {
                user: Some(user),
                session: Some(session),
                db,
            },
            None => Self {
                user: None,
                session: None,
                db,
            },
        }
    }
}

/// Never rejects: a failed lookup is logged and treated as signed out.
pub async fn resolve_context(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let found = match state.auth.get_session(req.headers()).await {
        Ok(found) => found,
        Err(err) => {
            warn!(error = %err, "Session lookup failed; continuing without a session");
            None
        }
    };

    req.extensions_mut()
        .insert(RequestContext::new(found, state.db.clone()));
    next.run(req).await
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| {
                ApiError::InternalServerError(anyhow::anyhow!(
                    "request context missing; is resolve_context installed?"
                ))
            })
    }
}

/// A signed-in caller. Rejects with 401 otherwise.
pub struct RequireUser {
    pub user: User,
    pub session: Session,
    pub db: Arc<dyn DataStore>,
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;
        match (ctx.user, ctx.session) {
            (Some(user), Some(session)) => Ok(Self {
                user,
                session,
                db: ctx.db,
            }),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// A signed-in admin. Everyone else gets 401.
pub struct RequireAdmin {
    pub user: User,
    pub db: Arc<dyn DataStore>,
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser { user, db, .. } = RequireUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::Unauthorized);
        }
        Ok(Self { user, db })
    }
}
