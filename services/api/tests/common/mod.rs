#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use wisby_api::{router::create_router, state::AppState};
use wisby_core::auth::{Auth, AuthConfig};
use wisby_core::models::{Session, User};
use wisby_core::store::memory::MemoryStore;

pub const SECRET: &str = "integration-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub auth: Arc<Auth>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(Auth::new(AuthConfig::new(store.clone(), SECRET)).unwrap());
    let router = create_router(AppState::new(store.clone(), auth.clone()));
    TestApp {
        router,
        store,
        auth,
    }
}

pub fn user(id: &str, role: &str) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: format!("User {}", id),
        email: format!("{}@example.com", id),
        email_verified: true,
        image: None,
        created_at: now,
        updated_at: now,
        role: Some(role.to_string()),
        banned: Some(false),
        ban_reason: None,
        ban_expires: None,
        grade_id: None,
    }
}

impl TestApp {
    /// Seeds a user with a live session and returns the `Cookie` header value.
    pub async fn sign_in(&self, id: &str, role: &str) -> String {
        let token = format!("token-{}", uuid::Uuid::new_v4());
        let now = Utc::now();
        self.store.insert_user(user(id, role)).await;
        self.store
            .insert_session(Session {
                id: format!("session-{}", id),
                token: token.clone(),
                user_id: id.to_string(),
                expires_at: now + Duration::days(1),
                ip_address: None,
                user_agent: None,
                impersonated_by: None,
                created_at: now,
                updated_at: now,
            })
            .await;
        format!(
            "{}={}",
            self.auth.cookies().session_cookie_name(),
            self.auth.sign_token(&token)
        )
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
