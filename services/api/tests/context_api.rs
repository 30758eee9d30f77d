mod common;

use axum::http::{StatusCode, header};
use common::{json_body, request, test_app};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wisby_api::{router::create_router, state::AppState};
use wisby_core::CoreError;
use wisby_core::api::{HealthResponse, IndexResponse, Message, Page, SignOutResponse};
use wisby_core::auth::{Auth, AuthConfig};
use wisby_core::models::{AuthSession, Grade, User};
use wisby_core::store::memory::MemoryStore;
use wisby_core::store::{GradeStore, SessionStore};

#[tokio::test]
async fn test_index_without_session() {
    let app = test_app();
    let response = app
        .router
        .oneshot(request("GET", "/api", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: IndexResponse = json_body(response).await;
    assert_eq!(
        body.message,
        "Context Database Result: hello world from DB!"
    );
    assert!(body.auth.user.is_none());
    assert!(body.auth.session.is_none());
}

#[tokio::test]
async fn test_index_with_session() {
    let app = test_app();
    let cookie = app.sign_in("u1", "user").await;
    let response = app
        .router
        .oneshot(request("GET", "/api", Some(&cookie), None))
        .await
        .unwrap();

    let body: IndexResponse = json_body(response).await;
    assert_eq!(body.auth.user.unwrap().id, "u1");
    assert_eq!(body.auth.session.unwrap().user_id, "u1");
}

#[tokio::test]
async fn test_forged_cookie_is_ignored() {
    let app = test_app();
    app.sign_in("u1", "user").await;
    let response = app
        .router
        .oneshot(request(
            "GET",
            "/api",
            Some("__Secure-better-auth.session_token=forged.AAAA"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: IndexResponse = json_body(response).await;
    assert!(body.auth.user.is_none());
}

#[tokio::test]
async fn test_get_session() {
    let app = test_app();
    let cookie = app.sign_in("u1", "admin").await;

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/api/auth/get-session", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let found: Option<AuthSession> = json_body(response).await;
    assert!(found.unwrap().user.is_admin());

    let response = app
        .router
        .oneshot(request("GET", "/api/auth/get-session", None, None))
        .await
        .unwrap();
    let body: Value = json_body(response).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_sign_out_revokes_session() {
    let app = test_app();
    let cookie = app.sign_in("u1", "user").await;

    let response = app
        .router
        .clone()
        .oneshot(request("POST", "/api/auth/sign-out", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("__Secure-better-auth.session_token="));
    assert!(set_cookie.contains("Max-Age=0"));
    let body: SignOutResponse = json_body(response).await;
    assert!(body.success);

    let response = app
        .router
        .oneshot(request("GET", "/api/user/me", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_falls_back() {
    let app = test_app();
    let response = app
        .router
        .oneshot(request("GET", "/api/books", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Message = json_body(response).await;
    assert_eq!(body.message, "Not Found - /api/books");
}

#[tokio::test]
async fn test_health_reports_driver() {
    let app = test_app();
    let response = app
        .router
        .oneshot(request("GET", "/api/system/health", None, None))
        .await
        .unwrap();

    let body: HealthResponse = json_body(response).await;
    assert_eq!(body.status, "ok");
    assert_eq!(body.database, "memory");
}

#[tokio::test]
async fn test_user_me() {
    let app = test_app();
    let cookie = app.sign_in("u7", "user").await;
    let response = app
        .router
        .oneshot(request("GET", "/api/user/me", Some(&cookie), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let user: User = json_body(response).await;
    assert_eq!(user.id, "u7");
}

#[tokio::test]
async fn test_update_grade() {
    let app = test_app();
    let cookie = app.sign_in("u1", "user").await;
    let grade = app.store.create_grade("Grade 5").await.unwrap();

    let body = format!(r#"{{"gradeId": "{}"}}"#, grade.id);
    let response = app
        .router
        .clone()
        .oneshot(request("PATCH", "/api/user/grade", Some(&cookie), Some(&body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: User = json_body(response).await;
    assert_eq!(user.grade_id.as_deref(), Some(grade.id.as_str()));

    let response = app
        .router
        .clone()
        .oneshot(request(
            "PATCH",
            "/api/user/grade",
            Some(&cookie),
            Some(r#"{"gradeId": ""}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let message: Message = json_body(response).await;
    assert_eq!(message.message, "Grade is required");

    let response = app
        .router
        .oneshot(request(
            "PATCH",
            "/api/user/grade",
            Some(&cookie),
            Some(r#"{"gradeId": "missing"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes() {
    let app = test_app();
    let user_cookie = app.sign_in("u1", "user").await;
    let admin_cookie = app.sign_in("a1", "admin").await;

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/api/user", Some(&user_cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/api/user?sort=asc", Some(&admin_cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: Page<User> = json_body(response).await;
    assert_eq!(page.meta.total_count, 2);

    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/grade",
            Some(&admin_cookie),
            Some(r#"{"name": "Grade 6"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .oneshot(request("GET", "/api/grade", None, None))
        .await
        .unwrap();
    let grades: Vec<Grade> = json_body(response).await;
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].name, "Grade 6");
}

#[tokio::test]
async fn test_cors_allows_trusted_origin_with_credentials() {
    let app = test_app();
    let preflight = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/tasks")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(preflight).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );

    let untrusted = axum::http::Request::builder()
        .method("GET")
        .uri("/api/system/health")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.oneshot(untrusted).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

struct UnreachableSessions;

#[async_trait::async_trait]
impl SessionStore for UnreachableSessions {
    async fn find_session(&self, _token: &str) -> Result<Option<AuthSession>, CoreError> {
        Err(CoreError::InvalidConfig("session store unreachable".to_string()))
    }

    async fn delete_session(&self, _token: &str) -> Result<bool, CoreError> {
        Err(CoreError::InvalidConfig("session store unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_session_lookup_failure_continues_signed_out() {
    let sessions = Arc::new(UnreachableSessions);
    let auth = Arc::new(Auth::new(AuthConfig::new(sessions, common::SECRET)).unwrap());
    let cookie = format!(
        "{}={}",
        auth.cookies().session_cookie_name(),
        auth.sign_token("token-u1")
    );
    let router = create_router(AppState::new(Arc::new(MemoryStore::new()), auth));

    let response = router
        .clone()
        .oneshot(request("GET", "/api", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert!(body["auth"]["user"].is_null());
    assert!(body["auth"]["session"].is_null());

    let response = router
        .oneshot(request("GET", "/api/tasks", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
