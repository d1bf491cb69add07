use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::common::{get, seed_advocate, send, test_app, token_for, CaseSeed};

#[tokio::test]
async fn missing_token_is_401() {
    let (app, _pool, _guard) = test_app().await;

    let detail = format!("/api/v1/cases/{}", uuid::Uuid::new_v4());
    for uri in [
        "/api/v1/cases",
        "/api/v1/cases/search?q=ab",
        "/api/v1/cases/upcoming-hearings",
        "/api/v1/cases/stats",
        detail.as_str(),
    ] {
        let (status, body) = get(&app, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["kind"], "Unauthorized");
    }
}

#[tokio::test]
async fn garbage_token_is_401() {
    let (app, _pool, _guard) = test_app().await;

    let (status, _) = get(&app, "/api/v1/cases", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_401() {
    let (app, _pool, _guard) = test_app().await;

    let now = Utc::now();
    let claims = server::auth::jwt::Claims {
        sub: uuid::Uuid::new_v4(),
        email: "late@test.com".to_string(),
        role: "advocate".to_string(),
        iat: (now - Duration::hours(2)).timestamp(),
        exp: (now - Duration::hours(1)).timestamp(),
        jti: None,
        typ: "access".to_string(),
    };
    let secret = std::env::var("JWT_SECRET").unwrap();
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    let (status, _) = get(&app, "/api/v1/cases", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_cookie_authenticates() {
    let (app, pool, _guard) = test_app().await;

    let advocate = seed_advocate(&pool).await;
    CaseSeed::new(advocate).insert(&pool).await;

    let req = Request::builder()
        .uri("/api/v1/cases")
        .header(
            header::COOKIE,
            format!("caseload_access={}", token_for(advocate)),
        )
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let (app, _pool, _guard) = test_app().await;

    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, req).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn health_and_docs_need_no_token() {
    let (app, _pool, _guard) = test_app().await;

    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "connected");

    let req = Request::builder().uri("/docs").body(Body::empty()).unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}
