//! Registration, login, and token enforcement.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use oracle_integration_tests::{TestContext, read_json};

#[tokio::test]
async fn test_register_returns_token_and_zero_balance_wallet() {
    let ctx = TestContext::new().await;

    let response = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({
                "email": "ada@example.com",
                "password": "password123",
                "name": "Ada",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["wallet"]["balance"], 0);
    assert_eq!(body["wallet"]["currency"], "NGN");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new().await;
    ctx.register("ada@example.com", "Ada").await;

    let response = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({
                "email": "ADA@example.com",
                "password": "password456",
                "name": "Other Ada",
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn test_login_returns_fresh_token() {
    let ctx = TestContext::new().await;
    ctx.register("ada@example.com", "Ada").await;

    let response = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({
                "email": "ada@example.com",
                "password": "password123",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let token = body["token"].as_str().unwrap();

    let me = ctx.get("/auth/me", Some(token)).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = read_json(me).await;
    assert_eq!(me["user"]["name"], "Ada");
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let ctx = TestContext::new().await;
    ctx.register("ada@example.com", "Ada").await;

    let response = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({
                "email": "ada@example.com",
                "password": "not-the-password",
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_and_garbage_tokens() {
    let ctx = TestContext::new().await;

    let no_token = ctx.get("/wallet/balance", None).await;
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let bad_token = ctx.get("/wallet/balance", Some("not.a.token")).await;
    assert_eq!(bad_token.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;
    let response = ctx.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
