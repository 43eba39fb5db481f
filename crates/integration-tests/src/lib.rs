//! Integration test harness for Oracle Commerce.
//!
//! Builds the full API router over a throwaway document store and drives
//! it with in-process requests, so tests exercise routing, extractors,
//! serialization, and the services together without a listening socket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p oracle-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use secrecy::SecretString;
use tower::ServiceExt;

use oracle_api::config::ApiConfig;
use oracle_api::db::DocumentStore;
use oracle_api::state::AppState;

/// A running in-process API instance over a temp-dir store.
pub struct TestContext {
    /// Keeps the store directory alive for the test's duration.
    _dir: tempfile::TempDir,
    app: Router,
}

impl TestContext {
    /// Build a fresh API over an empty document store.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = ApiConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_file: dir.path().join("oracle.json"),
            jwt_secret: SecretString::from("kX9#mP2$vL8@qR5!wT3^nB7&zD1*fG4j"),
            sentry_dsn: None,
        };
        let store = DocumentStore::open(config.data_file.clone()).await.unwrap();
        let app = oracle_api::app(AppState::new(&config, store));

        Self { _dir: dir, app }
    }

    /// Send a request without a body.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.request("GET", uri, token, None).await
    }

    /// Send a request with an optional JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Register a user and return their bearer token.
    pub async fn register(&self, email: &str, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": "password123",
                    "name": name,
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = read_json(response).await;
        body["token"].as_str().unwrap().to_owned()
    }

    /// Register a user and credit their wallet in one step.
    pub async fn register_funded(&self, email: &str, name: &str, amount: i64) -> String {
        let token = self.register(email, name).await;
        let response = self
            .request(
                "POST",
                "/wallet/topup",
                Some(&token),
                Some(serde_json::json!({ "amount": amount })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        token
    }
}

/// Read a response body as JSON.
pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
