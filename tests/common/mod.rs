#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use jobly_api::auth::Claims;
use jobly_api::AppState;

pub use jobly_api::testing::MemoryStorage;

pub const SECRET: &str = "test-secret";

pub fn storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}

pub fn app(db: &Arc<MemoryStorage>) -> Router {
    jobly_api::app(AppState::new(db.clone(), SECRET))
}

pub fn token(username: &str, is_admin: bool) -> String {
    token_signed_with(username, is_admin, SECRET)
}

pub fn token_signed_with(username: &str, is_admin: bool, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        username: username.to_string(),
        is_admin,
        iat: Some(now),
        exp: Some(now + 3600),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("failed to sign test token")
}

pub fn admin_token() -> String {
    token("u2", true)
}

pub fn user_token() -> String {
    token("u1", false)
}

/// Send one request through the router and decode the JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };
    (status, json)
}
