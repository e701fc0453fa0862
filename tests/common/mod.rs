use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use neuropath_backend::db::Database;

pub async fn create_test_app() -> Router {
    let db = Database::connect_in_memory()
        .await
        .expect("in-memory database");
    neuropath_backend::create_app(db)
}

pub async fn get_json(app: &Router, uri: &str) -> (axum::http::StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (axum::http::StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

pub async fn get_json_with_token(
    app: &Router,
    uri: &str,
    token: &str,
) -> (axum::http::StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (axum::http::StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Registers a fresh user and returns their bearer token.
pub async fn register_user(app: &Router, email: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/auth/register",
        serde_json::json!({
            "name": "Test Learner",
            "email": email,
            "password": "password123",
        }),
        None,
    )
    .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}
