// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use campuspass::config::Config;
use campuspass::db::RecordStore;
use campuspass::routes::create_router;
use campuspass::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), RecordStore::in_memory()).await
}

/// Create a test app with a custom config and store.
#[allow(dead_code)]
pub async fn create_test_app_with(config: Config, store: RecordStore) -> (Router, Arc<AppState>) {
    let state = Arc::new(
        AppState::new(config, store)
            .await
            .expect("Failed to build app state"),
    );
    (create_router(state.clone()), state)
}

/// Simulate a page reload: new managers over the same persisted records.
/// Blobs do not survive, like browser object URLs.
#[allow(dead_code)]
pub async fn reload(state: &AppState) -> (Router, Arc<AppState>) {
    create_test_app_with(state.config.clone(), state.store.clone()).await
}

/// Send a request and return the response.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Build a JSON request, optionally carrying a Bearer token.
#[allow(dead_code)]
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodyless request, optionally carrying a Bearer token.
#[allow(dead_code)]
pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a raw upload request.
#[allow(dead_code)]
pub fn upload_request(uri: &str, token: &str, content_type: &str, bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as raw bytes.
#[allow(dead_code)]
pub async fn raw_body(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

/// Log in with email/password and return the session token.
#[allow(dead_code)]
pub async fn login(app: &Router) -> String {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "secret" }),
        ),
    )
    .await;
    assert!(response.status().is_success(), "login failed");
    json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// A complete registration form.
#[allow(dead_code)]
pub fn student_form() -> Value {
    json!({
        "name": "Ana Souza",
        "email": "ana@example.com",
        "registrationNumber": "2024001",
        "course": "engenharia_civil",
        "graduationYear": "2027",
        "campus": "Centro"
    })
}

/// Log in and submit the registration form. Returns the token and the
/// student's unique code.
#[allow(dead_code)]
pub async fn register_student(app: &Router) -> (String, String) {
    let token = login(app).await;
    let response = send(
        app,
        json_request(Method::POST, "/api/student", Some(&token), student_form()),
    )
    .await;
    assert!(response.status().is_success(), "registration failed");
    let body = json_body(response).await;
    let code = body["student"]["uniqueCode"].as_str().unwrap().to_string();
    (token, code)
}

/// `STU-` followed by six base36 upper-case characters.
#[allow(dead_code)]
pub fn is_unique_code(code: &str) -> bool {
    code.len() == 10
        && code.starts_with("STU-")
        && code[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}
