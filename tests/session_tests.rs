// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Session lifecycle tests.
//!
//! These tests verify that:
//! 1. Every sign-in path leaves exactly one persisted user that survives a reload
//! 2. Logout removes the user and invalidates outstanding tokens
//! 3. Session cookies are set on sign-in and cleared on logout

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use campuspass::middleware::auth::create_jwt;
use serde_json::json;

mod common;

use common::{empty_request, json_body, json_request, send};

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

#[tokio::test]
async fn test_login_persists_mock_user_and_survives_reload() {
    let (app, state) = common::create_test_app().await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "whatever" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["user"]["id"], "user-123");
    assert_eq!(body["user"]["name"], "Mock User");
    assert_eq!(body["redirect"], "/dashboard");
    assert_eq!(body["notice"]["code"], "login_succeeded");

    let stored = state.store.get_user().unwrap().unwrap();
    assert_eq!(stored.id, "user-123");
    assert_eq!(stored.email, "ana@example.com");

    let (_, reloaded) = common::reload(&state).await;
    assert_eq!(reloaded.session.current().await.unwrap().id, "user-123");
}

#[tokio::test]
async fn test_provider_logins_fabricate_provider_users() {
    for (provider, email, name) in [
        ("google", "user@gmail.com", "Google User"),
        ("facebook", "user@facebook.com", "Facebook User"),
    ] {
        let (app, state) = common::create_test_app().await;

        let response = send(
            &app,
            empty_request(Method::POST, &format!("/auth/provider/{provider}"), None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let id = body["user"]["id"].as_str().unwrap().to_string();
        assert!(id.starts_with(&format!("{provider}-user-")), "id: {id}");
        assert_eq!(body["user"]["email"], email);
        assert_eq!(body["user"]["name"], name);
        assert_eq!(body["notice"]["code"], "provider_login_succeeded");
        assert_eq!(body["notice"]["variant"], "default");

        let (_, reloaded) = common::reload(&state).await;
        assert_eq!(reloaded.session.current().await.unwrap().id, id);
    }
}

#[tokio::test]
async fn test_unknown_provider_is_rejected() {
    let (app, state) = common::create_test_app().await;

    let response = send(&app, empty_request(Method::POST, "/auth/provider/github", None)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(state.store.get_user().unwrap().is_none());
}

#[tokio::test]
async fn test_register_creates_named_user() {
    let (app, state) = common::create_test_app().await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/auth/register",
            None,
            json!({
                "name": "Ana Souza",
                "email": "ana@example.com",
                "password": "secret",
                "confirmPassword": "secret"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["user"]["id"].as_str().unwrap().starts_with("user-"));
    assert_eq!(body["user"]["name"], "Ana Souza");
    assert_eq!(body["notice"]["code"], "account_created");

    let stored = state.store.get_user().unwrap().unwrap();
    assert_eq!(stored.name.as_deref(), Some("Ana Souza"));
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let (app, state) = common::create_test_app().await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/auth/register",
            None,
            json!({
                "name": "Ana Souza",
                "email": "ana@example.com",
                "password": "secret",
                "confirmPassword": "different"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "As senhas não coincidem.");
    assert!(state.store.get_user().unwrap().is_none());
}

#[tokio::test]
async fn test_login_requires_all_fields() {
    let (app, state) = common::create_test_app().await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/auth/login",
            None,
            json!({ "email": "", "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["details"],
        "Por favor, preencha todos os campos."
    );
    assert!(state.session.current().await.is_none());
}

#[tokio::test]
async fn test_logout_clears_session_and_invalidates_token() {
    let (app, state) = common::create_test_app().await;
    let token = common::login(&app).await;

    let response = send(&app, empty_request(Method::GET, "/api/documents", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, empty_request(Method::POST, "/auth/logout", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["redirect"], "/login");
    assert_eq!(body["notice"]["code"], "logged_out");

    assert!(state.store.get_user().unwrap().is_none());
    assert!(state.session.current().await.is_none());

    // The old token no longer names the active user.
    let response = send(&app, empty_request(Method::GET, "/api/documents", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (reloaded_app, reloaded) = common::reload(&state).await;
    assert!(reloaded.session.current().await.is_none());

    let response = send(&reloaded_app, empty_request(Method::GET, "/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn test_token_for_other_user_is_rejected() {
    let (app, state) = common::create_test_app().await;
    common::login(&app).await;

    let forged = create_jwt("someone-else", &state.config.jwt_signing_key).unwrap();
    let response = send(&app, empty_request(Method::GET, "/api/documents", Some(&forged))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_wrong_key_is_rejected() {
    let (app, _) = common::create_test_app().await;
    common::login(&app).await;

    let forged = create_jwt("user-123", b"another_key_that_is_long_enough!").unwrap();
    let response = send(&app, empty_request(Method::GET, "/api/documents", Some(&forged))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_email_is_rejected() {
    let (app, state) = common::create_test_app().await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/auth/login",
            None,
            json!({ "email": "ana.example.com", "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["details"], "E-mail inválido.");

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/auth/register",
            None,
            json!({
                "name": "Ana Souza",
                "email": "ana@",
                "password": "secret",
                "confirmPassword": "secret"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(state.store.get_user().unwrap().is_none());
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (app, _) = common::create_test_app().await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookies = set_cookie_headers(&response);
    let token_cookie = find_cookie(&set_cookies, "campuspass_token");
    assert!(token_cookie.contains("Path=/"));
    assert!(token_cookie.contains("HttpOnly"));
    assert!(token_cookie.contains("SameSite=Lax"));

    // The cookie alone is enough to reach protected routes.
    let cookie_pair = token_cookie.split(';').next().unwrap().to_string();
    let response = send(
        &app,
        Request::builder()
            .uri("/api/card-color")
            .header(header::COOKIE, cookie_pair)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_removes_session_cookie() {
    let (app, _) = common::create_test_app().await;

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .header(header::COOKIE, "campuspass_token=stale")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookies = set_cookie_headers(&response);
    let token_cookie = find_cookie(&set_cookies, "campuspass_token");
    assert!(token_cookie.contains("Path=/"));
    assert!(token_cookie.contains("Max-Age=0"));
}
