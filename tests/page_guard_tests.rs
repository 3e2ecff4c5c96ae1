// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Route guard, CORS and page view tests.
//!
//! These tests verify that:
//! 1. Protected pages redirect to /login without a session
//! 2. Protected API routes answer 401 without a session
//! 3. Public routes and CORS preflight work without a session

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

use common::{empty_request, json_body, send};

#[tokio::test]
async fn test_pages_redirect_to_login_without_session() {
    let (app, _) = common::create_test_app().await;

    for uri in ["/", "/dashboard", "/registration", "/id-card"] {
        let response = send(&app, empty_request(Method::GET, uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "uri {uri}");
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }
}

#[tokio::test]
async fn test_pages_redirect_with_invalid_token() {
    let (app, _) = common::create_test_app().await;

    let response = send(&app, empty_request(Method::GET, "/dashboard", Some("invalid.token"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_api_without_session_is_unauthorized() {
    let (app, _) = common::create_test_app().await;

    for (method, uri) in [
        (Method::GET, "/api/student"),
        (Method::POST, "/api/student"),
        (Method::GET, "/api/documents"),
        (Method::POST, "/api/documents/residenceProof"),
        (Method::POST, "/api/profile-picture"),
        (Method::GET, "/api/id-card/code"),
        (Method::GET, "/api/id-card/image"),
        (Method::POST, "/api/id-card/share"),
        (Method::GET, "/api/card-color"),
        (Method::PUT, "/api/card-color"),
        (Method::GET, "/api/calendar"),
        (Method::GET, "/api/blobs/anything"),
    ] {
        let response = send(&app, empty_request(method.clone(), uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let (app, _) = common::create_test_app().await;
    let token = common::login(&app).await;

    let response = send(&app, empty_request(Method::GET, "/", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard"
    );
}

#[tokio::test]
async fn test_dashboard_tracks_registration_status() {
    let (app, _) = common::create_test_app().await;
    let token = common::login(&app).await;

    let response = send(&app, empty_request(Method::GET, "/dashboard", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["greeting"], "Olá, Mock User!");
    assert_eq!(body["registrationStatus"], "pending");
    assert_eq!(body["cardAvailable"], false);
    assert_eq!(body["importantDates"].as_array().unwrap().len(), 6);

    let response = send(
        &app,
        common::json_request(Method::POST, "/api/student", Some(&token), common::student_form()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, empty_request(Method::GET, "/dashboard", Some(&token))).await;
    let body = json_body(response).await;
    assert_eq!(body["registrationStatus"], "complete");
    assert_eq!(body["registrationAction"], "Editar Cadastro");
    assert_eq!(body["cardAvailable"], true);
}

#[tokio::test]
async fn test_id_card_page_without_student_asks_for_registration() {
    let (app, _) = common::create_test_app().await;
    let token = common::login(&app).await;

    let response = send(&app, empty_request(Method::GET, "/id-card", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["state"], "incomplete");
    assert_eq!(body["action"], "/registration");
}

#[tokio::test]
async fn test_registration_page_lists_document_types() {
    let (app, _) = common::create_test_app().await;
    let token = common::login(&app).await;

    let response = send(&app, empty_request(Method::GET, "/registration", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["student"].is_null());
    assert_eq!(body["documentsEnabled"], false);
    assert_eq!(
        body["documentTypes"],
        serde_json::json!(["residenceProof", "incomeProof", "enrollmentProof"])
    );
}

#[tokio::test]
async fn test_public_routes_need_no_session() {
    let (app, _) = common::create_test_app().await;

    let response = send(&app, empty_request(Method::GET, "/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");

    let response = send(&app, empty_request(Method::GET, "/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["page"], "login");
    assert_eq!(body["providers"].as_array().unwrap().len(), 2);

    let response = send(&app, empty_request(Method::GET, "/register", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["alternate"], "/login");
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/student")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let (app, _) = common::create_test_app().await;

    let response = send(&app, empty_request(Method::GET, "/dashboard", None)).await;
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
}
