// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! File-backed persistence tests: state written by one process is restored
//! by the next, and damaged records do not stop startup.

use axum::http::{Method, StatusCode};
use campuspass::config::{Config, StoreBackendKind};
use campuspass::db::RecordStore;
use campuspass::time_utils::now_millis;
use std::path::PathBuf;

mod common;

use common::{empty_request, json_body, send, upload_request};

fn file_config(tag: &str) -> (Config, PathBuf) {
    let dir = std::env::temp_dir().join(format!("campuspass-{}-{}", tag, now_millis()));
    let config = Config {
        store: StoreBackendKind::Files(dir.clone()),
        ..Config::test_default()
    };
    (config, dir)
}

#[tokio::test]
async fn test_state_survives_restart_with_file_store() {
    let (config, dir) = file_config("restart");

    let store = RecordStore::open(&config.store).unwrap();
    let (app, _) = common::create_test_app_with(config.clone(), store).await;
    let (token, code) = common::register_student(&app).await;
    let response = send(
        &app,
        upload_request("/api/documents/incomeProof", &token, "application/pdf", b"pdf".to_vec()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for key in ["user", "student", "documents"] {
        assert!(dir.join(format!("{key}.json")).exists(), "missing {key}.json");
    }

    // Fresh store and managers over the same directory.
    let store = RecordStore::open(&config.store).unwrap();
    let (app, state) = common::create_test_app_with(config, store).await;

    assert_eq!(state.session.current().await.unwrap().id, "user-123");
    let student = state.registration.student().unwrap();
    assert_eq!(student.unique_code.as_deref(), Some(code.as_str()));
    assert_eq!(state.registration.documents().len(), 1);

    let response = send(&app, empty_request(Method::GET, "/api/student", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["student"]["uniqueCode"], code.as_str());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_corrupt_records_are_discarded_at_startup() {
    let (config, dir) = file_config("corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("user.json"), "{not json").unwrap();
    std::fs::write(dir.join("documents.json"), "[1, 2").unwrap();

    let store = RecordStore::open(&config.store).unwrap();
    let (app, state) = common::create_test_app_with(config, store).await;

    assert!(state.session.current().await.is_none());
    assert!(state.registration.documents().is_empty());

    let response = send(&app, empty_request(Method::GET, "/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Logging in again overwrites the damaged record.
    common::login(&app).await;
    assert_eq!(state.store.get_user().unwrap().unwrap().id, "user-123");

    std::fs::remove_dir_all(&dir).ok();
}
