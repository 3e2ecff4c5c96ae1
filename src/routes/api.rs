// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! API routes for signed-in users.

use crate::error::{AppError, Result};
use crate::models::{CardColor, Document, DocumentType, Notice, Student, StudentForm};
use crate::routes::settle;
use crate::services::calendar::{events_on, important_dates, ImportantDate};
use crate::services::{FileUpload, ShareReport};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// API routes (require a session via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/student", get(get_student).post(submit_student))
        .route("/api/documents", get(list_documents))
        .route("/api/documents/{doc_type}", post(upload_document))
        .route("/api/profile-picture", post(upload_profile_picture))
        .route("/api/id-card/code", get(get_card_code))
        .route("/api/id-card/image", get(download_card))
        .route("/api/id-card/share", post(share_card))
        .route("/api/card-color", get(get_card_color).put(set_card_color))
        .route("/api/calendar", get(get_calendar))
        .route("/api/blobs/{id}", get(get_blob))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

// ─── Student ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StudentResponse {
    pub student: Student,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

async fn get_student(State(state): State<Arc<AppState>>) -> Result<Json<StudentResponse>> {
    let student = state
        .registration
        .student()
        .ok_or_else(|| AppError::NotFound("No student registered".to_string()))?;
    Ok(Json(StudentResponse {
        student,
        notice: None,
    }))
}

async fn submit_student(
    State(state): State<Arc<AppState>>,
    Json(form): Json<StudentForm>,
) -> Result<Json<StudentResponse>> {
    let form = form.normalized();
    form.validate()?;

    let (student, notice) = settle(state.registration.submit_student_info(form).await?)?;
    Ok(Json(StudentResponse { student, notice }))
}

// ─── Documents ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DocumentResponse {
    pub document: Document,
    pub notice: Option<Notice>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DocumentsResponse {
    pub documents: Vec<Document>,
}

/// Read a raw upload body. The content type defaults to octet-stream.
fn file_upload(headers: &HeaderMap, body: Bytes) -> Result<FileUpload> {
    if body.is_empty() {
        return Err(AppError::Validation(
            "Selecione um arquivo para enviar.".to_string(),
        ));
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(FileUpload {
        content_type,
        bytes: body.to_vec(),
    })
}

async fn list_documents(State(state): State<Arc<AppState>>) -> Json<DocumentsResponse> {
    Json(DocumentsResponse {
        documents: state.registration.documents(),
    })
}

async fn upload_document(
    State(state): State<Arc<AppState>>,
    Path(doc_type): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DocumentResponse>> {
    let doc_type: DocumentType = doc_type.parse().map_err(AppError::Validation)?;
    let file = file_upload(&headers, body)?;

    let (document, notice) = settle(state.registration.upload_document(doc_type, file).await?)?;
    Ok(Json(DocumentResponse { document, notice }))
}

async fn upload_profile_picture(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StudentResponse>> {
    let file = file_upload(&headers, body)?;
    if !file.content_type.starts_with("image/") {
        return Err(AppError::Validation(
            "A foto de perfil deve ser uma imagem.".to_string(),
        ));
    }

    let (student, notice) = settle(state.registration.upload_profile_picture(file).await?)?;
    Ok(Json(StudentResponse { student, notice }))
}

// ─── ID Card ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CardCodeResponse {
    /// Empty when no student is registered
    pub code: String,
    pub notice: Option<Notice>,
}

/// Unique code of the current card. Never fails; a missing student is
/// reported through the notice with an empty code.
async fn get_card_code(State(state): State<Arc<AppState>>) -> Json<CardCodeResponse> {
    let outcome = state.registration.save_id_card();
    let notice = outcome.notice().cloned();
    Json(CardCodeResponse {
        code: outcome.into_value().unwrap_or_default(),
        notice,
    })
}

fn registered_student(state: &AppState) -> Result<Student> {
    state
        .registration
        .student()
        .ok_or_else(|| AppError::Precondition(Notice::complete_registration_first()))
}

async fn download_card(State(state): State<Arc<AppState>>) -> Result<Response> {
    let student = registered_student(&state)?;
    let color = state.store.get_card_color()?;

    let (artifact, notice) = state
        .cards
        .download(&student, color)
        .await
        .map_err(AppError::Render)?;

    tracing::debug!(notice = ?notice.code, "Serving card download");
    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", header_safe(&artifact.filename)),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// Registration numbers are free text; keep the header value plain ASCII.
fn header_safe(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

async fn share_card(State(state): State<Arc<AppState>>) -> Result<Json<ShareReport>> {
    let student = registered_student(&state)?;
    let color = state.store.get_card_color()?;
    Ok(Json(state.cards.share(&student, color).await))
}

// ─── Card Colour ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ColorOption {
    pub color: CardColor,
    pub name: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CardColorResponse {
    pub color: CardColor,
    pub options: Vec<ColorOption>,
}

#[derive(Deserialize)]
pub struct CardColorRequest {
    pub color: String,
}

fn card_color_response(color: CardColor) -> CardColorResponse {
    CardColorResponse {
        color,
        options: CardColor::ALL
            .into_iter()
            .map(|c| ColorOption {
                color: c,
                name: c.palette().name.to_string(),
            })
            .collect(),
    }
}

async fn get_card_color(State(state): State<Arc<AppState>>) -> Result<Json<CardColorResponse>> {
    Ok(Json(card_color_response(state.store.get_card_color()?)))
}

async fn set_card_color(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CardColorRequest>,
) -> Result<Json<CardColorResponse>> {
    let color: CardColor = req.color.parse().map_err(AppError::Validation)?;
    state.store.set_card_color(color)?;
    tracing::info!(color = ?color, "Card colour changed");
    Ok(Json(card_color_response(color)))
}

// ─── Calendar ────────────────────────────────────────────────

#[derive(Deserialize)]
struct CalendarQuery {
    /// Only events on this day (YYYY-MM-DD)
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalendarResponse {
    pub events: Vec<ImportantDate>,
}

async fn get_calendar(Query(query): Query<CalendarQuery>) -> Json<CalendarResponse> {
    let events = match query.date {
        Some(date) => events_on(date),
        None => important_dates(),
    };
    Json(CalendarResponse { events })
}

// ─── Blobs ───────────────────────────────────────────────────

async fn get_blob(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Response> {
    let blob = state
        .blobs
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Blob {} not found", id)))?;

    Ok((
        [(header::CONTENT_TYPE, blob.content_type.clone())],
        blob.bytes.clone(),
    )
        .into_response())
}
