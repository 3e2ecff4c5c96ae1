// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Protected page view models.
//!
//! The session guard in `routes/mod.rs` redirects visitors without a session
//! to `/login` before any of these run.

use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::middleware::auth::AuthUser;
use crate::models::{CardColor, Document, DocumentType, Student};
use crate::routes::auth::HOME_PATH;
use crate::services::calendar::{important_dates, ImportantDate};
use crate::services::CardLayout;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
        .route("/registration", get(registration))
        .route("/id-card", get(id_card))
}

async fn index() -> Redirect {
    Redirect::to(HOME_PATH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RegistrationStatus {
    Pending,
    Complete,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardView {
    pub greeting: String,
    pub registration_status: RegistrationStatus,
    pub registration_action: String,
    pub card_available: bool,
    pub card_hint: String,
    pub document_count: usize,
    pub important_dates: Vec<ImportantDate>,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Json<DashboardView> {
    let complete = state.registration.student().is_some();
    let name = auth.user.name.as_deref().unwrap_or("Estudante");

    Json(DashboardView {
        greeting: format!("Olá, {}!", name),
        registration_status: if complete {
            RegistrationStatus::Complete
        } else {
            RegistrationStatus::Pending
        },
        registration_action: if complete {
            "Editar Cadastro"
        } else {
            "Completar Cadastro"
        }
        .to_string(),
        card_available: complete,
        card_hint: if complete {
            "Sua carteirinha está disponível para download e compartilhamento."
        } else {
            "Complete seu cadastro para gerar sua carteirinha."
        }
        .to_string(),
        document_count: state.registration.documents().len(),
        important_dates: important_dates(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RegistrationView {
    pub student: Option<Student>,
    pub documents: Vec<Document>,
    pub document_types: Vec<DocumentType>,
    /// Documents can only be attached once the personal form is saved
    pub documents_enabled: bool,
}

async fn registration(State(state): State<Arc<AppState>>) -> Json<RegistrationView> {
    let student = state.registration.student();
    Json(RegistrationView {
        documents_enabled: student.is_some(),
        student,
        documents: state.registration.documents(),
        document_types: DocumentType::ALL.to_vec(),
    })
}

/// The card page either shows the card or asks for the registration.
#[derive(Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum IdCardView {
    #[serde(rename_all = "camelCase")]
    Incomplete {
        title: String,
        description: String,
        action: String,
    },
    #[serde(rename_all = "camelCase")]
    Ready {
        layout: CardLayout,
        colors: Vec<CardColor>,
        download_url: String,
        share_url: String,
    },
}

async fn id_card(State(state): State<Arc<AppState>>) -> crate::error::Result<Json<IdCardView>> {
    let Some(student) = state.registration.student() else {
        return Ok(Json(IdCardView::Incomplete {
            title: "Cadastro incompleto".to_string(),
            description: "Você precisa completar seu cadastro para acessar sua carteirinha."
                .to_string(),
            action: "/registration".to_string(),
        }));
    };

    let color = state.store.get_card_color()?;
    Ok(Json(IdCardView::Ready {
        layout: state.cards.layout(&student, color),
        colors: CardColor::ALL.to_vec(),
        download_url: "/api/id-card/image".to_string(),
        share_url: "/api/id-card/share".to_string(),
    }))
}
