// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Sign-in, sign-up and logout routes.
//!
//! Every sign-in path succeeds: the backend is a mock. The handlers only
//! check that the form is filled in before handing off to the session
//! manager, then issue the session cookie.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{AuthProvider, Notice, User};
use crate::routes::settle;
use crate::AppState;

/// Where the web app lands after a successful sign-in.
pub const HOME_PATH: &str = "/dashboard";

const FILL_ALL_FIELDS: &str = "Por favor, preencha todos os campos.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/provider/{provider}", post(provider_login))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "E-mail inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "Por favor, preencha todos os campos."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Por favor, preencha todos os campos."))]
    pub name: String,
    #[validate(email(message = "E-mail inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "Por favor, preencha todos os campos."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "As senhas não coincidem."))]
    pub confirm_password: String,
}

/// Body returned by every sign-in route.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub user: User,
    /// Same JWT as the cookie, for clients that send a Bearer header
    pub token: String,
    pub redirect: String,
    pub notice: Option<Notice>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub redirect: String,
    pub notice: Option<Notice>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProviderOption {
    pub slug: String,
    pub label: String,
    pub action: String,
}

/// Descriptor for the public login and register pages.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthPage {
    pub page: String,
    pub title: String,
    pub action: String,
    pub fields: Vec<String>,
    pub providers: Vec<ProviderOption>,
    /// Link to the other auth page
    pub alternate: String,
}

fn providers() -> Vec<ProviderOption> {
    [AuthProvider::Google, AuthProvider::Facebook]
        .into_iter()
        .map(|p| ProviderOption {
            slug: p.slug().to_string(),
            label: format!("Continuar com {}", p.display_name()),
            action: format!("/auth/provider/{}", p.slug()),
        })
        .collect()
}

async fn login_page() -> Json<AuthPage> {
    Json(AuthPage {
        page: "login".to_string(),
        title: "Entrar".to_string(),
        action: "/auth/login".to_string(),
        fields: vec!["email".to_string(), "password".to_string()],
        providers: providers(),
        alternate: "/register".to_string(),
    })
}

async fn register_page() -> Json<AuthPage> {
    Json(AuthPage {
        page: "register".to_string(),
        title: "Criar conta".to_string(),
        action: "/auth/register".to_string(),
        fields: ["name", "email", "password", "confirmPassword"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        providers: providers(),
        alternate: "/login".to_string(),
    })
}

/// Build the session cookie for `token`.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Issue a token for `user` and attach it to the response.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
    notice: Option<Notice>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        Json(SessionResponse {
            user,
            token,
            redirect: HOME_PATH.to_string(),
            notice,
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let form = LoginForm {
        email: form.email.trim().to_string(),
        ..form
    };
    if form.email.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation(FILL_ALL_FIELDS.to_string()));
    }
    form.validate()?;

    let (user, notice) = settle(state.session.login(&form.email, &form.password).await?)?;
    tracing::info!(user_id = %user.id, "Login succeeded");

    start_session(&state, jar, user, notice)
}

async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<RegisterForm>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let form = RegisterForm {
        email: form.email.trim().to_string(),
        ..form
    };
    // Missing fields win over a password mismatch.
    if form.name.is_empty()
        || form.email.is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err(AppError::Validation(FILL_ALL_FIELDS.to_string()));
    }
    form.validate()?;

    let (user, notice) = settle(
        state
            .session
            .register(&form.email, &form.password, form.name.trim())
            .await?,
    )?;
    tracing::info!(user_id = %user.id, "Account registered");

    start_session(&state, jar, user, notice)
}

async fn provider_login(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let provider: AuthProvider = provider.parse().map_err(AppError::Validation)?;

    let (user, notice) = settle(state.session.login_with_provider(provider).await?)?;
    tracing::info!(user_id = %user.id, provider = %provider, "Provider login succeeded");

    start_session(&state, jar, user, notice)
}

async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LogoutResponse>)> {
    let ((), notice) = settle(state.session.logout().await?)?;
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    Ok((
        jar,
        Json(LogoutResponse {
            redirect: crate::middleware::auth::LOGIN_PATH.to_string(),
            notice,
        }),
    ))
}
