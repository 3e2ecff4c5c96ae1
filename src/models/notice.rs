// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! User-facing notices and the outcome type the managers return.
//!
//! A precondition failure is not an error: the operation is skipped and the
//! caller gets a notice to show, the same way the web UI raises a toast.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Stable identifier for each notice, so clients and tests can match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum NoticeCode {
    LoginSucceeded,
    ProviderLoginSucceeded,
    AccountCreated,
    LoggedOut,
    LoginRequired,
    CompleteRegistrationFirst,
    RegistrationSaved,
    DocumentUploaded,
    ProfilePictureUpdated,
    CardSaved,
    CardSaveFailed,
    ShareStarted,
    ShareUnsupported,
    ShareFailed,
}

/// Toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notice {
    pub code: NoticeCode,
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success(code: NoticeCode, title: &str, description: impl Into<String>) -> Self {
        Self {
            code,
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn destructive(code: NoticeCode, title: &str, description: impl Into<String>) -> Self {
        Self {
            code,
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn login_required() -> Self {
        Self::destructive(
            NoticeCode::LoginRequired,
            "Erro",
            "Você precisa estar logado para continuar.",
        )
    }

    pub fn complete_registration_first() -> Self {
        Self::destructive(
            NoticeCode::CompleteRegistrationFirst,
            "Erro",
            "Complete o cadastro pessoal primeiro.",
        )
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

/// Result of a manager operation that may be skipped on a failed precondition.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    /// The operation ran and produced `value`.
    Completed { value: T, notice: Option<Notice> },
    /// A precondition failed; nothing was mutated.
    Aborted(Notice),
}

impl<T> Outcome<T> {
    pub fn completed(value: T, notice: Notice) -> Self {
        Outcome::Completed {
            value,
            notice: Some(notice),
        }
    }

    pub fn silent(value: T) -> Self {
        Outcome::Completed {
            value,
            notice: None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted(_))
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Outcome::Completed { notice, .. } => notice.as_ref(),
            Outcome::Aborted(notice) => Some(notice),
        }
    }

    /// The produced value, or `None` if the operation was skipped.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Completed { value, .. } => Some(value),
            Outcome::Aborted(_) => None,
        }
    }
}
