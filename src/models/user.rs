// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! User model for the session and the record store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Authenticated user, persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Synthetic id (`user-123`, `user-<millis>`, `google-user-<millis>`...)
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Set once the user has submitted the registration form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// Third-party identity providers offered on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Facebook,
}

impl AuthProvider {
    /// Lowercase slug, used in user ids and routes.
    pub fn slug(self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Facebook => "facebook",
        }
    }

    /// Display name used in notices.
    pub fn display_name(self) -> &'static str {
        match self {
            AuthProvider::Google => "Google",
            AuthProvider::Facebook => "Facebook",
        }
    }

    /// Mailbox the mock provider hands back.
    pub fn mock_email(self) -> &'static str {
        match self {
            AuthProvider::Google => "user@gmail.com",
            AuthProvider::Facebook => "user@facebook.com",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(AuthProvider::Google),
            "facebook" => Ok(AuthProvider::Facebook),
            other => Err(format!("Unsupported login provider: {}", other)),
        }
    }
}
