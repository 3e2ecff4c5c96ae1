// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Middleware modules (session guard, security headers).

pub mod auth;
pub mod security;

pub use auth::{require_auth, require_page_session};
