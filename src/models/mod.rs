// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Data models for the application.

pub mod card;
pub mod document;
pub mod notice;
pub mod student;
pub mod user;

pub use card::{CardColor, CardPalette};
pub use document::{Document, DocumentStatus, DocumentType};
pub use notice::{Notice, NoticeCode, NoticeVariant, Outcome};
pub use student::{Student, StudentForm};
pub use user::{AuthProvider, User};
