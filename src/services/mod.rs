// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Services module - business logic layer.

pub mod calendar;
pub mod card;
pub mod raster;
pub mod registration;
pub mod session;
pub mod share;

pub use card::{CardArtifact, CardLayout, CardService, ShareReport};
pub use raster::{BitmapRasterizer, Rasterizer, RenderError};
pub use registration::{FileUpload, RegistrationManager};
pub use session::SessionManager;
pub use share::{DirectoryShare, ShareError, ShareTarget};
