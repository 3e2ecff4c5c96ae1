// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! campuspass: student-transport ID cards.
//!
//! Users sign in, register as students, upload supporting documents and get
//! a digital card with a QR code that can be downloaded as a JPEG. The
//! authentication and review backend is a mock: every sign-in succeeds and
//! documents stay pending.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::{BlobStore, RecordStore};
use services::{
    BitmapRasterizer, CardService, DirectoryShare, RegistrationManager, SessionManager,
    ShareTarget,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: RecordStore,
    pub blobs: BlobStore,
    pub session: SessionManager,
    pub registration: RegistrationManager,
    pub cards: CardService,
}

impl AppState {
    /// Wire the managers over `store` and restore any persisted session.
    pub async fn new(config: Config, store: RecordStore) -> anyhow::Result<Self> {
        let blobs = BlobStore::new();
        let session = SessionManager::new(store.clone(), config.latency);
        let registration =
            RegistrationManager::new(store.clone(), blobs.clone(), session.clone(), config.latency);

        let share_target: Option<Arc<dyn ShareTarget>> = match &config.share_dir {
            Some(dir) => Some(Arc::new(DirectoryShare::new(dir)?)),
            None => None,
        };
        let cards = CardService::new(
            blobs.clone(),
            Arc::new(BitmapRasterizer),
            share_target,
            config.qr_tag.clone(),
        );

        session.restore().await;
        registration.restore();

        Ok(Self {
            config,
            store,
            blobs,
            session,
            registration,
            cards,
        })
    }
}
