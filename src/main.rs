// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! campuspass API server
//!
//! Serves the student registration flow and renders transport ID cards.

use campuspass::{config::Config, db::RecordStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting campuspass API");

    let store = RecordStore::open(&config.store)?;
    let state = Arc::new(AppState::new(config.clone(), store).await?);

    if let Some(user) = state.session.current().await {
        tracing::info!(user_id = %user.id, "Active session restored from store");
    }

    let app = campuspass::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("campuspass=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
