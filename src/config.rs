// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default tag embedded in card QR payloads.
pub const DEFAULT_QR_TAG: &str = "MOVES-SSP";

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackendKind {
    /// One `<key>.json` file per record key under this directory.
    Files(PathBuf),
    /// Process memory only; everything is lost on restart.
    Memory,
}

/// Simulated network delays for the mocked backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    /// Email/password login and registration
    pub auth: Duration,
    /// Google / Facebook login
    pub provider: Duration,
    /// Registration form and file uploads
    pub upload: Duration,
}

impl SimulatedLatency {
    pub fn standard() -> Self {
        Self {
            auth: Duration::from_millis(1000),
            provider: Duration::from_millis(1500),
            upload: Duration::from_millis(1500),
        }
    }

    pub fn none() -> Self {
        Self {
            auth: Duration::ZERO,
            provider: Duration::ZERO,
            upload: Duration::ZERO,
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Record store backend
    pub store: StoreBackendKind,
    /// Tag prefix of the QR payload
    pub qr_tag: String,
    pub latency: SimulatedLatency,
    /// Directory that receives shared cards; sharing is unsupported when unset
    pub share_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store = match env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackendKind::Memory,
            Ok("files") | Err(_) => StoreBackendKind::Files(PathBuf::from(
                env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            )),
            Ok(other) => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        let latency = match env::var("SIMULATED_LATENCY").as_deref() {
            Ok("false") | Ok("0") | Ok("off") => SimulatedLatency::none(),
            _ => SimulatedLatency::standard(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            store,
            qr_tag: env::var("QR_TAG").unwrap_or_else(|_| DEFAULT_QR_TAG.to_string()),
            latency,
            share_dir: env::var("SHARE_DIR").ok().map(PathBuf::from),
        })
    }

    /// In-memory, zero-latency configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            store: StoreBackendKind::Memory,
            qr_tag: DEFAULT_QR_TAG.to_string(),
            latency: SimulatedLatency::none(),
            share_dir: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
