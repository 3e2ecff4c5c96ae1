// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Persistence layer: JSON record store and ephemeral blob store.

pub mod backend;
pub mod blobs;
pub mod records;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use blobs::{Blob, BlobStore};
pub use records::RecordStore;

/// Record keys as constants. The layout is flat: one record of each kind.
pub mod keys {
    pub const USER: &str = "user";
    pub const STUDENT: &str = "student";
    pub const DOCUMENTS: &str = "documents";
    pub const CARD_COLOR: &str = "card-color";
}

/// Record store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on record '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize record '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
