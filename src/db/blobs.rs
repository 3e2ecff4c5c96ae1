// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Ephemeral storage for uploaded files.
//!
//! Uploads get a `blob:` URL that only lives as long as the process, like a
//! browser object URL. Records that point at a blob survive a restart; the
//! bytes do not.

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// URL prefix of every blob handed out by this store.
pub const BLOB_URL_PREFIX: &str = "blob:campuspass/";

/// Uploaded file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// In-memory blob table. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    blobs: Arc<DashMap<String, Arc<Blob>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file and return its URL.
    pub fn create_url(&self, content_type: &str, bytes: Vec<u8>) -> String {
        let id = Uuid::new_v4().to_string();
        tracing::debug!(blob_id = %id, size = bytes.len(), "Stored blob");
        self.blobs.insert(
            id.clone(),
            Arc::new(Blob {
                content_type: content_type.to_string(),
                bytes,
            }),
        );
        format!("{}{}", BLOB_URL_PREFIX, id)
    }

    /// Look up a blob by full URL.
    pub fn resolve(&self, url: &str) -> Option<Arc<Blob>> {
        url.strip_prefix(BLOB_URL_PREFIX)
            .and_then(|id| self.get(id))
    }

    /// Look up a blob by id (the part after the prefix).
    pub fn get(&self, id: &str) -> Option<Arc<Blob>> {
        self.blobs.get(id).map(|b| Arc::clone(b.value()))
    }

    /// Number of live blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Drop a blob. Unknown URLs are ignored.
    pub fn revoke(&self, url: &str) {
        if let Some(id) = url.strip_prefix(BLOB_URL_PREFIX) {
            self.blobs.remove(id);
        }
    }
}
