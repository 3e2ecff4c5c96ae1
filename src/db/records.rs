// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Typed record store over a [`KeyValueBackend`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::backend::{FileBackend, KeyValueBackend, MemoryBackend};
use super::{keys, StoreError};
use crate::config::StoreBackendKind;
use crate::models::{CardColor, Document, Student, User};

/// JSON record store. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Open the backend selected in configuration.
    pub fn open(kind: &StoreBackendKind) -> Result<Self, StoreError> {
        match kind {
            StoreBackendKind::Files(dir) => Ok(Self::new(Arc::new(FileBackend::open(dir)?))),
            StoreBackendKind::Memory => {
                tracing::info!("Using in-memory record store");
                Ok(Self::in_memory())
            }
        }
    }

    /// Fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    // ─── Generic Access ──────────────────────────────────────────

    pub fn get<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    pub fn set<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(value).map_err(|source| StoreError::Serialize { key, source })?;
        self.backend.set(key, &json)
    }

    pub fn remove(&self, key: &'static str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    // ─── User ────────────────────────────────────────────────────

    pub fn get_user(&self) -> Result<Option<User>, StoreError> {
        self.get(keys::USER)
    }

    pub fn set_user(&self, user: &User) -> Result<(), StoreError> {
        self.set(keys::USER, user)
    }

    pub fn remove_user(&self) -> Result<(), StoreError> {
        self.remove(keys::USER)
    }

    // ─── Student ─────────────────────────────────────────────────

    pub fn get_student(&self) -> Result<Option<Student>, StoreError> {
        self.get(keys::STUDENT)
    }

    pub fn set_student(&self, student: &Student) -> Result<(), StoreError> {
        self.set(keys::STUDENT, student)
    }

    // ─── Documents ───────────────────────────────────────────────

    /// All documents in upload order; empty when nothing was stored yet.
    pub fn get_documents(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.get(keys::DOCUMENTS)?.unwrap_or_default())
    }

    pub fn set_documents(&self, documents: &[Document]) -> Result<(), StoreError> {
        self.set(keys::DOCUMENTS, &documents)
    }

    // ─── Card Colour ─────────────────────────────────────────────

    pub fn get_card_color(&self) -> Result<CardColor, StoreError> {
        Ok(self.get(keys::CARD_COLOR)?.unwrap_or_default())
    }

    pub fn set_card_color(&self, color: CardColor) -> Result<(), StoreError> {
        self.set(keys::CARD_COLOR, &color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentStatus, DocumentType};
    use chrono::Utc;

    #[test]
    fn test_user_round_trip_and_remove() {
        let store = RecordStore::in_memory();
        let user = User {
            id: "user-123".to_string(),
            email: "a@b.com".to_string(),
            name: Some("Mock User".to_string()),
            student_id: None,
        };

        store.set_user(&user).unwrap();
        assert_eq!(store.get_user().unwrap(), Some(user));

        store.remove_user().unwrap();
        assert_eq!(store.get_user().unwrap(), None);
    }

    #[test]
    fn test_documents_default_to_empty() {
        let store = RecordStore::in_memory();
        assert!(store.get_documents().unwrap().is_empty());

        let now = Utc::now();
        let doc = Document {
            id: "doc-1".to_string(),
            student_id: "student-1".to_string(),
            doc_type: DocumentType::ResidenceProof,
            file_url: "blob:campuspass/1".to_string(),
            status: DocumentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        store.set_documents(&[doc.clone(), doc]).unwrap();
        assert_eq!(store.get_documents().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_record_is_reported() {
        let backend = MemoryBackend::new();
        backend.set(keys::STUDENT, "{not json").unwrap();
        let store = RecordStore::new(Arc::new(backend));

        let err = store.get_student().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { key: "student", .. }));
    }

    #[test]
    fn test_card_color_defaults_to_purple() {
        let store = RecordStore::in_memory();
        assert_eq!(store.get_card_color().unwrap(), CardColor::Purple);

        store.set_card_color(CardColor::Pink).unwrap();
        assert_eq!(store.get_card_color().unwrap(), CardColor::Pink);
    }
}
