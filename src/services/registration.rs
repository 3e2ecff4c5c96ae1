// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Registration manager: owns the student profile and uploaded documents.

use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::SimulatedLatency;
use crate::db::{BlobStore, RecordStore};
use crate::error::{AppError, Result};
use crate::models::{
    Document, DocumentStatus, DocumentType, Notice, NoticeCode, Outcome, Student, StudentForm,
    User,
};
use crate::services::SessionManager;
use crate::time_utils::now_millis;

/// Prefix of every student unique code.
pub const UNIQUE_CODE_PREFIX: &str = "STU-";
const UNIQUE_CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Largest multiple of 36 below 256; bytes at or above it are redrawn.
const UNBIASED_LIMIT: u8 = 252;

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Generate `STU-` followed by six random base36 characters.
pub fn generate_unique_code(rng: &SystemRandom) -> Result<String> {
    let mut code = String::with_capacity(UNIQUE_CODE_PREFIX.len() + UNIQUE_CODE_LEN);
    code.push_str(UNIQUE_CODE_PREFIX);

    let mut buf = [0u8; 16];
    while code.len() < UNIQUE_CODE_PREFIX.len() + UNIQUE_CODE_LEN {
        rng.fill(&mut buf)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG unavailable")))?;
        for b in buf.iter().copied().filter(|b| *b < UNBIASED_LIMIT) {
            if code.len() == UNIQUE_CODE_PREFIX.len() + UNIQUE_CODE_LEN {
                break;
            }
            code.push(CODE_ALPHABET[(b % 36) as usize] as char);
        }
    }
    Ok(code)
}

#[derive(Default)]
struct RegistrationState {
    student: Option<Student>,
    documents: Vec<Document>,
}

/// Shared registration state. Cheap to clone.
#[derive(Clone)]
pub struct RegistrationManager {
    inner: Arc<RegistrationInner>,
}

struct RegistrationInner {
    store: RecordStore,
    blobs: BlobStore,
    session: SessionManager,
    latency: SimulatedLatency,
    rng: SystemRandom,
    state: RwLock<RegistrationState>,
    /// Serializes mutations so overlapping uploads cannot drop each other.
    writer: Mutex<()>,
}

impl RegistrationManager {
    pub fn new(
        store: RecordStore,
        blobs: BlobStore,
        session: SessionManager,
        latency: SimulatedLatency,
    ) -> Self {
        Self {
            inner: Arc::new(RegistrationInner {
                store,
                blobs,
                session,
                latency,
                rng: SystemRandom::new(),
                state: RwLock::new(RegistrationState::default()),
                writer: Mutex::new(()),
            }),
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, RegistrationState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, RegistrationState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the persisted student and documents.
    ///
    /// Unreadable records are logged and treated as absent.
    pub fn restore(&self) {
        let student = self.inner.store.get_student().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable student record");
            None
        });
        let documents = self.inner.store.get_documents().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable document list");
            Vec::new()
        });

        tracing::info!(
            has_student = student.is_some(),
            documents = documents.len(),
            "Restored registration state"
        );

        let mut state = self.state_mut();
        state.student = student;
        state.documents = documents;
    }

    /// Current student snapshot.
    pub fn student(&self) -> Option<Student> {
        self.state().student.clone()
    }

    /// Uploaded documents in upload order.
    pub fn documents(&self) -> Vec<Document> {
        self.state().documents.clone()
    }

    /// Create (or update) the student profile from the registration form.
    ///
    /// The form is expected to be validated already. Requires an active user,
    /// and that user must still be active once the submission completes.
    /// A student linked to another user is replaced, along with its documents.
    pub async fn submit_student_info(&self, form: StudentForm) -> Result<Outcome<Student>> {
        let _guard = self.inner.writer.lock().await;

        let Some(user) = self.inner.session.current().await else {
            tracing::warn!("Registration submitted without an active user");
            return Ok(Outcome::Aborted(Notice::login_required()));
        };

        tokio::time::sleep(self.inner.latency.upload).await;

        // Logins and logouts wait until the user link below is written.
        let _session = self.inner.session.hold().await;
        let user = match self.inner.session.current().await {
            Some(active) if active.id == user.id => active,
            _ => {
                tracing::warn!(user_id = %user.id, "Session changed during registration");
                return Ok(Outcome::Aborted(Notice::login_required()));
            }
        };

        let now = Utc::now();
        let course = form.resolved_course();
        let linked_id = self.linked_student_id(&user)?;
        let existing = self.student();

        let (student, replaced) = match existing {
            // The unique code, id and photo survive a resubmission.
            Some(prev) if linked_id.as_deref() == Some(prev.id.as_str()) => (
                Student {
                    name: form.name,
                    email: form.email,
                    registration_number: form.registration_number,
                    course,
                    graduation_year: form.graduation_year,
                    campus: form.campus,
                    updated_at: now,
                    ..prev
                },
                None,
            ),
            other => (
                Student {
                    id: format!("student-{}", now_millis()),
                    name: form.name,
                    email: form.email,
                    registration_number: form.registration_number,
                    course,
                    graduation_year: form.graduation_year,
                    campus: form.campus,
                    profile_picture: None,
                    unique_code: Some(generate_unique_code(&self.inner.rng)?),
                    created_at: now,
                    updated_at: now,
                },
                other,
            ),
        };

        if let Some(prev) = &replaced {
            self.inner.store.set_documents(&[])?;
            let documents = std::mem::take(&mut self.state_mut().documents);
            for url in documents
                .iter()
                .map(|d| d.file_url.as_str())
                .chain(prev.profile_picture.as_deref())
            {
                self.inner.blobs.revoke(url);
            }
            tracing::info!(
                student_id = %prev.id,
                documents = documents.len(),
                "Replaced student of another user"
            );
        }

        self.inner.store.set_student(&student)?;
        self.state_mut().student = Some(student.clone());

        // Only the persisted user learns its student id; the session copy is
        // refreshed on the next restore.
        let linked = User {
            student_id: Some(student.id.clone()),
            ..user
        };
        self.inner.store.set_user(&linked)?;

        let code = student.unique_code.clone().unwrap_or_default();
        tracing::info!(
            user_id = %linked.id,
            student_id = %student.id,
            unique_code = %code,
            "Student registration saved"
        );

        Ok(Outcome::completed(
            student,
            Notice::success(
                NoticeCode::RegistrationSaved,
                "Cadastro realizado com sucesso!",
                format!("Seu código único é: {}", code),
            ),
        ))
    }

    /// The student id linked to `user`, from the session copy or the
    /// persisted record of the same user.
    fn linked_student_id(&self, user: &User) -> Result<Option<String>> {
        if user.student_id.is_some() {
            return Ok(user.student_id.clone());
        }
        Ok(self
            .inner
            .store
            .get_user()?
            .filter(|persisted| persisted.id == user.id)
            .and_then(|persisted| persisted.student_id))
    }

    /// Attach a supporting document. Same-type documents accumulate.
    pub async fn upload_document(
        &self,
        doc_type: DocumentType,
        file: FileUpload,
    ) -> Result<Outcome<Document>> {
        let _guard = self.inner.writer.lock().await;

        let Some(student) = self.student() else {
            return Ok(Outcome::Aborted(Notice::complete_registration_first()));
        };

        tokio::time::sleep(self.inner.latency.upload).await;

        let now = Utc::now();
        let document = Document {
            id: format!("doc-{}", Uuid::new_v4()),
            student_id: student.id,
            doc_type,
            file_url: self.inner.blobs.create_url(&file.content_type, file.bytes),
            status: DocumentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let mut documents = self.documents();
        documents.push(document.clone());
        if let Err(e) = self.inner.store.set_documents(&documents) {
            self.inner.blobs.revoke(&document.file_url);
            return Err(e.into());
        }
        self.state_mut().documents = documents;

        tracing::info!(
            document_id = %document.id,
            doc_type = %doc_type,
            "Document uploaded"
        );

        Ok(Outcome::completed(
            document,
            Notice::success(
                NoticeCode::DocumentUploaded,
                "Documento enviado",
                "Seu documento foi enviado e está em análise.",
            ),
        ))
    }

    /// Replace the student's profile picture.
    pub async fn upload_profile_picture(&self, file: FileUpload) -> Result<Outcome<Student>> {
        let _guard = self.inner.writer.lock().await;

        let Some(student) = self.student() else {
            return Ok(Outcome::Aborted(Notice::complete_registration_first()));
        };

        tokio::time::sleep(self.inner.latency.upload).await;

        let previous = student.profile_picture.clone();
        let url = self.inner.blobs.create_url(&file.content_type, file.bytes);
        let updated = Student {
            profile_picture: Some(url.clone()),
            updated_at: Utc::now(),
            ..student
        };

        if let Err(e) = self.inner.store.set_student(&updated) {
            self.inner.blobs.revoke(&url);
            return Err(e.into());
        }
        self.state_mut().student = Some(updated.clone());
        if let Some(url) = previous {
            self.inner.blobs.revoke(&url);
        }

        tracing::info!(student_id = %updated.id, "Profile picture updated");

        Ok(Outcome::completed(
            updated,
            Notice::success(
                NoticeCode::ProfilePictureUpdated,
                "Foto atualizada",
                "Sua foto de perfil foi atualizada com sucesso.",
            ),
        ))
    }

    /// The student's unique code. Aborted when there is no student, in
    /// which case the code is the empty string.
    pub fn save_id_card(&self) -> Outcome<String> {
        match self.state().student.as_ref() {
            Some(student) => Outcome::silent(student.unique_code.clone().unwrap_or_default()),
            None => Outcome::Aborted(Notice::complete_registration_first()),
        }
    }
}
