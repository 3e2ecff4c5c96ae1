// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Session manager: owns the active user.
//!
//! Authentication is mocked. Every call succeeds after a simulated delay,
//! fabricates a user and persists it under the `user` key. Passwords are
//! accepted and ignored.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::config::SimulatedLatency;
use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{AuthProvider, Notice, NoticeCode, Outcome, User};
use crate::time_utils::now_millis;

/// Fixed id handed out by email/password login.
pub const MOCK_LOGIN_USER_ID: &str = "user-123";

/// Shared session state. Cheap to clone.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: RecordStore,
    latency: SimulatedLatency,
    current: RwLock<Option<User>>,
    /// Serializes mutations so overlapping calls apply in arrival order.
    writer: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: RecordStore, latency: SimulatedLatency) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store,
                latency,
                current: RwLock::new(None),
                writer: Mutex::new(()),
            }),
        }
    }

    /// Load the persisted user, if any, and make it active.
    ///
    /// An unreadable record is logged and treated as "no user".
    pub async fn restore(&self) -> Option<User> {
        let user = match self.inner.store.get_user() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable user record");
                None
            }
        };

        if let Some(u) = &user {
            tracing::info!(user_id = %u.id, "Restored session");
        }
        *self.inner.current.write().await = user.clone();
        user
    }

    /// The active user, if any.
    pub async fn current(&self) -> Option<User> {
        self.inner.current.read().await.clone()
    }

    /// Hold the writer gate. The active user cannot change until the guard
    /// is dropped.
    pub(crate) async fn hold(&self) -> MutexGuard<'_, ()> {
        self.inner.writer.lock().await
    }

    /// Email/password login. Always succeeds with the fixed mock user.
    pub async fn login(&self, email: &str, _password: &str) -> Result<Outcome<User>> {
        let _guard = self.inner.writer.lock().await;
        tokio::time::sleep(self.inner.latency.auth).await;

        let user = User {
            id: MOCK_LOGIN_USER_ID.to_string(),
            email: email.to_string(),
            name: Some("Mock User".to_string()),
            student_id: None,
        };
        self.activate(&user).await?;

        Ok(Outcome::completed(
            user,
            Notice::success(
                NoticeCode::LoginSucceeded,
                "Login bem-sucedido",
                "Bem-vindo de volta!",
            ),
        ))
    }

    /// Login through a third-party provider. Always succeeds.
    pub async fn login_with_provider(&self, provider: AuthProvider) -> Result<Outcome<User>> {
        let _guard = self.inner.writer.lock().await;
        tokio::time::sleep(self.inner.latency.provider).await;

        let user = User {
            id: format!("{}-user-{}", provider.slug(), now_millis()),
            email: provider.mock_email().to_string(),
            name: Some(format!("{} User", provider.display_name())),
            student_id: None,
        };
        self.activate(&user).await?;

        let name = provider.display_name();
        Ok(Outcome::completed(
            user,
            Notice::success(
                NoticeCode::ProviderLoginSucceeded,
                &format!("Login com {} realizado", name),
                format!("Autenticação via {} concluída com sucesso!", name),
            ),
        ))
    }

    /// Create an account. Always succeeds.
    pub async fn register(&self, email: &str, _password: &str, name: &str) -> Result<Outcome<User>> {
        let _guard = self.inner.writer.lock().await;
        tokio::time::sleep(self.inner.latency.auth).await;

        let user = User {
            id: format!("user-{}", now_millis()),
            email: email.to_string(),
            name: Some(name.to_string()),
            student_id: None,
        };
        self.activate(&user).await?;

        Ok(Outcome::completed(
            user,
            Notice::success(
                NoticeCode::AccountCreated,
                "Registro bem-sucedido",
                "Sua conta foi criada com sucesso!",
            ),
        ))
    }

    /// Clear the active user and drop it from the store.
    pub async fn logout(&self) -> Result<Outcome<()>> {
        let _guard = self.inner.writer.lock().await;

        self.inner.store.remove_user()?;
        let previous = self.inner.current.write().await.take();
        if let Some(u) = previous {
            tracing::info!(user_id = %u.id, "User logged out");
        }

        Ok(Outcome::completed(
            (),
            Notice::success(NoticeCode::LoggedOut, "Sessão encerrada", "Até logo!"),
        ))
    }

    async fn activate(&self, user: &User) -> Result<()> {
        self.inner.store.set_user(user)?;
        *self.inner.current.write().await = Some(user.clone());
        tracing::info!(user_id = %user.id, "Session started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (SessionManager, RecordStore) {
        let store = RecordStore::in_memory();
        (
            SessionManager::new(store.clone(), SimulatedLatency::none()),
            store,
        )
    }

    #[tokio::test]
    async fn test_login_uses_fixed_id_and_ignores_password() {
        let (session, store) = manager();

        let user = session
            .login("ana@example.com", "")
            .await
            .unwrap()
            .into_value()
            .unwrap();

        assert_eq!(user.id, MOCK_LOGIN_USER_ID);
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(store.get_user().unwrap(), Some(user.clone()));
        assert_eq!(session.current().await, Some(user));
    }

    #[tokio::test]
    async fn test_provider_login_ids_are_branded() {
        let (session, _) = manager();

        let outcome = session
            .login_with_provider(AuthProvider::Facebook)
            .await
            .unwrap();
        let notice = outcome.notice().cloned().unwrap();
        let user = outcome.into_value().unwrap();

        assert!(user.id.starts_with("facebook-user-"));
        assert_eq!(user.email, "user@facebook.com");
        assert_eq!(notice.code, NoticeCode::ProviderLoginSucceeded);
    }

    #[tokio::test]
    async fn test_logout_removes_persisted_user() {
        let (session, store) = manager();
        let _ = session.register("a@b.com", "pw", "Ana").await.unwrap();

        let _ = session.logout().await.unwrap();

        assert_eq!(session.current().await, None);
        assert_eq!(store.get_user().unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_reads_persisted_user() {
        let (session, store) = manager();
        let user = session
            .register("a@b.com", "pw", "Ana")
            .await
            .unwrap()
            .into_value()
            .unwrap();

        let reloaded = SessionManager::new(store, SimulatedLatency::none());
        assert_eq!(reloaded.restore().await, Some(user.clone()));
        assert_eq!(reloaded.current().await, Some(user));
    }
}
