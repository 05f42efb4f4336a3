//! The signed-in user for this storefront instance.
//!
//! The storefront runs as a single-profile kiosk: one user is signed in per
//! process, not per connection. The identity lives in memory behind a lock
//! and is mirrored to the session snapshot so a restart picks up where the
//! user left off.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::CurrentUser;
use crate::storage::{self, Storage, StorageError};

/// Process-wide authentication state.
///
/// Cheap to clone; clones share the same underlying state.
#[derive(Clone)]
pub struct SessionService {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Storage,
    user: RwLock<Option<CurrentUser>>,
}

impl SessionService {
    /// Open the session, restoring the persisted user if one exists.
    pub async fn open(storage: Storage) -> Self {
        let user = storage.load::<CurrentUser>(storage::keys::SESSION).await;
        if let Some(user) = &user {
            tracing::debug!(email = %user.email, "Restored session");
        }
        Self {
            inner: Arc::new(SessionInner {
                storage,
                user: RwLock::new(user),
            }),
        }
    }

    /// The signed-in user, if any.
    pub async fn current(&self) -> Option<CurrentUser> {
        self.inner.user.read().await.clone()
    }

    /// Whether a user is signed in.
    pub async fn is_signed_in(&self) -> bool {
        self.inner.user.read().await.is_some()
    }

    /// Sign a user in, persisting the identity before it becomes visible.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session snapshot cannot be written; the
    /// in-memory state is left untouched in that case.
    pub async fn sign_in(&self, user: CurrentUser) -> Result<(), StorageError> {
        let mut guard = self.inner.user.write().await;
        self.inner.storage.save(storage::keys::SESSION, &user).await?;
        tracing::info!(email = %user.email, "User signed in");
        *guard = Some(user);
        Ok(())
    }

    /// Sign the user out and delete the persisted identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session snapshot cannot be removed.
    pub async fn sign_out(&self) -> Result<(), StorageError> {
        let mut guard = self.inner.user.write().await;
        self.inner.storage.remove(storage::keys::SESSION).await?;
        if let Some(user) = guard.take() {
            tracing::info!(email = %user.email, "User signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_user() -> CurrentUser {
        CurrentUser {
            name: "Layla".to_string(),
            email: "layla@example.com".to_string(),
            token: Some("token-123".to_string()),
        }
    }

    async fn test_sessions() -> (SessionService, Storage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).await.unwrap();
        let sessions = SessionService::open(storage.clone()).await;
        (sessions, storage, dir)
    }

    #[tokio::test]
    async fn test_starts_signed_out() {
        let (sessions, _storage, _dir) = test_sessions().await;
        assert!(!sessions.is_signed_in().await);
        assert!(sessions.current().await.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_then_out() {
        let (sessions, _storage, _dir) = test_sessions().await;

        sessions.sign_in(test_user()).await.unwrap();
        assert!(sessions.is_signed_in().await);
        let current = sessions.current().await.unwrap();
        assert_eq!(current.email, "layla@example.com");

        sessions.sign_out().await.unwrap();
        assert!(!sessions.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let (sessions, storage, _dir) = test_sessions().await;
        sessions.sign_in(test_user()).await.unwrap();

        let reopened = SessionService::open(storage).await;
        let current = reopened.current().await.unwrap();
        assert_eq!(current.email, "layla@example.com");
        assert_eq!(current.token.as_deref(), Some("token-123"));
    }

    #[tokio::test]
    async fn test_sign_out_removes_snapshot() {
        let (sessions, storage, _dir) = test_sessions().await;
        sessions.sign_in(test_user()).await.unwrap();
        sessions.sign_out().await.unwrap();

        let reopened = SessionService::open(storage).await;
        assert!(!reopened.is_signed_in().await);
    }
}
