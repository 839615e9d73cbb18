//! Admin session store.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` is a cloneable handle to one shared session. It is the
//! single writer: `set_auth` on login, `logout` on sign-out or a 401 teardown.
//! Readers take snapshots via `current()` or watch for changes via
//! `subscribe()`.
//!
//! In memory, token and identity live in one `Option<Credentials>`, so one
//! can never be set without the other. The persisted document keeps both as
//! independent optional fields, which cannot carry that guarantee, so
//! rehydration treats anything other than a complete pair as "signed out".
//!
//! TRADE-OFFS
//! ==========
//! The mutex is held across the storage write so mutations reach disk in the
//! order they happened. A failed write keeps the in-memory change: a logout
//! must take effect even when the file cannot be removed.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::storage::{MemoryStorage, SessionStorage, StorageError};
use crate::net::types::AdminUser;

/// Errors raised by session mutations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `set_auth` was given an empty token.
    #[error("session token must not be empty")]
    EmptyToken,
    /// The session changed in memory but could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The persisted document could not be encoded. Nothing changed.
    #[error("could not encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Token and identity of a signed-in viewer. Always set together.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user: AdminUser,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("token", &"<redacted>").field("user", &self.user).finish()
    }
}

/// How the route guard sees a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    AuthenticatedAdmin,
    AuthenticatedNonAdmin,
}

/// Snapshot of the session at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&AdminUser> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match &self.credentials {
            None => SessionStatus::Anonymous,
            Some(c) if c.user.is_admin() => SessionStatus::AuthenticatedAdmin,
            Some(_) => SessionStatus::AuthenticatedNonAdmin,
        }
    }

    /// Decode a persisted document. Corrupt JSON, a token without a user, a
    /// user without a token, or an empty token all yield the anonymous session.
    fn from_persisted(raw: &str) -> Self {
        let persisted: PersistedSession = match serde_json::from_str(raw) {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!(error = %e, "persisted session is corrupt; starting signed out");
                return Self::anonymous();
            }
        };

        match (persisted.token, persisted.user) {
            (Some(token), Some(user)) if !token.is_empty() => Self { credentials: Some(Credentials { token, user }) },
            (None, None) => Self::anonymous(),
            _ => {
                tracing::warn!("persisted session is incomplete; starting signed out");
                Self::anonymous()
            }
        }
    }

    fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            token: self.credentials.as_ref().map(|c| c.token.clone()),
            user: self.credentials.as_ref().map(|c| c.user.clone()),
        }
    }
}

/// On-disk shape. Both fields are independently optional on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<AdminUser>,
}

// =============================================================================
// STORE
// =============================================================================

struct StoreInner {
    session: Mutex<Session>,
    storage: Box<dyn SessionStorage>,
    changes: watch::Sender<Session>,
}

/// Shared handle to the admin session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("status", &self.current().status()).finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open a store backed by `storage`, rehydrating any persisted session.
    /// Unreadable storage starts signed out.
    pub fn open(storage: impl SessionStorage + 'static) -> Self {
        let session = match storage.load() {
            Ok(Some(raw)) => Session::from_persisted(&raw),
            Ok(None) => Session::anonymous(),
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; starting signed out");
                Session::anonymous()
            }
        };

        let (changes, _) = watch::channel(session.clone());
        Self { inner: Arc::new(StoreInner { session: Mutex::new(session), storage: Box::new(storage), changes }) }
    }

    /// Store that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::default())
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.lock().clone()
    }

    /// Receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.changes.subscribe()
    }

    /// Replace token and identity together.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyToken`] and [`SessionError::Encode`] leave the
    /// session untouched.
    /// [`SessionError::Storage`] means the new session is active but was not
    /// persisted.
    pub fn set_auth(&self, token: impl Into<String>, user: AdminUser) -> Result<(), SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let next = Session { credentials: Some(Credentials { token, user }) };
        let raw = serde_json::to_string(&next.to_persisted())?;

        let mut session = self.lock();
        *session = next;
        self.inner.changes.send_replace(session.clone());

        self.inner.storage.save(&raw)?;
        Ok(())
    }

    /// Clear the session. Calling it while signed out changes nothing.
    ///
    /// Storage failures are logged, not returned: the in-memory session is
    /// always cleared.
    pub fn logout(&self) {
        let mut session = self.lock();
        let was_authenticated = session.is_authenticated();
        *session = Session::anonymous();
        if was_authenticated {
            self.inner.changes.send_replace(session.clone());
        }

        if let Err(e) = self.inner.storage.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        self.inner.session.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
