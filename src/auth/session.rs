//! The server-side list of open summary sessions.
//!
//! A session cookie only grants access while its id is listed here, so
//! logging out revokes the session even if the client keeps the old cookie.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::extract::FromRef;
use time::{Duration, OffsetDateTime};

use crate::{AppState, Error};

/// Proof that the client entered the summary password.
///
/// Handed to the summary page by the `summary_guard` middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Identifies the session in the [SessionStore].
    pub id: u64,
    /// When the session stops being valid.
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Default)]
struct OpenSessions {
    next_id: u64,
    expiry_by_id: HashMap<u64, OffsetDateTime>,
}

/// The sessions opened by a successful log-in and not yet revoked or expired.
///
/// Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<OpenSessions>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session that lasts for `duration` from now.
    ///
    /// Expired sessions are dropped from the list at the same time.
    ///
    /// # Errors
    /// Returns [Error::LockError] if the session list lock is poisoned.
    pub fn open(&self, duration: Duration) -> Result<Session, Error> {
        let now = OffsetDateTime::now_utc();
        let mut sessions = self.lock()?;

        sessions
            .expiry_by_id
            .retain(|_, expires_at| *expires_at > now);

        let id = sessions.next_id;
        sessions.next_id = sessions.next_id.wrapping_add(1);
        let session = Session {
            id,
            expires_at: now + duration,
        };
        sessions.expiry_by_id.insert(id, session.expires_at);

        Ok(session)
    }

    /// Whether `session` was opened here, has not been revoked and has not expired.
    ///
    /// The expiry recorded here wins over the one the client sent.
    ///
    /// # Errors
    /// Returns [Error::LockError] if the session list lock is poisoned.
    pub fn is_active(&self, session: &Session) -> Result<bool, Error> {
        let sessions = self.lock()?;

        Ok(sessions
            .expiry_by_id
            .get(&session.id)
            .is_some_and(|expires_at| *expires_at > OffsetDateTime::now_utc()))
    }

    /// Close the session with `id`. Returns whether it was open.
    ///
    /// # Errors
    /// Returns [Error::LockError] if the session list lock is poisoned.
    pub fn revoke(&self, id: u64) -> Result<bool, Error> {
        Ok(self.lock()?.expiry_by_id.remove(&id).is_some())
    }

    fn lock(&self) -> Result<MutexGuard<'_, OpenSessions>, Error> {
        self.sessions
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire session store lock: {error}"))
            .map_err(|_| Error::LockError)
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
