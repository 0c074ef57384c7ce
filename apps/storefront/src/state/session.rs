//! # Session State
//!
//! The managed session plus the verifier used to log in.
//!
//! The session lock is never held across the verifier call: login awaits the
//! verdict first and only then applies it under the lock. A logout that lands
//! while a login is in flight is therefore overwritten if that login succeeds.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use storefront_core::{Credentials, Identity, LoginError, Session, SessionSnapshot};
use storefront_db::{keys, Database, DbResult};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::auth::{verify_with_timeout, CredentialVerifier, StaticCredentialVerifier};

/// Thread-safe handle to the session.
#[derive(Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
    /// Held from snapshot to write so saves land in the order they snapshot.
    write_guard: Arc<AsyncMutex<()>>,
    verifier: Arc<dyn CredentialVerifier>,
    login_timeout: Duration,
}

impl SessionState {
    /// Creates an anonymous session checked by `verifier`.
    pub fn new(verifier: Arc<dyn CredentialVerifier>, login_timeout: Duration) -> Self {
        Self::from_session(Session::new(), verifier, login_timeout)
    }

    pub fn from_session(
        session: Session,
        verifier: Arc<dyn CredentialVerifier>,
        login_timeout: Duration,
    ) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
            write_guard: Arc::default(),
            verifier,
            login_timeout,
        }
    }

    /// Rehydrates the session from `auth-storage`.
    ///
    /// Missing or unreadable records yield an anonymous session.
    pub async fn load(
        db: &Database,
        verifier: Arc<dyn CredentialVerifier>,
        login_timeout: Duration,
    ) -> Self {
        let session = match db.snapshots().load_json::<Session>(keys::AUTH).await {
            Ok(Some(session)) => {
                debug!(authenticated = session.is_authenticated(), "Session restored");
                session
            }
            Ok(None) => Session::new(),
            Err(e) => {
                warn!(error = %e, "Stored session unreadable, starting anonymous");
                Session::new()
            }
        };
        Self::from_session(session, verifier, login_timeout)
    }

    /// Writes the current session to `auth-storage`.
    pub async fn try_save(&self, db: &Database) -> DbResult<()> {
        let _guard = self.write_guard.lock().await;
        let snapshot: SessionSnapshot = self.with_session(Session::snapshot);
        db.snapshots().save_json(keys::AUTH, &snapshot).await
    }

    /// [`try_save`](Self::try_save), logging instead of returning a failure.
    pub async fn save(&self, db: &Database) {
        if let Err(e) = self.try_save(db).await {
            warn!(error = %e, "Failed to persist session");
        }
    }

    /// Checks `credentials` and, on success, authenticates the session.
    ///
    /// ## Returns
    /// * `Ok(identity)` - Session is now authenticated as `identity`
    /// * `Err(LoginError)` - Session is unchanged
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity, LoginError> {
        let verdict =
            verify_with_timeout(self.verifier.as_ref(), credentials, self.login_timeout).await;

        let outcome = self.with_session_mut(|s| s.apply_login(verdict).cloned());
        match &outcome {
            Ok(identity) => info!(user_id = %identity.id, "Login succeeded"),
            Err(e) => info!(email = %credentials.email, reason = %e, "Login rejected"),
        }
        outcome
    }

    /// Returns to anonymous. Idempotent.
    pub fn logout(&self) {
        self.with_session_mut(Session::logout);
        info!("Logged out");
    }

    /// Authenticates as `identity` without a credential check.
    pub fn set_identity(&self, identity: Identity) {
        debug!(user_id = %identity.id, "Identity set");
        self.with_session_mut(|s| s.set_identity(identity));
    }

    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

impl Default for SessionState {
    /// Anonymous, checked against the demo account, five-second timeout.
    fn default() -> Self {
        Self::new(Arc::new(StaticCredentialVerifier), Duration::from_secs(5))
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("session", &self.session)
            .field("login_timeout", &self.login_timeout)
            .finish_non_exhaustive()
    }
}
