//! # Session
//!
//! Who is logged in, and the transitions that change it.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                  login() ok / set_identity()                            │
//! │   ┌────────────┐ ─────────────────────────────► ┌───────────────┐       │
//! │   │ Anonymous  │                                │ Authenticated │       │
//! │   └────────────┘ ◄───────────────────────────── └───────────────┘       │
//! │        ▲  │                logout()                  │                  │
//! │        └──┘ login() failed / logout()                └─ login() failed  │
//! │                                                        (unchanged)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The credential check itself is I/O-shaped and lives behind the app's
//! `CredentialVerifier`. This module only applies its verdict. The pure
//! matcher for the single demo account is [`check_demo_credentials`].

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::LoginError;
use crate::types::Identity;

// =============================================================================
// Demo Account
// =============================================================================

/// Email of the only account that can log in.
pub const DEMO_EMAIL: &str = "admin@example.com";

/// Password of the only account that can log in.
pub const DEMO_PASSWORD: &str = "password";

const DEMO_USER_ID: &str = "1";
const DEMO_DISPLAY_NAME: &str = "Admin User";

/// Exact-match check against the demo account.
///
/// Both fields are compared as-is: no trimming, no case folding.
pub fn check_demo_credentials(credentials: &Credentials) -> Result<Identity, LoginError> {
    if credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD {
        Ok(Identity::new(DEMO_USER_ID, DEMO_EMAIL, DEMO_DISPLAY_NAME))
    } else {
        Err(LoginError::InvalidCredentials)
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// An email/password pair submitted on the login page.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Keeps the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

// =============================================================================
// Session
// =============================================================================

/// The two states a session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// The current authentication state.
///
/// "Authenticated" is derived from the presence of an identity, so the two
/// can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SessionSnapshot", from = "SessionSnapshot")]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Creates an anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// Applies the verdict of a credential check.
    ///
    /// On success the identity replaces whatever was there. On failure the
    /// session is left exactly as it was, including a previous login.
    pub fn apply_login(&mut self, verdict: Result<Identity, LoginError>) -> Result<&Identity, LoginError> {
        let identity: &Identity = self.identity.insert(verdict?);
        Ok(identity)
    }

    /// Authenticates without a credential check (registration-style flows).
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Returns to anonymous. Idempotent.
    pub fn logout(&mut self) {
        self.identity = None;
    }

    /// Captures the persisted shape of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(self.clone())
    }
}

// =============================================================================
// Session Snapshot
// =============================================================================

/// The persisted form of a [`Session`].
///
/// ```json
/// { "user": { "id": "1", "email": "admin@example.com", "name": "Admin User" },
///   "isAuthenticated": true }
/// ```
///
/// `isAuthenticated` is written for readers of the raw record and ignored on
/// load: the session is authenticated iff `user` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionSnapshot {
    pub user: Option<Identity>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl From<Session> for SessionSnapshot {
    fn from(session: Session) -> Self {
        let is_authenticated = session.is_authenticated();
        SessionSnapshot {
            user: session.identity,
            is_authenticated,
        }
    }
}

impl From<SessionSnapshot> for Session {
    fn from(snapshot: SessionSnapshot) -> Self {
        Session {
            identity: snapshot.user,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
