//! # Credential Verification
//!
//! The async seam between the session store and whatever decides whether an
//! email/password pair is valid.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionState::login(credentials)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_with_timeout(verifier, credentials, login_timeout)  (no lock)  │
//! │       │                                                                 │
//! │       ├── Ok(identity) ─────────────────┐                              │
//! │       ├── Err(InvalidCredentials) ──────┤                              │
//! │       ├── Err(Unavailable(..)) ─────────┤                              │
//! │       └── elapsed ──► Err(TimedOut) ────┤                              │
//! │                                         ▼                               │
//! │                          session.apply_login(verdict)  (under lock)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use storefront_core::session::check_demo_credentials;
use storefront_core::{Credentials, Identity, LoginError};

/// Decides whether credentials identify a user.
///
/// Implementations may suspend (network, hashing). They must not panic and
/// should return [`LoginError::InvalidCredentials`] without saying which
/// field was wrong.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credentials: &Credentials) -> Result<Identity, LoginError>;
}

/// Accepts only the built-in demo account.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCredentialVerifier;

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, credentials: &Credentials) -> Result<Identity, LoginError> {
        check_demo_credentials(credentials)
    }
}

/// Runs `verifier`, turning an overrun of `timeout` into
/// [`LoginError::TimedOut`].
pub async fn verify_with_timeout(
    verifier: &dyn CredentialVerifier,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<Identity, LoginError> {
    debug!(email = %credentials.email, "Verifying credentials");

    match tokio::time::timeout(timeout, verifier.verify(credentials)).await {
        Ok(verdict) => verdict,
        Err(_) => {
            let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(email = %credentials.email, after_ms, "Credential check timed out");
            Err(LoginError::TimedOut { after_ms })
        }
    }
}
