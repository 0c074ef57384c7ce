//! # Session Commands
//!
//! Login, logout and session inspection.
//!
//! ```text
//! login page ── login(credentials) ──► LoginResponse { success, user, error }
//! header     ── get_session() ───────► SessionResponse { user, isAuthenticated }
//! header     ── logout() ────────────► SessionResponse (anonymous)
//! ```

use serde::Serialize;
use storefront_core::{Credentials, Identity, Session, SessionStatus};
use tracing::debug;
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// The session as the pages see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionResponse {
    pub user: Option<Identity>,
    pub is_authenticated: bool,
    pub status: SessionStatus,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        SessionResponse {
            user: session.identity().cloned(),
            is_authenticated: session.is_authenticated(),
            status: session.status(),
        }
    }
}

/// Outcome of a login attempt. A failed login is a normal response, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Option<Identity>,
    pub error: Option<ApiError>,
    /// Whether trying the same credentials again later could succeed.
    pub retryable: bool,
}

/// Gets the current session.
pub fn get_session(session: &SessionState) -> SessionResponse {
    debug!("get_session command");
    session.with_session(|s| SessionResponse::from(s))
}

/// Attempts to log in.
///
/// ## Behavior
/// - Success: session becomes authenticated and is persisted
/// - Failure: session unchanged (a previous login survives), nothing written
pub async fn login(db: &DbState, session: &SessionState, credentials: Credentials) -> LoginResponse {
    debug!(email = %credentials.email, "login command");

    match session.login(&credentials).await {
        Ok(identity) => {
            session.save(db.inner()).await;
            LoginResponse {
                success: true,
                user: Some(identity),
                error: None,
                retryable: false,
            }
        }
        Err(e) => LoginResponse {
            success: false,
            user: None,
            retryable: e.is_retryable(),
            error: Some(ApiError::from(e)),
        },
    }
}

/// Logs out. Always succeeds, even when already anonymous.
pub async fn logout(db: &DbState, session: &SessionState) -> SessionResponse {
    debug!("logout command");
    session.logout();
    session.save(db.inner()).await;
    get_session(session)
}

/// Authenticates as `identity` without a credential check.
pub async fn set_identity(db: &DbState, session: &SessionState, identity: Identity) -> SessionResponse {
    debug!(user_id = %identity.id, "set_identity command");
    session.set_identity(identity);
    session.save(db.inner()).await;
    get_session(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::StalledVerifier;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;
    use crate::Storefront;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_login_and_logout() {
        let app = Storefront::in_memory().await.unwrap();

        let response = login(
            &app.db,
            &app.session,
            Credentials::new("admin@example.com", "password"),
        )
        .await;
        assert!(response.success);
        assert_eq!(response.user.unwrap().display_name, "Admin User");
        assert!(get_session(&app.session).is_authenticated);

        let after = logout(&app.db, &app.session).await;
        assert!(!after.is_authenticated);
        assert_eq!(after.status, SessionStatus::Anonymous);
        assert!(after.user.is_none());
    }

    #[tokio::test]
    async fn test_failed_login_response() {
        let app = Storefront::in_memory().await.unwrap();

        let response = login(
            &app.db,
            &app.session,
            Credentials::new("admin@example.com", "wrong"),
        )
        .await;
        assert!(!response.success);
        assert!(!response.retryable);
        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::AuthError);
        assert_eq!(error.message, "Invalid email or password");
        assert!(!get_session(&app.session).is_authenticated);
    }

    #[tokio::test]
    async fn test_timed_out_login_is_retryable() {
        let config = ConfigState {
            database_path: Some(":memory:".into()),
            login_timeout_ms: 50,
            ..ConfigState::default()
        };
        let app = Storefront::open_with_verifier(config, Arc::new(StalledVerifier))
            .await
            .unwrap();

        let response = login(
            &app.db,
            &app.session,
            Credentials::new("admin@example.com", "password"),
        )
        .await;
        assert!(!response.success);
        assert!(response.retryable);
        assert!(response.error.unwrap().message.contains("timed out"));
        assert!(!get_session(&app.session).is_authenticated);
    }

    #[tokio::test]
    async fn test_login_survives_restart() {
        let app = Storefront::in_memory().await.unwrap();
        login(
            &app.db,
            &app.session,
            Credentials::new("admin@example.com", "password"),
        )
        .await;

        let reloaded = SessionState::load(
            app.db.inner(),
            Arc::new(crate::auth::StaticCredentialVerifier),
            Duration::from_secs(1),
        )
        .await;
        assert!(get_session(&reloaded).is_authenticated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_persist_the_latest_session() {
        let app = Storefront::in_memory().await.unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let app = app.clone();
                tokio::spawn(async move {
                    if n % 2 == 0 {
                        let identity = Identity::new(n.to_string(), "c@example.com", "Customer");
                        set_identity(&app.db, &app.session, identity).await;
                    } else {
                        logout(&app.db, &app.session).await;
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let reloaded = SessionState::load(
            app.db.inner(),
            Arc::new(crate::auth::StaticCredentialVerifier),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(get_session(&reloaded), get_session(&app.session));
    }

    #[tokio::test]
    async fn test_set_identity() {
        let app = Storefront::in_memory().await.unwrap();
        let response = set_identity(
            &app.db,
            &app.session,
            Identity::new("42", "new@example.com", "New Customer"),
        )
        .await;

        assert!(response.is_authenticated);
        assert_eq!(response.user.unwrap().email, "new@example.com");
    }
}
