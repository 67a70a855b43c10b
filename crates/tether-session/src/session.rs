//! Session validity tracking.

use crate::authenticator::Authenticator;
use crate::error::Result;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// A remote session shared by every operation of one client.
///
/// The validity flag is cleared as soon as an operation reports a transient
/// failure, and only [`Session::ensure_valid`] sets it again, after a
/// successful login. Callers must not issue requests while it is clear.
///
/// At most one logical operation may drive a session at a time.
pub struct Session {
    authenticator: Arc<dyn Authenticator>,
    valid: AtomicBool,
    authentications: AtomicU32,
}

impl Session {
    /// Wrap a session that is already established.
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_state(authenticator, true)
    }

    /// Wrap a session that has not logged in yet; the first
    /// [`Session::ensure_valid`] performs the login.
    pub fn logged_out(authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_state(authenticator, false)
    }

    fn with_state(authenticator: Arc<dyn Authenticator>, valid: bool) -> Self {
        Self {
            authenticator,
            valid: AtomicBool::new(valid),
            authentications: AtomicU32::new(0),
        }
    }

    /// Whether requests may be issued.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Mark the session unusable until the next login.
    pub fn invalidate(&self) {
        if self.valid.swap(false, Ordering::AcqRel) {
            tracing::debug!("Session {} invalidated", self.authenticator.name());
        }
    }

    /// Log in if the session is marked invalid.
    ///
    /// On failure the flag stays cleared.
    pub async fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }

        self.authenticator.authenticate().await?;
        self.authentications.fetch_add(1, Ordering::AcqRel);
        self.valid.store(true, Ordering::Release);
        tracing::info!("Session {} re-established", self.authenticator.name());
        Ok(())
    }

    /// Force a full login cycle regardless of the current flag.
    pub async fn reauthenticate(&self) -> Result<()> {
        self.invalidate();
        self.ensure_valid().await
    }

    /// Number of successful logins performed through this session.
    #[must_use]
    pub fn authentications(&self) -> u32 {
        self.authentications.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticator", &self.authenticator.name())
            .field("valid", &self.is_valid())
            .field("authentications", &self.authentications())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use async_trait::async_trait;

    struct Scripted {
        calls: AtomicU32,
        reject: bool,
    }

    #[async_trait]
    impl Authenticator for Scripted {
        async fn authenticate(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                Err(AuthError::CredentialsRejected("wrong password".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn scripted(reject: bool) -> Arc<Scripted> {
        Arc::new(Scripted {
            calls: AtomicU32::new(0),
            reject,
        })
    }

    #[tokio::test]
    async fn test_valid_session_skips_login() {
        let auth = scripted(false);
        let session = Session::new(auth.clone());

        session.ensure_valid().await.expect("already valid");
        assert!(session.is_valid());
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.authentications(), 0);
    }

    #[tokio::test]
    async fn test_logged_out_session_logs_in_once() {
        let auth = scripted(false);
        let session = Session::logged_out(auth.clone());
        assert!(!session.is_valid());

        session.ensure_valid().await.expect("login");
        session.ensure_valid().await.expect("still valid");
        assert!(session.is_valid());
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_then_reauthenticate() {
        let auth = scripted(false);
        let session = Session::new(auth.clone());

        session.invalidate();
        assert!(!session.is_valid());
        session.ensure_valid().await.expect("login");
        session.reauthenticate().await.expect("login again");

        assert_eq!(session.authentications(), 2);
    }

    #[tokio::test]
    async fn test_rejection_keeps_flag_cleared() {
        let auth = scripted(true);
        let session = Session::logged_out(auth);

        let err = session.ensure_valid().await.expect_err("rejected");
        assert!(err.is_rejection());
        assert!(!session.is_valid());
        assert_eq!(session.authentications(), 0);
    }
}
