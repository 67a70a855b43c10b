//! The login collaborator contract.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use zeroize::Zeroizing;

/// Establishes or re-establishes a usable remote session.
///
/// Implementations perform a full login cycle on every call and must tolerate
/// being called repeatedly. Returning [`AuthError::CredentialsRejected`]
/// aborts any retry sequence in progress.
///
/// [`AuthError::CredentialsRejected`]: crate::AuthError::CredentialsRejected
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Perform a login.
    async fn authenticate(&self) -> Result<()>;

    /// Short name used in log output.
    fn name(&self) -> &str {
        "session"
    }
}

/// Login credentials. The password is wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// The account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The secret.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
