use thiserror::Error;

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failures of the login collaborator.
///
/// None of these are retried by the retry layer.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The site refused the credentials
    #[error("credentials rejected: {0}")]
    CredentialsRejected(String),

    /// The login endpoint answered with an unexpected status
    #[error("login endpoint unavailable (HTTP {status})")]
    Unavailable {
        /// HTTP status code
        status: u16,
    },

    /// The login request never completed
    #[error("login transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The authenticator is not configured well enough to log in
    #[error("login misconfigured: {0}")]
    Misconfigured(String),
}

impl AuthError {
    /// Whether the failure is a refusal of the credentials themselves.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::CredentialsRejected(_))
    }
}
