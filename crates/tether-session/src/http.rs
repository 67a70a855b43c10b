//! Form-post login over HTTP.

use crate::authenticator::{Authenticator, Credentials};
use crate::error::{AuthError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tether_core::SessionConfig;

/// Logs in by posting a credentials form to a login URL.
///
/// The underlying client keeps cookies, so operations that share
/// [`HttpLogin::client`] run inside the session this login establishes.
#[derive(Debug, Clone)]
pub struct HttpLogin {
    client: Client,
    login_url: String,
    username_field: String,
    password_field: String,
    credentials: Credentials,
}

impl HttpLogin {
    /// Build a login from session settings.
    ///
    /// # Errors
    /// Returns [`AuthError::Misconfigured`] if no login URL is configured, or
    /// [`AuthError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &SessionConfig, credentials: Credentials) -> Result<Self> {
        let login_url = config
            .login_url
            .clone()
            .ok_or_else(|| AuthError::Misconfigured("session.login_url is not set".to_string()))?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            login_url,
            username_field: config.username_field.clone(),
            password_field: config.password_field.clone(),
            credentials,
        })
    }

    /// The cookie-keeping client bound to this login.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The URL the form is posted to.
    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    fn classify_status(status: StatusCode) -> Result<()> {
        if status.is_success() || status.is_redirection() {
            return Ok(());
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                AuthError::CredentialsRejected(format!("login refused with HTTP {}", status.as_u16())),
            ),
            other => Err(AuthError::Unavailable {
                status: other.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl Authenticator for HttpLogin {
    async fn authenticate(&self) -> Result<()> {
        tracing::debug!(
            "Logging in as {} at {}",
            self.credentials.username(),
            self.login_url
        );

        let form = [
            (self.username_field.as_str(), self.credentials.username()),
            (self.password_field.as_str(), self.credentials.password()),
        ];

        let response = self.client.post(&self.login_url).form(&form).send().await?;
        Self::classify_status(response.status())
    }

    fn name(&self) -> &str {
        &self.login_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_login_url() {
        let config = SessionConfig::default();
        let err = HttpLogin::from_config(&config, Credentials::new("u", "p")).expect_err("no url");
        assert!(matches!(err, AuthError::Misconfigured(_)));
    }

    #[test]
    fn test_status_classification() {
        assert!(HttpLogin::classify_status(StatusCode::OK).is_ok());
        assert!(HttpLogin::classify_status(StatusCode::FOUND).is_ok());
        assert!(HttpLogin::classify_status(StatusCode::UNAUTHORIZED)
            .expect_err("401")
            .is_rejection());
        assert!(HttpLogin::classify_status(StatusCode::FORBIDDEN)
            .expect_err("403")
            .is_rejection());
        assert!(matches!(
            HttpLogin::classify_status(StatusCode::BAD_GATEWAY),
            Err(AuthError::Unavailable { status: 502 })
        ));
    }
}
