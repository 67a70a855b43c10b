//! Classification of `reqwest` failures.

use crate::classifier::{FailureKind, TransientSet};
use reqwest::StatusCode;

/// Coarse kinds of HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpFailure {
    /// 4xx response
    Client,
    /// 5xx response
    Server,
    /// Request timed out
    Timeout,
    /// Connection could not be established
    Connect,
    /// Response body could not be decoded
    Decode,
    /// Anything else (redirect loops, builder errors, ...)
    Other,
}

impl HttpFailure {
    /// Kind of an error status. Non-error statuses map to [`HttpFailure::Other`].
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_client_error() {
            Self::Client
        } else if status.is_server_error() {
            Self::Server
        } else {
            Self::Other
        }
    }
}

impl FailureKind for reqwest::Error {
    type Kind = HttpFailure;

    fn failure_kind(&self) -> HttpFailure {
        if let Some(status) = self.status() {
            HttpFailure::from_status(status)
        } else if self.is_timeout() {
            HttpFailure::Timeout
        } else if self.is_connect() {
            HttpFailure::Connect
        } else if self.is_decode() {
            HttpFailure::Decode
        } else {
            HttpFailure::Other
        }
    }
}

impl TransientSet<HttpFailure> {
    /// Retry on any 4xx or 5xx response; expired sessions on most sites
    /// surface as one or the other.
    #[must_use]
    pub fn client_and_server() -> Self {
        Self::new([HttpFailure::Client, HttpFailure::Server])
    }
}
