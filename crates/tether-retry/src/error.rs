use tether_session::AuthError;
use thiserror::Error;

/// Result type for retried calls whose operation fails with `E`.
pub type Result<T, E> = std::result::Result<T, RetryError<E>>;

/// Terminal outcomes of a retried call.
///
/// `E` is the operation's own error type.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed transiently
    #[error("source unavailable after {attempts} attempts (last error: {last})")]
    Exhausted {
        /// Attempts consumed by the call
        attempts: u32,
        /// The transient error that used up the budget
        last: E,
    },

    /// The session could not be re-established
    #[error("session re-authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// A replayed record differs from the one already delivered
    #[error("source replied inconsistently between retries at position {position}: {delivered} vs {replayed}")]
    Inconsistent {
        /// Zero-based index into the delivered records
        position: usize,
        /// Debug rendering of the record the caller already received
        delivered: String,
        /// Debug rendering of the record the restarted source produced
        replayed: String,
    },

    /// The restarted source ended before reproducing the delivered prefix
    #[error("source replied fewer elements ({replayed}) than previous attempt ({expected})")]
    FewerRecords {
        /// Records the restarted source produced
        replayed: usize,
        /// Records delivered before the failure
        expected: usize,
    },

    /// Operation error outside the transient set
    #[error("{0}")]
    Unrecoverable(E),
}

impl<E> RetryError<E> {
    /// Whether this error reports a replay that did not reproduce the
    /// delivered prefix.
    #[must_use]
    pub fn is_replay_inconsistency(&self) -> bool {
        matches!(self, Self::Inconsistent { .. } | Self::FewerRecords { .. })
    }

    /// The operation error carried by this outcome, if any.
    #[must_use]
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            Self::Exhausted { last, .. } => Some(last),
            Self::Unrecoverable(err) => Some(err),
            _ => None,
        }
    }
}
