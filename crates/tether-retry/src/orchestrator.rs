//! Retry orchestration for session-bound operations.
//!
//! The [`Retrier`] invokes an operation against a [`Session`], re-establishing
//! the session and retrying on transient failures until the attempt budget
//! runs out. Scalar results are returned directly; record sequences are handed
//! to a [`Replayer`] together with whatever budget is left.

use crate::budget::AttemptBudget;
use crate::classifier::{FailureKind, TransientSet};
use crate::equality::RecordEq;
use crate::error::{Result, RetryError};
use crate::operation::Operation;
use crate::policy::RetryPolicy;
use crate::replayer::Replayer;
use futures::Stream;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;
use tether_core::{ConfigResult, RetryConfig};
use tether_session::Session;

/// Runs operations against a session with re-authenticating retry.
///
/// Cheap to clone; clones share the session.
#[derive(Debug, Clone)]
pub struct Retrier<K: Eq + Hash> {
    session: Arc<Session>,
    transient: TransientSet<K>,
    policy: RetryPolicy,
}

impl<K> Retrier<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Create a retrier with the default policy (4 attempts, no delay).
    #[must_use]
    pub fn new(session: Arc<Session>, transient: TransientSet<K>) -> Self {
        Self {
            session,
            transient,
            policy: RetryPolicy::default(),
        }
    }

    /// Create a retrier whose policy comes from configuration.
    pub fn from_config(
        session: Arc<Session>,
        transient: TransientSet<K>,
        config: &RetryConfig,
    ) -> ConfigResult<Self> {
        Ok(Self::new(session, transient).with_policy(RetryPolicy::from_config(config)?))
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The session operations run against.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The kinds treated as transient.
    #[must_use]
    pub fn transient(&self) -> &TransientSet<K> {
        &self.transient
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run an operation producing a single value.
    ///
    /// # Errors
    /// - [`RetryError::Exhausted`] if every attempt failed transiently
    /// - [`RetryError::Auth`] if the session could not be re-established
    /// - [`RetryError::Unrecoverable`] on the first non-transient failure
    pub async fn run<O>(&self, mut operation: O) -> Result<O::Output, O::Error>
    where
        O: Operation,
        O::Error: FailureKind<Kind = K> + Display,
    {
        let mut budget = self.policy.budget();
        self.invoke(&mut operation, &mut budget).await
    }

    /// Run an operation producing a record sequence.
    ///
    /// The first invocation happens here, under the same rules as [`run`];
    /// the returned [`Replayer`] then owns the remaining budget and resumes
    /// the sequence across later failures, verifying replayed records with
    /// `eq`.
    ///
    /// [`run`]: Retrier::run
    pub async fn run_records<O, R, Q>(
        &self,
        mut operation: O,
        eq: Q,
    ) -> Result<Replayer<O, R, Q, K>, O::Error>
    where
        O: Operation,
        O::Output: Stream<Item = std::result::Result<R, O::Error>> + Unpin,
        O::Error: FailureKind<Kind = K> + Display,
        R: Clone + Debug,
        Q: RecordEq<R>,
    {
        let mut budget = self.policy.budget();
        let records = self.invoke(&mut operation, &mut budget).await?;
        Ok(Replayer::streaming(
            self.clone(),
            operation,
            eq,
            records,
            budget,
        ))
    }

    /// Wrap a record-sequence operation without invoking it.
    ///
    /// The first pull on the returned [`Replayer`] performs the initial
    /// invocation, under the same rules as [`run_records`].
    ///
    /// [`run_records`]: Retrier::run_records
    pub fn records<O, R, Q>(&self, operation: O, eq: Q) -> Replayer<O, R, Q, K>
    where
        O: Operation,
        O::Output: Stream<Item = std::result::Result<R, O::Error>> + Unpin,
        O::Error: FailureKind<Kind = K> + Display,
        R: Clone + Debug,
        Q: RecordEq<R>,
    {
        Replayer::fresh(self.clone(), operation, eq, self.policy.budget())
    }

    /// Invoke until success, consuming `budget` on each transient failure.
    ///
    /// Every transient failure triggers a login before the budget is checked,
    /// so a call that fails on all `n` attempts performs `n` logins. Shared
    /// by every entry point's initial invocation, including a lazy
    /// [`Replayer`]'s first pull.
    pub(crate) async fn invoke<O>(
        &self,
        operation: &mut O,
        budget: &mut AttemptBudget,
    ) -> Result<O::Output, O::Error>
    where
        O: Operation,
        O::Error: FailureKind<Kind = K> + Display,
    {
        loop {
            self.session.ensure_valid().await?;

            match operation.invoke().await {
                Ok(value) => return Ok(value),
                Err(err) if self.transient.is_transient(&err) => {
                    self.session.invalidate();
                    tracing::info!(
                        "{} raised ({:?}), retrying (attempt {}/{})",
                        err,
                        err.failure_kind(),
                        budget.used() + 1,
                        budget.total()
                    );
                    self.session.ensure_valid().await?;

                    let failure = budget.consume();
                    if budget.is_exhausted() {
                        tracing::warn!(
                            "Source did not reply successfully after {} attempts",
                            budget.total()
                        );
                        return Err(RetryError::Exhausted {
                            attempts: budget.total(),
                            last: err,
                        });
                    }
                    self.policy.pause(failure).await;
                }
                Err(err) => return Err(RetryError::Unrecoverable(err)),
            }
        }
    }
}
