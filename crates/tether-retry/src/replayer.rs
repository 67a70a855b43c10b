//! Resumable record iteration.
//!
//! A remote listing has no resume cursor: after the session breaks, the only
//! way to continue is to run the operation again from the start. The
//! [`Replayer`] does that, then checks that the restarted sequence reproduces
//! every record the caller has already received before forwarding anything
//! new. A restarted sequence that diverges or runs short is reported, never
//! papered over.

use crate::budget::AttemptBudget;
use crate::classifier::FailureKind;
use crate::equality::RecordEq;
use crate::error::{Result, RetryError};
use crate::operation::Operation;
use crate::orchestrator::Retrier;
use futures::{Stream, StreamExt};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Where a [`Replayer`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The operation has not been invoked yet
    Fresh,
    /// Records are being forwarded from a live sequence
    Streaming,
    /// The last sequence broke; the next pull restarts and verifies it
    Replaying,
    /// The iteration ended, successfully or not
    Done,
}

enum State<S> {
    Fresh,
    Streaming(S),
    Replaying,
    Done,
}

/// Pull-based record sequence that survives session failures.
///
/// Obtained from [`Retrier::run_records`] or [`Retrier::records`]. Each call
/// to [`Replayer::next`] yields the next record, the end of the sequence, or a
/// terminal error. After a terminal error the replayer is [`Phase::Done`] and
/// yields nothing more.
pub struct Replayer<O, R, Q, K>
where
    O: Operation,
    K: Eq + Hash,
{
    retrier: Retrier<K>,
    operation: O,
    eq: Q,
    state: State<O::Output>,
    delivered: Vec<R>,
    yielded: usize,
    budget: AttemptBudget,
}

impl<O, R, Q, K> Replayer<O, R, Q, K>
where
    O: Operation,
    O::Output: Stream<Item = std::result::Result<R, O::Error>> + Unpin,
    O::Error: FailureKind<Kind = K> + Display,
    R: Clone + Debug,
    Q: RecordEq<R>,
    K: Copy + Eq + Hash + Debug,
{
    pub(crate) fn fresh(retrier: Retrier<K>, operation: O, eq: Q, budget: AttemptBudget) -> Self {
        Self::with_state(retrier, operation, eq, State::Fresh, budget)
    }

    pub(crate) fn streaming(
        retrier: Retrier<K>,
        operation: O,
        eq: Q,
        records: O::Output,
        budget: AttemptBudget,
    ) -> Self {
        Self::with_state(retrier, operation, eq, State::Streaming(records), budget)
    }

    fn with_state(
        retrier: Retrier<K>,
        operation: O,
        eq: Q,
        state: State<O::Output>,
        budget: AttemptBudget,
    ) -> Self {
        Self {
            retrier,
            operation,
            eq,
            state,
            delivered: Vec::new(),
            yielded: 0,
            budget,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Fresh => Phase::Fresh,
            State::Streaming(_) => Phase::Streaming,
            State::Replaying => Phase::Replaying,
            State::Done => Phase::Done,
        }
    }

    /// Records forwarded to the caller so far.
    #[must_use]
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Attempts left before the iteration gives up.
    #[must_use]
    pub fn remaining_attempts(&self) -> u32 {
        self.budget.remaining()
    }

    /// Pull the next record.
    ///
    /// Returns `Ok(None)` once the sequence ends.
    ///
    /// # Errors
    /// - [`RetryError::Exhausted`] when transient failures used up the budget
    /// - [`RetryError::Inconsistent`] or [`RetryError::FewerRecords`] when a
    ///   restarted sequence does not reproduce the records already delivered
    /// - [`RetryError::Auth`] when the session could not be re-established
    /// - [`RetryError::Unrecoverable`] on a non-transient failure
    pub async fn next(&mut self) -> Result<Option<R>, O::Error> {
        loop {
            if matches!(self.state, State::Fresh) {
                match self.retrier.invoke(&mut self.operation, &mut self.budget).await {
                    Ok(records) => self.state = State::Streaming(records),
                    Err(err) => return Err(self.fail(err)),
                }
                continue;
            }

            if matches!(self.state, State::Replaying) {
                match self.restart().await {
                    Ok(Some(records)) => self.state = State::Streaming(records),
                    Ok(None) => {}
                    Err(err) => return Err(self.fail(err)),
                }
                continue;
            }

            let State::Streaming(records) = &mut self.state else {
                return Ok(None);
            };

            match records.next().await {
                Some(Ok(record)) => {
                    self.delivered.push(record.clone());
                    self.yielded += 1;
                    return Ok(Some(record));
                }
                Some(Err(err)) => {
                    self.state = State::Replaying;
                    if let Err(err) = self.absorb(err).await {
                        return Err(self.fail(err));
                    }
                }
                None => {
                    tracing::debug!("Sequence complete after {} records", self.yielded);
                    self.finish();
                    return Ok(None);
                }
            }
        }
    }

    /// Drain the remaining records into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<R>, O::Error> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Adapt into a [`Stream`]. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<R, O::Error>> {
        futures::stream::unfold(self, |mut replayer| async move {
            match replayer.next().await {
                Ok(Some(record)) => Some((Ok(record), replayer)),
                Ok(None) => None,
                Err(err) => Some((Err(err), replayer)),
            }
        })
    }

    /// Invoke the operation again after a broken sequence and verify it
    /// against the delivered log.
    ///
    /// Returns `Ok(None)` if a transient failure was absorbed and another
    /// restart is due.
    async fn restart(&mut self) -> Result<Option<O::Output>, O::Error> {
        self.retrier.session().ensure_valid().await?;

        let mut records = match self.operation.invoke().await {
            Ok(records) => records,
            Err(err) => {
                self.absorb(err).await?;
                return Ok(None);
            }
        };

        let expected = self.delivered.len();
        if expected > 0 {
            tracing::debug!("Replaying {} delivered records", expected);
        }

        for position in 0..expected {
            match records.next().await {
                Some(Ok(replayed)) => {
                    let delivered = &self.delivered[position];
                    if !self.eq.same(delivered, &replayed) {
                        tracing::warn!(
                            "Source replied inconsistently between retries, {:?} vs {:?}",
                            delivered,
                            replayed
                        );
                        return Err(RetryError::Inconsistent {
                            position,
                            delivered: format!("{delivered:?}"),
                            replayed: format!("{replayed:?}"),
                        });
                    }
                }
                Some(Err(err)) => {
                    self.state = State::Replaying;
                    self.absorb(err).await?;
                    return Ok(None);
                }
                None => {
                    tracing::warn!(
                        "Source replied fewer elements ({}) than last iteration ({})",
                        position,
                        expected
                    );
                    return Err(RetryError::FewerRecords {
                        replayed: position,
                        expected,
                    });
                }
            }
        }

        Ok(Some(records))
    }

    /// Account for a failure from the operation or its sequence.
    ///
    /// Transient failures invalidate the session and consume budget; the
    /// next restart logs in again.
    async fn absorb(&mut self, err: O::Error) -> Result<(), O::Error> {
        if !self.retrier.transient().is_transient(&err) {
            return Err(RetryError::Unrecoverable(err));
        }

        self.retrier.session().invalidate();
        let failure = self.budget.consume();
        if self.budget.is_exhausted() {
            tracing::warn!(
                "Source did not reply successfully after {} attempts",
                self.budget.total()
            );
            return Err(RetryError::Exhausted {
                attempts: self.budget.total(),
                last: err,
            });
        }

        tracing::info!(
            "{} raised ({:?}) after {} records, retrying ({} attempts left)",
            err,
            err.failure_kind(),
            self.delivered.len(),
            self.budget.remaining()
        );
        self.retrier.policy().pause(failure).await;
        Ok(())
    }

    fn fail(&mut self, err: RetryError<O::Error>) -> RetryError<O::Error> {
        self.finish();
        err
    }

    fn finish(&mut self) {
        self.state = State::Done;
        self.delivered.clear();
    }
}
