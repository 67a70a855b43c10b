//! Shared fixtures: a scripted site, a counting login, and a retrier wired to
//! both.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::future::{self, Ready};
use futures::stream::{self, Iter};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use tether_retry::{FailureKind, Retrier, TransientSet};
use tether_session::{AuthError, Authenticator, Session};
use thiserror::Error;

/// Errors a scraped site can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SiteError {
    #[error("session expired")]
    SessionExpired,
    #[error("server error")]
    ServerError,
    #[error("unexpected page layout")]
    Layout,
}

impl FailureKind for SiteError {
    type Kind = SiteError;

    fn failure_kind(&self) -> SiteError {
        *self
    }
}

/// Login that counts calls and can start rejecting at a given call.
#[derive(Default)]
pub struct CountingLogin {
    calls: AtomicU32,
    reject_from: Option<u32>,
}

impl CountingLogin {
    pub fn rejecting_from(call: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            reject_from: Some(call),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for CountingLogin {
    async fn authenticate(&self) -> tether_session::Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.reject_from {
            Some(from) if call >= from => Err(AuthError::CredentialsRejected(
                "account locked".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "test-bank"
    }
}

/// Records produced by one scripted invocation.
pub type Records<T> = Iter<std::vec::IntoIter<Result<T, SiteError>>>;

/// Outcome of one invocation of a scripted operation.
#[derive(Debug, Clone)]
pub enum Attempt<T> {
    /// The invocation itself fails
    Fail(SiteError),
    /// The invocation returns a sequence with these items
    Yield(Vec<Result<T, SiteError>>),
}

/// A sequence of `records` that ends normally.
pub fn yields(records: &str) -> Attempt<char> {
    Attempt::Yield(records.chars().map(Ok).collect())
}

/// A sequence of `records` followed by `err`.
pub fn yields_then(records: &str, err: SiteError) -> Attempt<char> {
    let mut items: Vec<_> = records.chars().map(Ok).collect();
    items.push(Err(err));
    Attempt::Yield(items)
}

/// Everything a scenario needs to observe.
pub struct Harness {
    pub login: Arc<CountingLogin>,
    pub session: Arc<Session>,
    pub retrier: Retrier<SiteError>,
    pub invocations: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_login(CountingLogin::default())
    }

    pub fn with_login(login: CountingLogin) -> Self {
        Self::build(login, Session::new)
    }

    /// A harness whose session has not logged in yet.
    pub fn logged_out(login: CountingLogin) -> Self {
        Self::build(login, Session::logged_out)
    }

    fn build(login: CountingLogin, make_session: fn(Arc<dyn Authenticator>) -> Session) -> Self {
        let login = Arc::new(login);
        let session = Arc::new(make_session(login.clone()));
        let retrier = Retrier::new(
            session.clone(),
            TransientSet::new([SiteError::SessionExpired, SiteError::ServerError]),
        );
        Self {
            login,
            session,
            retrier,
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn logins(&self) -> u32 {
        self.login.calls()
    }

    /// An operation that plays `script` one attempt per invocation.
    ///
    /// Panics if invoked while the session is invalid or more often than the
    /// script allows.
    pub fn operation<T: Clone>(
        &self,
        script: Vec<Attempt<T>>,
    ) -> impl FnMut() -> Ready<Result<Records<T>, SiteError>> {
        let session = self.session.clone();
        let invocations = self.invocations.clone();

        move || {
            assert!(session.is_valid(), "operation invoked on an invalid session");
            let n = invocations.fetch_add(1, Ordering::SeqCst);
            let attempt = script.get(n).cloned().unwrap_or_else(|| {
                panic!(
                    "operation invoked {} times, script has {}",
                    n + 1,
                    script.len()
                )
            });
            future::ready(match attempt {
                Attempt::Fail(err) => Err(err),
                Attempt::Yield(items) => Ok(stream::iter(items)),
            })
        }
    }
}
