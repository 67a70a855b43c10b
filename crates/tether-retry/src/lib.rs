//! Tether Retry - re-authenticating retry with resumable record iteration.
//!
//! Scraping clients drive stateful remote sessions that expire or fail
//! without warning, often halfway through a paginated listing. This crate
//! wraps such session-bound operations so that:
//!
//! - transient failures (a closed, caller-chosen set of error kinds) trigger a
//!   fresh login through the injected [`Session`] and another attempt
//! - record sequences resume after a failure by restarting the operation and
//!   verifying that it reproduces every record already delivered
//! - attempts are bounded, and running out is an error, not an empty result
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::stream;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//! use tether_core::SessionConfig;
//! use tether_retry::{FieldEq, Retrier, TransientSet};
//! use tether_session::{Credentials, HttpLogin, Session};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Transaction {
//!     label: String,
//!     amount_cents: i64,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig {
//!     login_url: Some("https://bank.example/login".to_string()),
//!     ..SessionConfig::default()
//! };
//! let login = HttpLogin::from_config(&config, Credentials::new("alice", "s3cret"))?;
//! let client = login.client().clone();
//! let session = Arc::new(Session::logged_out(Arc::new(login)));
//! let retrier = Retrier::new(session, TransientSet::client_and_server());
//!
//! let balance = retrier
//!     .run(|| {
//!         let client = client.clone();
//!         async move {
//!             client
//!                 .get("https://bank.example/balance")
//!                 .send()
//!                 .await?
//!                 .error_for_status()?
//!                 .text()
//!                 .await
//!         }
//!     })
//!     .await?;
//! println!("{balance}");
//!
//! let mut history = retrier
//!     .run_records(
//!         || {
//!             let client = client.clone();
//!             async move {
//!                 let rows: Vec<Transaction> = client
//!                     .get("https://bank.example/history")
//!                     .send()
//!                     .await?
//!                     .error_for_status()?
//!                     .json()
//!                     .await?;
//!                 Ok::<_, reqwest::Error>(stream::iter(
//!                     rows.into_iter().map(Ok::<_, reqwest::Error>),
//!                 ))
//!             }
//!         },
//!         FieldEq,
//!     )
//!     .await?;
//! while let Some(transaction) = history.next().await? {
//!     println!("{transaction:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Session`]: tether_session::Session

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod budget;
pub mod classifier;
pub mod equality;
pub mod error;
pub mod http;
mod operation;
pub mod orchestrator;
pub mod policy;
pub mod replayer;

// Re-export commonly used types
pub use budget::AttemptBudget;
pub use classifier::{FailureKind, TransientSet};
pub use equality::{FieldEq, FnEq, RecordEq, ValueEq};
pub use error::{Result, RetryError};
pub use http::HttpFailure;
pub use operation::Operation;
pub use orchestrator::Retrier;
pub use policy::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use replayer::{Phase, Replayer};
