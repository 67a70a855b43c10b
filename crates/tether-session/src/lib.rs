//! Tether Session - the session a retrying operation runs against.
//!
//! A remote site session is a single mutable resource: it is either usable or
//! it must be re-established by a full login before any further request. This
//! crate models that as a [`Session`] holding a validity flag and an injected
//! [`Authenticator`].
//!
//! # Components
//!
//! - [`Authenticator`]: the login collaborator
//! - [`Session`]: validity flag plus authentication bookkeeping
//! - [`HttpLogin`]: form-post login over a cookie-keeping `reqwest` client
//! - [`Credentials`]: username and zeroized password

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod authenticator;
pub mod error;
pub mod http;
pub mod session;

pub use authenticator::{Authenticator, Credentials};
pub use error::{AuthError, Result};
pub use http::HttpLogin;
pub use session::Session;
