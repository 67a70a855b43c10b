//! Tether Core - Foundation crate for the tether resilience layer.
//!
//! This crate provides the configuration model, configuration errors and the
//! tracing setup shared by the session and retry crates.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`logging`] - `tracing-subscriber` initialization
//!
//! # Example
//!
//! ```rust
//! use tether_core::TetherConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TetherConfig::default();
//! config.validate()?;
//! assert_eq!(config.retry.max_attempts, 4);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{LoggingConfig, RetryConfig, SessionConfig, TetherConfig};
pub use error::{ConfigError, ConfigResult};
pub use logging::init_tracing;
