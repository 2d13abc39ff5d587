//! Shared infrastructure for gangway-cli.
//!
//! This crate holds the pieces every other part of the workspace leans on:
//! the error taxonomy with exit-code mapping, exit code constants, tracing
//! initialization, and atomic file writes.

pub mod atomic_write;
pub mod error;
pub mod exit_codes;
pub mod logging;

pub use error::{ConfigError, GangwayError, ResolveError, SubmitError};
pub use exit_codes::ExitCode;
