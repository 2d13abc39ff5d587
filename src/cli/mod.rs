//! Command-line interface for gangway-cli
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions and parsing structures (clap)
//! - `run`: entry point: configuration, runtime setup, and the launch loop

pub mod args;
mod run;

pub use args::Cli;
pub use run::run;
