//! gangway-cli - launch prow jobs through the gangway API
//!
//! The tool submits one or more executions of a prow job to the gangway
//! REST job-execution API, polls the prow status service until each
//! execution's monitoring URL becomes available, and optionally persists a
//! JSON manifest of launched job run IDs for downstream aggregation
//! tooling.
//!
//! # Quick Start
//!
//! ```bash
//! export MY_APPCI_TOKEN=<cluster bearer token>
//! gangway-cli -i registry.example/initial:4.14 \
//!     -l registry.example/latest:4.15 \
//!     -j periodic-ci-example-job \
//!     -u https://gangway.example.com \
//!     -n 3 --jobs-file-path /tmp/launches
//! ```
//!
//! The run is strictly sequential: each launch cycle submits once, then
//! polls until resolved (or its retry budget is exhausted), before the next
//! cycle starts. Any fatal error aborts the remaining cycles.

pub mod cli;
pub mod config;
pub mod launcher;
pub mod records;

pub use config::LaunchConfig;
pub use gangway_utils::error::GangwayError;
pub use gangway_utils::exit_codes::ExitCode;
pub use records::JobRunRecord;
