//! Client library for the gangway job-execution API and the prow status
//! service.
//!
//! The pieces mirror the launch flow: [`types::JobSpec`] describes what to
//! run, [`submit::GangwayClient`] submits one execution and hands back its
//! opaque ID, and [`resolve::StatusResolver`] polls the status service with
//! bounded exponential backoff until that ID maps to a browsable URL.

pub mod http;
pub mod resolve;
pub mod retry;
pub mod submit;
pub mod types;

pub use http::HttpClient;
pub use resolve::{HttpStatusSource, StatusResolver, StatusSource};
pub use retry::{Attempt, RetryPolicy};
pub use submit::GangwayClient;
pub use types::{ExecutionHandle, JobSpec, PodSpecOptions, ResolvedStatus};
