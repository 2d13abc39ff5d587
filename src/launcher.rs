//! The launch loop: submit, resolve, report, repeat.
//!
//! Cycles run strictly sequentially. Each cycle fully completes, including
//! all of its polling attempts, before the next begins, and a fixed pacing
//! delay separates cycles so repeated launches do not hammer the execution
//! API.

use std::time::Duration;

use async_trait::async_trait;
use gangway_api::resolve::{StatusResolver, StatusSource};
use gangway_api::submit::GangwayClient;
use gangway_api::types::{ExecutionHandle, JobSpec, ResolvedStatus};
use gangway_utils::error::GangwayError;

use crate::config::LaunchConfig;
use crate::records::JobRunRecord;

/// Fixed pause between launch cycles.
const CYCLE_PACING: Duration = Duration::from_secs(1);

const TABLE_RULE: &str =
    "---------------------------------------------------------------------------";

/// The submit/resolve pair behind one launch cycle.
///
/// The production implementation talks to the gangway API and the status
/// service; tests script both sides.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn submit(
        &self,
        job_name: &str,
        spec: &JobSpec,
    ) -> Result<ExecutionHandle, GangwayError>;

    async fn resolve(&self, execution_id: &str) -> Result<ResolvedStatus, GangwayError>;
}

/// Production backend: gangway submission plus prow status resolution.
pub struct GangwayBackend<S> {
    client: GangwayClient,
    resolver: StatusResolver<S>,
}

impl<S> GangwayBackend<S> {
    pub fn new(client: GangwayClient, resolver: StatusResolver<S>) -> Self {
        Self { client, resolver }
    }
}

#[async_trait]
impl<S: StatusSource> ExecutionBackend for GangwayBackend<S> {
    async fn submit(
        &self,
        job_name: &str,
        spec: &JobSpec,
    ) -> Result<ExecutionHandle, GangwayError> {
        self.client.submit(job_name, spec).await
    }

    async fn resolve(&self, execution_id: &str) -> Result<ResolvedStatus, GangwayError> {
        self.resolver.resolve(execution_id).await
    }
}

/// Drives N sequential launch cycles over one pre-built [`JobSpec`].
pub struct Launcher<'a> {
    config: &'a LaunchConfig,
    pacing: Duration,
}

impl<'a> Launcher<'a> {
    pub fn new(config: &'a LaunchConfig) -> Self {
        Self {
            config,
            pacing: CYCLE_PACING,
        }
    }

    #[cfg(test)]
    fn with_pacing(config: &'a LaunchConfig, pacing: Duration) -> Self {
        Self { config, pacing }
    }

    /// Run every launch cycle, returning one record per cycle in submission
    /// order.
    ///
    /// Any fatal error (submission failure, resolution exhaustion) aborts
    /// the remaining cycles immediately; the caller never persists records
    /// from an aborted run.
    pub async fn run<B: ExecutionBackend>(
        &self,
        backend: &B,
    ) -> Result<Vec<JobRunRecord>, GangwayError> {
        let config = self.config;

        // Echo the spec for anyone who needs to debug what was submitted.
        if let Ok(pretty) = serde_json::to_string_pretty(&config.spec) {
            println!("{pretty}");
        }

        println!("{}", table_row("Job", "ID", "URL"));
        println!("{TABLE_RULE}");

        let mut launched = Vec::with_capacity(config.count as usize);
        for cycle in 1..=config.count {
            let handle = backend.submit(&config.job_name, &config.spec).await?;
            let status = backend.resolve(&handle.id).await?;

            launched.push(JobRunRecord {
                job_name: config.job_name.clone(),
                job_run_id: status.build_id.clone(),
            });
            println!("{}", table_row(&cycle.to_string(), &handle.id, &status.url));

            if cycle < config.count {
                tokio::time::sleep(self.pacing).await;
            }
        }

        Ok(launched)
    }
}

fn table_row(job: &str, id: &str, url: &str) -> String {
    format!("{job:<3} | {id:<38} | {url:<80}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gangway_utils::error::{ResolveError, SubmitError};
    use std::sync::Mutex;

    fn test_config(count: u32) -> LaunchConfig {
        LaunchConfig {
            token: "token".to_string(),
            api_url: "http://api".to_string(),
            status_url: "http://status".to_string(),
            job_name: "periodic-ci-example".to_string(),
            spec: JobSpec::for_release_images("img-a", "img-b", &[]).unwrap(),
            count,
            jobs_file_path: None,
            verbose: false,
        }
    }

    /// Backend recording call order, with scriptable failure points.
    #[derive(Default)]
    struct StubBackend {
        calls: Mutex<Vec<String>>,
        fail_submit_on: Option<u32>,
        fail_resolve_on: Option<u32>,
    }

    impl StubBackend {
        fn submissions(&self) -> u32 {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.starts_with("submit"))
                .count() as u32
        }
    }

    #[async_trait]
    impl ExecutionBackend for StubBackend {
        async fn submit(
            &self,
            job_name: &str,
            _spec: &JobSpec,
        ) -> Result<ExecutionHandle, GangwayError> {
            let cycle = self.submissions() + 1;
            self.calls.lock().unwrap().push(format!("submit {job_name}"));
            if self.fail_submit_on == Some(cycle) {
                return Err(SubmitError::Transport("connection refused".to_string()).into());
            }
            Ok(ExecutionHandle {
                id: format!("exec-{cycle}"),
            })
        }

        async fn resolve(&self, execution_id: &str) -> Result<ResolvedStatus, GangwayError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("resolve {execution_id}"));
            let cycle: u32 = execution_id.trim_start_matches("exec-").parse().unwrap();
            if self.fail_resolve_on == Some(cycle) {
                return Err(ResolveError::Exhausted {
                    execution_id: execution_id.to_string(),
                    attempts: 5,
                }
                .into());
            }
            Ok(ResolvedStatus {
                execution_id: execution_id.to_string(),
                build_id: format!("build-{cycle}"),
                url: format!("http://prow/view/{cycle}"),
            })
        }
    }

    #[tokio::test]
    async fn produces_one_record_per_cycle_in_submission_order() {
        let config = test_config(3);
        let backend = StubBackend::default();

        let launched = Launcher::with_pacing(&config, Duration::ZERO)
            .run(&backend)
            .await
            .unwrap();

        assert_eq!(launched.len(), 3);
        for (index, record) in launched.iter().enumerate() {
            assert_eq!(record.job_name, "periodic-ci-example");
            assert_eq!(record.job_run_id, format!("build-{}", index + 1));
        }

        // Strictly sequential: each cycle resolves before the next submits.
        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "submit periodic-ci-example",
                "resolve exec-1",
                "submit periodic-ci-example",
                "resolve exec-2",
                "submit periodic-ci-example",
                "resolve exec-3",
            ]
        );
    }

    #[tokio::test]
    async fn submission_failure_aborts_remaining_cycles() {
        let config = test_config(3);
        let backend = StubBackend {
            fail_submit_on: Some(2),
            ..StubBackend::default()
        };

        let err = Launcher::with_pacing(&config, Duration::ZERO)
            .run(&backend)
            .await
            .unwrap_err();

        assert!(matches!(err, GangwayError::Submit(_)));
        // Cycle 3 never started.
        assert_eq!(backend.submissions(), 2);
    }

    #[tokio::test]
    async fn resolution_exhaustion_aborts_remaining_cycles() {
        let config = test_config(3);
        let backend = StubBackend {
            fail_resolve_on: Some(1),
            ..StubBackend::default()
        };

        let err = Launcher::with_pacing(&config, Duration::ZERO)
            .run(&backend)
            .await
            .unwrap_err();

        assert!(matches!(err, GangwayError::Resolve(_)));
        assert_eq!(backend.submissions(), 1);
    }

    #[tokio::test]
    async fn record_keeps_an_empty_build_id_when_the_service_never_reported_one() {
        struct NoBuildIdBackend;

        #[async_trait]
        impl ExecutionBackend for NoBuildIdBackend {
            async fn submit(
                &self,
                _job_name: &str,
                _spec: &JobSpec,
            ) -> Result<ExecutionHandle, GangwayError> {
                Ok(ExecutionHandle {
                    id: "exec-1".to_string(),
                })
            }

            async fn resolve(&self, execution_id: &str) -> Result<ResolvedStatus, GangwayError> {
                Ok(ResolvedStatus {
                    execution_id: execution_id.to_string(),
                    build_id: String::new(),
                    url: "http://prow/view/1".to_string(),
                })
            }
        }

        let config = test_config(1);
        let launched = Launcher::with_pacing(&config, Duration::ZERO)
            .run(&NoBuildIdBackend)
            .await
            .unwrap();

        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].job_run_id, "");
    }

    #[test]
    fn table_rows_are_fixed_width() {
        let row = table_row("1", "abc", "http://x");
        assert!(row.starts_with("1   | abc"));
        assert_eq!(row.find('|'), Some(4));
    }
}
