//! Job submission against the gangway API.

use gangway_utils::error::{GangwayError, SubmitError};
use tracing::debug;

use crate::http::{HttpClient, redact_error_message};
use crate::types::{ExecutionHandle, JobSpec};

/// Path segment under the API base URL for job executions.
const EXECUTIONS_PATH: &str = "/v1/executions/";

/// Client for launching jobs through the gangway API.
pub struct GangwayClient {
    http: HttpClient,
    api_url: String,
    token: String,
}

impl GangwayClient {
    pub fn new(http: HttpClient, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    /// Submit one execution of `job_name` with the given spec and return
    /// the execution ID the API assigned.
    ///
    /// There is no retry at this layer: a transport failure is fatal for
    /// the launch cycle. Non-2xx responses are rejected before any decode
    /// attempt. The job name is not escaped; callers must supply URL-safe
    /// names.
    pub async fn submit(
        &self,
        job_name: &str,
        spec: &JobSpec,
    ) -> Result<ExecutionHandle, GangwayError> {
        let url = execution_url(&self.api_url, job_name);
        debug!(job = job_name, url = %url, "submitting job execution");

        let response = self
            .http
            .inner()
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(spec)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(redact_error_message(&e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::UnexpectedStatus {
                job: job_name.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let handle: ExecutionHandle = response
            .json()
            .await
            .map_err(|e| SubmitError::Decode(e.to_string()))?;

        debug!(job = job_name, execution_id = %handle.id, "job execution accepted");
        Ok(handle)
    }
}

/// Endpoint for launching `job_name`: base URL plus the executions path.
fn execution_url(api_url: &str, job_name: &str) -> String {
    format!("{api_url}{EXECUTIONS_PATH}{job_name}")
}
