//! Status resolution for launched executions.
//!
//! The status service is eventually consistent: immediately after a launch
//! it usually has no document for the execution yet, and an empty response
//! is a normal "not yet ready" state rather than an error. Resolution polls
//! with bounded exponential backoff until a browsable URL appears.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use gangway_utils::error::{GangwayError, ResolveError};
use tracing::{debug, warn};

use crate::http::{HttpClient, redact_error_message};
use crate::retry::{Attempt, RetryPolicy, retry_with_backoff};
use crate::types::{ResolvedStatus, StatusDocument};

/// Default base delay between polling attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default bound on polling attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Separator between documents in a status response body.
const DOCUMENT_SEPARATOR: &str = "---";

/// Where the resolver reads raw status bodies from.
///
/// The production implementation queries the status service over HTTP;
/// tests script response sequences instead.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw multi-document status body for an execution ID.
    async fn fetch(&self, execution_id: &str) -> anyhow::Result<String>;
}

/// HTTP-backed status source querying `<base_url>?prowjob=<id>`.
pub struct HttpStatusSource {
    http: HttpClient,
    base_url: String,
}

impl HttpStatusSource {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self, execution_id: &str) -> anyhow::Result<String> {
        let url = format!("{}?prowjob={}", self.base_url, execution_id);
        let response = self.http.inner().get(&url).send().await?;
        Ok(response.text().await?)
    }
}

/// Resolves execution IDs to browsable URLs via a status source.
pub struct StatusResolver<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: StatusSource> StatusResolver<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Resolve an execution ID to a browsable URL, retaining any build ID
    /// seen along the way (including on earlier attempts).
    ///
    /// Transport failures while querying are soft: logged and treated as
    /// "not yet resolved" for that attempt. Only exhausting the retry
    /// policy without a URL is an error.
    pub async fn resolve(&self, execution_id: &str) -> Result<ResolvedStatus, GangwayError> {
        // Polling is strictly sequential; the mutex only exists to keep the
        // returned future Send.
        let state = Mutex::new(ResolvedStatus::new(execution_id));

        let outcome: Result<Option<ResolvedStatus>, GangwayError> =
            retry_with_backoff(self.policy, |attempt| {
                let state = &state;
                let source = &self.source;
                async move {
                    match source.fetch(execution_id).await {
                        Ok(body) => {
                            let mut status = state.lock().unwrap_or_else(PoisonError::into_inner);
                            scan_documents(&body, &mut status);
                            if status.is_resolved() {
                                Attempt::Ready(status.clone())
                            } else {
                                debug!(execution_id, attempt, "status.url not reported yet");
                                Attempt::NotYet
                            }
                        }
                        Err(err) => {
                            warn!(
                                execution_id,
                                attempt,
                                error = %redact_error_message(&err.to_string()),
                                "status query failed, treating as not yet resolved"
                            );
                            Attempt::NotYet
                        }
                    }
                }
            })
            .await;

        match outcome? {
            Some(status) => {
                debug!(
                    execution_id,
                    url = %status.url,
                    build_id = %status.build_id,
                    "execution resolved"
                );
                Ok(status)
            }
            None => Err(ResolveError::Exhausted {
                execution_id: execution_id.to_string(),
                attempts: self.policy.max_attempts,
            }
            .into()),
        }
    }
}

/// Scan a multi-document status body in order, updating `status` from each
/// document. The scan terminates at the first non-empty `status.url`;
/// documents past that point are not inspected.
///
/// Documents that fail to decode are skipped. A `build_id` sighting always
/// overwrites the retained value, so the kept one is the last seen before
/// resolution.
fn scan_documents(body: &str, status: &mut ResolvedStatus) {
    for document in body.split(DOCUMENT_SEPARATOR) {
        let parsed: StatusDocument = match serde_yaml::from_str(document) {
            Ok(parsed) => parsed,
            Err(_) => continue,
        };
        let Some(fields) = parsed.status else {
            continue;
        };

        if let Some(build_id) = fields.build_id {
            status.build_id = build_id;
        }
        if let Some(url) = fields.url
            && !url.is_empty()
        {
            status.url = url;
            return;
        }
    }
}
