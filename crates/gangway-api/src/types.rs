//! Wire types for the gangway API and the status service.

use std::collections::BTreeMap;

use gangway_utils::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Env name carrying the initial release image reference.
pub const RELEASE_IMAGE_INITIAL: &str = "RELEASE_IMAGE_INITIAL";

/// Env name carrying the latest release image reference.
pub const RELEASE_IMAGE_LATEST: &str = "RELEASE_IMAGE_LATEST";

/// Execution type for one-off job launches.
const JOB_EXECUTION_TYPE: &str = "1";

/// Pod-level options of a job execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodSpecOptions {
    pub envs: BTreeMap<String, String>,
}

/// Job specification submitted to the gangway API.
///
/// Built once per invocation, immutable afterwards, and reused verbatim
/// across every launch of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSpec {
    pub job_execution_type: String,
    pub pod_spec_options: PodSpecOptions,
}

impl JobSpec {
    /// Build a spec for the given release images, then apply `NAME=VALUE`
    /// overrides in list order. A later override silently replaces an
    /// earlier one, or a base value, with the same name.
    pub fn for_release_images(
        initial: &str,
        latest: &str,
        overrides: &[String],
    ) -> Result<Self, ConfigError> {
        let mut envs = BTreeMap::new();
        envs.insert(RELEASE_IMAGE_INITIAL.to_string(), initial.to_string());
        envs.insert(RELEASE_IMAGE_LATEST.to_string(), latest.to_string());

        for raw in overrides {
            let (name, value) = parse_env_override(raw)?;
            envs.insert(name, value);
        }

        Ok(Self {
            job_execution_type: JOB_EXECUTION_TYPE.to_string(),
            pod_spec_options: PodSpecOptions { envs },
        })
    }
}

/// Split a `NAME=VALUE` override string. Exactly one `=` is required;
/// anything else is a configuration error.
fn parse_env_override(raw: &str) -> Result<(String, String), ConfigError> {
    let mut parts = raw.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) => Ok((name.to_string(), value.to_string())),
        _ => Err(ConfigError::InvalidEnvOverride {
            value: raw.to_string(),
        }),
    }
}

/// Opaque execution identifier decoded from a submission response.
///
/// The response carries more fields; only `id` is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutionHandle {
    pub id: String,
}

/// One document of the status service's multi-document response body.
///
/// Real documents carry far more than this; everything the tool does not
/// consume is ignored on decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    pub status: Option<StatusFields>,
}

/// The `status` mapping of a status document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusFields {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub build_id: Option<String>,
}

/// Progress of resolving an execution ID against the status service.
///
/// Mutated in place by polling attempts; the status counts as resolved
/// once `url` is non-empty. `build_id` may stay empty even then — the
/// service is not required to report one before the URL appears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStatus {
    pub execution_id: String,
    pub build_id: String,
    pub url: String,
}

impl ResolvedStatus {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
            ..Self::default()
        }
    }

    /// True once the status service has reported a browsable URL.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn spec_serializes_to_exact_wire_schema() {
        let spec = JobSpec::for_release_images("img-a", "img-b", &[]).unwrap();
        let payload = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            payload,
            r#"{"job_execution_type":"1","pod_spec_options":{"envs":{"RELEASE_IMAGE_INITIAL":"img-a","RELEASE_IMAGE_LATEST":"img-b"}}}"#
        );
    }

    #[test]
    fn overrides_extend_and_replace_base_envs() {
        let overrides = vec![
            "FOO=bar".to_string(),
            "RELEASE_IMAGE_INITIAL=override".to_string(),
        ];
        let spec = JobSpec::for_release_images("img-a", "img-b", &overrides).unwrap();

        let envs = &spec.pod_spec_options.envs;
        assert_eq!(envs.get("FOO").map(String::as_str), Some("bar"));
        assert_eq!(
            envs.get(RELEASE_IMAGE_INITIAL).map(String::as_str),
            Some("override")
        );
        assert_eq!(envs.get(RELEASE_IMAGE_LATEST).map(String::as_str), Some("img-b"));
    }

    #[test]
    fn later_override_wins_over_earlier_one() {
        let overrides = vec!["FOO=first".to_string(), "FOO=second".to_string()];
        let spec = JobSpec::for_release_images("img-a", "img-b", &overrides).unwrap();
        assert_eq!(
            spec.pod_spec_options.envs.get("FOO").map(String::as_str),
            Some("second")
        );
    }

    #[test]
    fn override_without_equals_is_rejected() {
        let overrides = vec!["NOVALUE".to_string()];
        let err = JobSpec::for_release_images("img-a", "img-b", &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvOverride { value } if value == "NOVALUE"));
    }

    #[test]
    fn override_with_multiple_equals_is_rejected() {
        let overrides = vec!["FOO=bar=baz".to_string()];
        let err = JobSpec::for_release_images("img-a", "img-b", &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvOverride { .. }));
    }

    #[test]
    fn empty_value_is_allowed() {
        let (name, value) = parse_env_override("FOO=").unwrap();
        assert_eq!(name, "FOO");
        assert_eq!(value, "");
    }

    #[test]
    fn status_document_decodes_optional_fields() {
        let doc: StatusDocument =
            serde_yaml::from_str("status:\n  url: \"http://x\"\n  build_id: \"42\"\n").unwrap();
        let fields = doc.status.unwrap();
        assert_eq!(fields.url.as_deref(), Some("http://x"));
        assert_eq!(fields.build_id.as_deref(), Some("42"));

        let doc: StatusDocument = serde_yaml::from_str("spec:\n  job: foo\n").unwrap();
        assert!(doc.status.is_none());
    }

    proptest! {
        #[test]
        fn single_equals_overrides_always_land_in_envs(
            name in "[A-Z][A-Z0-9_]{0,15}",
            value in "[^=]{0,20}",
        ) {
            let raw = format!("{name}={value}");
            let spec = JobSpec::for_release_images("a", "b", &[raw]).unwrap();
            prop_assert_eq!(
                spec.pod_spec_options.envs.get(&name).map(String::as_str),
                Some(value.as_str())
            );
        }

        #[test]
        fn strings_without_exactly_one_equals_never_parse(
            raw in "[^=]*(=[^=]*){2,4}|[^=]+",
        ) {
            prop_assume!(raw.chars().filter(|c| *c == '=').count() != 1);
            prop_assert!(parse_env_override(&raw).is_err());
        }
    }
}
