//! Error taxonomy for gangway-cli.
//!
//! Errors fall into three categories with distinct propagation rules:
//!
//! | Category | Detected | Exit code |
//! |----------|----------|-----------|
//! | `Config` | before any network call | 2 |
//! | `Submit` | during a launch cycle, fatal for the run | 70 |
//! | `Resolve` | after polling retries are exhausted | 10 |
//!
//! Soft resolution failures (a transport error or an empty URL during
//! polling) never appear here: the retry loop absorbs them, and only
//! exhaustion surfaces as [`ResolveError`].

use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Top-level error type returned by gangway-cli library operations.
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map an error to the CLI
/// exit code table and [`display_for_user()`](Self::display_for_user) for
/// a terminal-ready message with suggestions where we have any.
///
/// Library code returns `GangwayError` and does NOT call
/// `std::process::exit()`; the CLI owns process termination.
#[derive(Error, Debug)]
pub enum GangwayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("Status resolution error: {0}")]
    Resolve(#[from] ResolveError),
}

impl GangwayError {
    /// Map this error to its CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Submit(_) => ExitCode::API_FAILURE,
            Self::Resolve(_) => ExitCode::RESOLVE_TIMEOUT,
        }
    }

    /// Render a user-facing report: the error message plus actionable
    /// suggestions when we can offer any.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut report = format!("✗ {self}");
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            report.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                report.push_str("\n  • ");
                report.push_str(&suggestion);
            }
        }
        report
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Submit(SubmitError::UnexpectedStatus { status, .. })
                if *status == 401 || *status == 403 =>
            {
                vec![
                    "Check that the token in MY_APPCI_TOKEN is current".to_string(),
                    "Tokens for app.ci expire; fetch a fresh one from the cluster console"
                        .to_string(),
                ]
            }
            _ => Vec::new(),
        }
    }
}

/// Configuration errors, all detected before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cluster token required: the {var} environment variable is not set")]
    MissingToken { var: &'static str },

    #[error("invalid environment override {value:?}: expected NAME=VALUE with exactly one '='")]
    InvalidEnvOverride { value: String },

    #[error("requested {requested} launches, which exceeds the maximum of {max}")]
    TooManyLaunches { requested: u32, max: u32 },
}

impl ConfigError {
    /// Suggested actions to resolve the error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingToken { var } => vec![
                format!("Export your cluster bearer token: export {var}=<token>"),
                "Run with --help to see the full flag reference".to_string(),
            ],
            Self::InvalidEnvOverride { .. } => vec![
                "Pass overrides as --env NAME=VALUE".to_string(),
                "Repeat --env once per variable rather than joining pairs".to_string(),
            ],
            Self::TooManyLaunches { max, .. } => vec![format!(
                "Lower --num to {max} or less, or split the run into batches"
            )],
        }
    }
}

/// Errors from a single job submission to the gangway API.
///
/// There is no retry at this layer: every variant is fatal for the run.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("HTTP client misconfigured: {0}")]
    Misconfiguration(String),

    #[error("request to gangway API failed: {0}")]
    Transport(String),

    #[error("gangway API returned status {status} for job {job}")]
    UnexpectedStatus { job: String, status: u16 },

    #[error("failed to decode gangway API response: {0}")]
    Decode(String),
}

/// Errors from resolving an execution ID against the status service.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("status.url not found for execution {execution_id} after {attempts} attempts")]
    Exhausted { execution_id: String, attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_map_to_cli_args_code() {
        let err = GangwayError::Config(ConfigError::MissingToken {
            var: "MY_APPCI_TOKEN",
        });
        assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
    }

    #[test]
    fn submit_errors_map_to_api_failure_code() {
        let err = GangwayError::Submit(SubmitError::Transport("connection refused".to_string()));
        assert_eq!(err.to_exit_code(), ExitCode::API_FAILURE);
    }

    #[test]
    fn resolve_exhaustion_maps_to_resolve_timeout_code() {
        let err = GangwayError::Resolve(ResolveError::Exhausted {
            execution_id: "abc123".to_string(),
            attempts: 5,
        });
        assert_eq!(err.to_exit_code(), ExitCode::RESOLVE_TIMEOUT);
    }

    #[test]
    fn missing_token_report_names_the_variable_and_suggests_export() {
        let err = GangwayError::Config(ConfigError::MissingToken {
            var: "MY_APPCI_TOKEN",
        });
        let report = err.display_for_user();
        assert!(report.contains("MY_APPCI_TOKEN"));
        assert!(report.contains("Suggestions:"));
        assert!(report.contains("export MY_APPCI_TOKEN"));
    }

    #[test]
    fn invalid_override_report_quotes_the_offending_value() {
        let err = GangwayError::Config(ConfigError::InvalidEnvOverride {
            value: "FOO=bar=baz".to_string(),
        });
        let report = err.display_for_user();
        assert!(report.contains("FOO=bar=baz"));
        assert!(report.contains("exactly one '='"));
    }

    #[test]
    fn auth_rejection_suggests_refreshing_the_token() {
        let err = GangwayError::Submit(SubmitError::UnexpectedStatus {
            job: "periodic-ci-example".to_string(),
            status: 401,
        });
        assert!(err.display_for_user().contains("MY_APPCI_TOKEN"));

        // Other statuses carry no suggestions, just the message.
        let err = GangwayError::Submit(SubmitError::UnexpectedStatus {
            job: "periodic-ci-example".to_string(),
            status: 500,
        });
        assert!(!err.display_for_user().contains("Suggestions:"));
    }

    #[test]
    fn exhaustion_message_includes_execution_id_and_attempts() {
        let err = ResolveError::Exhausted {
            execution_id: "exec-9".to_string(),
            attempts: 5,
        };
        let message = err.to_string();
        assert!(message.contains("exec-9"));
        assert!(message.contains("5 attempts"));
    }
}
