//! Launch configuration.
//!
//! All user input collapses into one [`LaunchConfig`] value before any
//! network activity: parsed flags, the bearer token from the environment,
//! override validation, and the launch-count cap. The struct is built once
//! and passed by reference; nothing configuration-shaped lives in process
//! globals.

use camino::Utf8PathBuf;
use gangway_api::types::JobSpec;
use gangway_utils::error::{ConfigError, GangwayError};

use crate::cli::args::Cli;

/// Environment variable holding the app.ci bearer token.
pub const TOKEN_ENV_VAR: &str = "MY_APPCI_TOKEN";

/// Upper bound on launches per invocation, guarding the execution API
/// against accidental large fan-outs.
pub const MAX_LAUNCHES: u32 = 20;

/// Validated configuration for one invocation.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub token: String,
    pub api_url: String,
    pub status_url: String,
    pub job_name: String,
    /// Built once; reused verbatim across all launches.
    pub spec: JobSpec,
    pub count: u32,
    pub jobs_file_path: Option<Utf8PathBuf>,
    pub verbose: bool,
}

impl LaunchConfig {
    /// Build and validate the configuration from parsed CLI arguments and
    /// the token read from the environment.
    ///
    /// Every configuration error surfaces here, before anything touches
    /// the network.
    pub fn from_cli(cli: &Cli, token: Option<String>) -> Result<Self, GangwayError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken { var: TOKEN_ENV_VAR })?;

        if cli.num > MAX_LAUNCHES {
            return Err(ConfigError::TooManyLaunches {
                requested: cli.num,
                max: MAX_LAUNCHES,
            }
            .into());
        }

        let spec = JobSpec::for_release_images(&cli.initial, &cli.latest, &cli.env)?;

        Ok(Self {
            token,
            api_url: cli.api_url.clone(),
            status_url: cli.status_url.clone(),
            job_name: cli.job_name.clone(),
            spec,
            count: cli.num,
            jobs_file_path: cli.jobs_file_path.clone(),
            verbose: cli.verbose,
        })
    }
}
