//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap.
//! The tool is single-purpose, so the surface is a flat flag set rather
//! than subcommands.

use camino::Utf8PathBuf;
use clap::Parser;

/// Default status service queried for execution URLs.
pub const DEFAULT_STATUS_URL: &str = "https://prow.ci.openshift.org/prowjob";

/// gangway-cli - launch prow jobs through the gangway API
#[derive(Parser, Debug)]
#[command(name = "gangway-cli")]
#[command(about = "Launch prow jobs through the gangway API and resolve their URLs")]
#[command(long_about = r#"
gangway-cli submits one or more executions of a prow job to the gangway
REST API, polls the prow status service until each execution's monitoring
URL becomes available, and prints a table of execution IDs and URLs.

EXAMPLES:
  # Launch a job once
  gangway-cli -i registry.example/initial:4.14 -l registry.example/latest:4.15 \
      -j periodic-ci-example-job -u https://gangway.example.com

  # Launch five copies with an extra environment override
  gangway-cli -i img-a -l img-b -j periodic-ci-example-job \
      -u https://gangway.example.com -n 5 --env DUMMY_TARGET=single-node

  # Also record the launched job run IDs for aggregation tooling
  gangway-cli -i img-a -l img-b -j periodic-ci-example-job \
      -u https://gangway.example.com --jobs-file-path /tmp/launches

AUTHENTICATION:
  The bearer token is read from the MY_APPCI_TOKEN environment variable;
  a missing token is a startup error.
"#)]
#[command(version)]
pub struct Cli {
    /// Initial release image
    #[arg(short = 'i', long)]
    pub initial: String,

    /// Latest release image
    #[arg(short = 'l', long)]
    pub latest: String,

    /// Additional environment overrides for the job's pod spec (repeatable)
    #[arg(long = "env", value_name = "NAME=VALUE")]
    pub env: Vec<String>,

    /// Name of the prow job to launch
    #[arg(short = 'j', long = "job-name")]
    pub job_name: String,

    /// Gangway API base URL
    #[arg(short = 'u', long = "api-url")]
    pub api_url: String,

    /// Status service base URL used to resolve execution URLs
    #[arg(long = "status-url", default_value = DEFAULT_STATUS_URL)]
    pub status_url: String,

    /// Number of times to launch the job (max 20)
    #[arg(short = 'n', long = "num", default_value_t = 1)]
    pub num: u32,

    /// Directory to write a JSON manifest of launched job run IDs into
    #[arg(long = "jobs-file-path", value_name = "DIR")]
    pub jobs_file_path: Option<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
