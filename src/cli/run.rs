//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds the LaunchConfig (all configuration errors surface here)
//! - Creates the tokio runtime
//! - Drives the launch loop and the manifest recorder
//! - Handles all error output
//!
//! main.rs only calls `std::process::exit(code.as_i32())` on error - it
//! does NOT print.

use clap::Parser;
use tracing::warn;

use gangway_api::http::HttpClient;
use gangway_api::resolve::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, HttpStatusSource, StatusResolver,
};
use gangway_api::retry::RetryPolicy;
use gangway_api::submit::GangwayClient;
use gangway_utils::error::GangwayError;
use gangway_utils::exit_codes::ExitCode;
use gangway_utils::logging;

use super::args::Cli;
use crate::config::{LaunchConfig, TOKEN_ENV_VAR};
use crate::launcher::{GangwayBackend, Launcher};
use crate::records;

/// Main CLI execution function.
///
/// Returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())` after printing any output
/// - On error: prints the user-facing report, returns `Err(ExitCode)`
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("✗ Failed to initialize logging: {e}");
        return Err(ExitCode::INTERNAL);
    }

    // Configuration errors must surface before anything touches the
    // network.
    let token = std::env::var(TOKEN_ENV_VAR).ok();
    let config = match LaunchConfig::from_cli(&cli, token) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let launched = rt.block_on(async {
        let http = HttpClient::new().map_err(GangwayError::from)?;
        let client = GangwayClient::new(http.clone(), &config.api_url, &config.token);
        let resolver = StatusResolver::new(
            HttpStatusSource::new(http, &config.status_url),
            RetryPolicy::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY),
        );
        let backend = GangwayBackend::new(client, resolver);

        Launcher::new(&config).run(&backend).await
    });

    let launched = match launched {
        Ok(launched) => launched,
        Err(err) => {
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    // Manifest failures never change the exit status; the launches
    // themselves already succeeded.
    if let Some(dir) = &config.jobs_file_path {
        match records::write_manifest(dir, &config.job_name, &launched) {
            Ok(path) => println!("Wrote job manifest to {path}"),
            Err(err) => warn!(error = %err, "failed to write job manifest"),
        }
    }

    Ok(())
}
