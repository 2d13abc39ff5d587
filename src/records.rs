//! Manifest of launched job runs for downstream aggregation tooling.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use gangway_utils::atomic_write::write_file_atomic;

/// One launched job run, as recorded in the manifest.
///
/// `JobRunID` is the build ID the status service reported; it may be empty
/// when the service supplied a URL without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRunRecord {
    #[serde(rename = "JobName")]
    pub job_name: String,
    #[serde(rename = "JobRunID")]
    pub job_run_id: String,
}

/// Serialize the records and write them to a uniquely named file inside
/// `dir`, creating the directory if absent. Returns the path written.
///
/// Callers treat failures here as warnings: a manifest that could not be
/// written does not undo launches that already succeeded.
pub fn write_manifest(
    dir: &Utf8Path,
    job_name: &str,
    records: &[JobRunRecord],
) -> Result<Utf8PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create jobs file directory: {dir}"))?;

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
    let path = dir.join(format!("gangway_{job_name}_{timestamp}.json"));

    let json =
        serde_json::to_string_pretty(records).context("Failed to serialize job run records")?;
    write_file_atomic(&path, &json).with_context(|| format!("Failed to write jobs file: {path}"))?;

    Ok(path)
}
