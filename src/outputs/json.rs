//! JSON output of a run report.
//!
//! # Output Structure
//!
//! One file per run, named after the date range:
//! ```text
//! json_output_dir/
//! ├── 2025-06-10_2025-06-10.json
//! └── 2025-06-01_2025-06-07.json
//! ```
//!
//! The body is the [`RunReport`] with camelCase keys (`items`, `log`,
//! `checkedSources`), so a rerun over the same range replaces the file.

use newsroom_sweep::models::RunReport;
use newsroom_sweep::utils::ensure_writable_dir;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// `{start}_{end}`, shared by every output format.
pub fn report_file_stem(report: &RunReport) -> String {
    format!("{}_{}", report.range.start, report.range.end)
}

/// Write a [`RunReport`] as pretty-printed JSON.
///
/// # Arguments
///
/// * `report` - The finished run
/// * `json_output_dir` - Directory for the file, created if missing
///
/// # Returns
///
/// The path written, or an error if the directory isn't writable or the
/// write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &RunReport,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Err(e) = ensure_writable_dir(json_output_dir).await {
        error!(error = %e, "JSON output directory is not writable");
        return Err(e);
    }

    let path = format!(
        "{}/{}.json",
        json_output_dir.trim_end_matches('/'),
        report_file_stem(report)
    );
    fs::write(&path, json).await?;
    info!(%path, items = report.items.len(), "Wrote JSON report");
    Ok(path)
}
