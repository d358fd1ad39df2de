// src/reporting/mod.rs
//! Report emission: the machine-readable JSON results file and the
//! standalone HTML report. Consumes the run records; the diff engine does
//! not depend on anything here.

pub mod html;

pub use html::HtmlReport;

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::models::RunReport;

/// Filename-safe timestamp: RFC 3339 with `:` and `.` replaced by `-`.
pub fn report_timestamp() -> String {
    Utc::now().to_rfc3339().replace([':', '.'], "-")
}

/// Writes the full run record as pretty-printed JSON.
pub fn write_json_results<P: AsRef<Path>>(report: &RunReport, path: P) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize results to JSON")?;

    let mut file = File::create(path.as_ref()).context("Failed to create results file")?;
    file.write_all(json.as_bytes())
        .context("Failed to write results file")?;

    Ok(())
}
