use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::VerifyReport;

/// Machine-readable verification report.
///
/// Carries enough provenance (tool version, manifest location and stamp
/// time) for a CI job to tell which manifest a failure was judged against.
#[derive(Serialize)]
struct JsonReport<'a> {
    tool: &'static str,
    version: &'static str,
    target: &'a str,
    manifest: ManifestInfo<'a>,
    verdict: &'a crate::verify::policy::PolicyVerdict,
    items: &'a [crate::verify::ItemReport],
}

#[derive(Serialize)]
struct ManifestInfo<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<DateTime<Utc>>,
}

/// Render a verify report as pretty-printed JSON.
pub fn render(report: &VerifyReport) -> Result<String> {
    let json = JsonReport {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        target: &report.target_name,
        manifest: ManifestInfo {
            path: &report.manifest_path,
            generated_at: report.generated_at,
        },
        verdict: &report.verdict,
        items: &report.items,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
