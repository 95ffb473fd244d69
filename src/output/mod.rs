pub mod console;
pub mod json;
pub mod sarif;

use crate::error::Result;
use crate::VerifyReport;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
    Sarif,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            "sarif" => Some(Self::Sarif),
            _ => None,
        }
    }
}

/// Render a verify report in the requested format.
pub fn render(report: &VerifyReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(&report.items, &report.verdict)),
        OutputFormat::Json => json::render(report),
        OutputFormat::Sarif => sarif::render(&report.items, &report.target_name),
    }
}
