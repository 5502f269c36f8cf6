//! Potential match export helpers.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::PotentialMatch;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Render matches as pretty-printed JSON.
pub fn render_json_export(matches: &[PotentialMatch]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(matches)
}

/// Render matches as a Markdown table.
#[must_use]
pub fn render_markdown_export(matches: &[PotentialMatch]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "| id | enquiry | child | created_at | revision | confirmed |");
    let _ = writeln!(output, "|---|---|---|---|---|---|");
    for record in matches {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} |",
            escape_cell(&record.id),
            escape_cell(&record.enquiry_id),
            escape_cell(&record.child_id),
            escape_cell(&record.created_at),
            escape_cell(&record.revision),
            if record.confirmed { "yes" } else { "no" }
        );
    }

    output
}

/// Render matches based on selected export format.
pub fn render_matches_export(
    matches: &[PotentialMatch],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(matches),
        ExportFormat::Markdown => Ok(render_markdown_export(matches)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("pmatch-export-{timestamp_ms}.{}", format.extension())
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
