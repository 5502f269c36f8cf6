use std::path::Path;

use pmatch_core::export::{
    render_matches_export, suggested_export_file_name, ExportFormat as CoreExportFormat,
};
use pmatch_core::util::unix_millis_now;

use crate::cli::ExportFormat;
use crate::commands::common::{close_repository, list_all_matches, open_repository, Context};
use crate::error::CliError;

impl From<ExportFormat> for CoreExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

pub fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    ctx: &Context,
) -> Result<(), CliError> {
    let repo = open_repository(ctx)?;
    let matches = list_all_matches(&repo)?;
    close_repository(repo)?;

    let format = CoreExportFormat::from(format);
    let rendered = render_matches_export(&matches, format)?;

    if let Some(path) = output_path {
        // A directory target gets a timestamped file name
        let path = if path.is_dir() {
            path.join(suggested_export_file_name(format, unix_millis_now()))
        } else {
            path.to_path_buf()
        };
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
