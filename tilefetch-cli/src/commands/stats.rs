//! Stats command - summarize an existing tile directory.

use std::path::PathBuf;

use console::style;
use tilefetch::storage::{format_megabytes, summarize};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the stats command for `output`, or the configured output directory.
pub fn run(output: Option<PathBuf>, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("stats");

    let root = output.unwrap_or_else(|| runner.config().download.output_dir().to_path_buf());
    let summary = summarize(&root).map_err(|error| CliError::Storage {
        path: root.clone(),
        error,
    })?;

    info!(path = %root.display(), files = summary.files, bytes = summary.bytes, "Storage summary");

    println!("Tile directory: {}", style(root.display()).cyan());
    println!("  Files: {}", summary.files);
    println!("  Total size: {}", format_megabytes(summary.bytes));

    Ok(())
}
