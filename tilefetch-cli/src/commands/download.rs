//! Download command - fetch every tile of the configured area.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use tilefetch::coord::{TileCoord, TileRange};
use tilefetch::orchestrator::{
    percent, DownloadObserver, DownloadPlan, DownloadReport, TileDownloader,
};
use tilefetch::storage::format_megabytes;
use tracing::{info, warn};

use super::common::{print_plan, resolve_download_config, AreaArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the download command.
pub struct DownloadArgs {
    pub area: AreaArgs,
    pub yes: bool,
}

/// Run the download command.
pub fn run(args: DownloadArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("download");

    let config = resolve_download_config(&args.area, &runner.config().download)?;
    let plan = DownloadPlan::from_config(&config)?;

    print_plan(&config, &plan);

    if !args.yes && !confirm()? {
        info!("Download declined at prompt");
        println!("Cancelled.");
        return Ok(());
    }

    let downloader = TileDownloader::from_config(&config)?;
    install_interrupt_handler(downloader.cancel_flag())?;

    println!();
    println!("Downloading tiles...");
    println!();

    let report = downloader.run_and_report(&plan, &ConsoleObserver)?;
    print_summary(&report);

    Ok(())
}

fn confirm() -> Result<bool, CliError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Proceed with download?")
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

/// Ctrl-C stops the run after the current tile.
fn install_interrupt_handler(cancel: Arc<AtomicBool>) -> Result<(), CliError> {
    ctrlc::set_handler(move || {
        if cancel.swap(true, Ordering::SeqCst) {
            return;
        }
        println!();
        println!("Interrupted, stopping after the current tile...");
        warn!("Interrupt received, cancelling download");
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))
}

/// Prints download progress to the console.
struct ConsoleObserver;

impl DownloadObserver for ConsoleObserver {
    fn zoom_started(&self, range: &TileRange) {
        println!("Zoom {} ({} tiles)...", range.zoom, range.tile_count());
    }

    fn zoom_finished(&self, _range: &TileRange) {
        println!("  Done.");
    }

    fn tile_failed(&self, tile: &TileCoord, reason: &str) {
        println!("  {} {} - {}", style("FAILED:").red(), tile, reason);
    }

    fn progress(&self, _zoom: u8, done: u64, total: u64) {
        println!(
            "  Progress: {}/{} ({:.0}%)",
            done,
            total,
            percent(done, total)
        );
    }
}

fn print_summary(report: &DownloadReport) {
    let stats = &report.stats;
    let heading = if report.cancelled {
        style("DOWNLOAD INTERRUPTED").yellow().bold()
    } else {
        style("DOWNLOAD COMPLETE").green().bold()
    };

    println!();
    println!("{}", "=".repeat(60));
    println!("{}", heading);
    println!("{}", "=".repeat(60));
    println!("Downloaded: {}", stats.downloaded);
    println!("Already existed: {}", stats.skipped);
    println!("Failed: {}", stats.failed);
    println!("Total size: {}", format_megabytes(report.storage.bytes));
    println!("Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!();
    println!(
        "Tiles saved to: {}/",
        style(absolute(&report.output_dir).display()).cyan()
    );
    if report.cancelled {
        println!();
        println!("Run the same command again to resume; existing tiles are skipped.");
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
