//! Arguments and helpers shared across CLI commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use tilefetch::config::{parse_zoom_levels, DownloadConfig};
use tilefetch::coord::BoundingBox;
use tilefetch::orchestrator::DownloadPlan;
use tilefetch::provider::UrlTemplate;

use crate::error::CliError;

/// Area and download overrides. Unset flags keep the config file values.
#[derive(Debug, Clone, Default, Args)]
pub struct AreaArgs {
    /// Northern edge of the area in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub north: Option<f64>,

    /// Southern edge of the area in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub south: Option<f64>,

    /// Eastern edge of the area in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub east: Option<f64>,

    /// Western edge of the area in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub west: Option<f64>,

    /// Zoom levels, e.g. "14-18" or "12,14,16"
    #[arg(long, short = 'z')]
    pub zooms: Option<String>,

    /// Output directory for the tile tree
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Tile URL template with {z}, {x} and {y} placeholders
    #[arg(long)]
    pub url: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Pause after each downloaded tile, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Extra tiles added around the area on every side
    #[arg(long)]
    pub buffer: Option<u32>,
}

/// Resolve download settings: CLI flags take precedence over `base`.
pub fn resolve_download_config(
    args: &AreaArgs,
    base: &DownloadConfig,
) -> Result<DownloadConfig, CliError> {
    let current = *base.bounds();
    let bounds = BoundingBox {
        north: args.north.unwrap_or(current.north),
        south: args.south.unwrap_or(current.south),
        east: args.east.unwrap_or(current.east),
        west: args.west.unwrap_or(current.west),
    };

    let mut config = base.clone().with_bounds(bounds);

    if let Some(zooms) = &args.zooms {
        config = config.with_zoom_levels(parse_zoom_levels(zooms)?);
    }
    if let Some(output) = &args.output {
        config = config.with_output_dir(output);
    }
    if let Some(url) = &args.url {
        let template = UrlTemplate::parse(url)
            .map_err(|e| CliError::Config(format!("--url: {}", e)))?;
        config = config.with_url_template(template);
    }
    if let Some(user_agent) = &args.user_agent {
        config = config.with_user_agent(user_agent.as_str());
    }
    if let Some(ms) = args.delay_ms {
        config = config.with_delay(Duration::from_millis(ms));
    }
    if let Some(secs) = args.timeout {
        if secs == 0 {
            return Err(CliError::Config("--timeout must be at least 1 second".to_string()));
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(buffer) = args.buffer {
        config = config.with_buffer(buffer);
    }

    config.validate()?;
    Ok(config)
}

/// Print the pre-flight summary of a download.
pub fn print_plan(config: &DownloadConfig, plan: &DownloadPlan) {
    let bounds = config.bounds();

    println!("{}", "=".repeat(60));
    println!("{}", style("tilefetch - Tile Downloader").bold());
    println!("{}", "=".repeat(60));
    println!();
    println!("Bounding Box:");
    println!("  North: {}", bounds.north);
    println!("  South: {}", bounds.south);
    println!("  East:  {}", bounds.east);
    println!("  West:  {}", bounds.west);
    println!();
    println!("Tile server: {}", style(config.url_template()).cyan());
    println!("Output:      {}", config.output_dir().display());
    println!();

    let estimate = plan.size_estimate();
    println!("Tiles to download:");
    for (zoom, count) in plan.zoom_counts() {
        println!("  Zoom {}: {} tiles", zoom, count);
    }
    println!("  TOTAL: {} tiles", style(plan.total_tiles()).bold());
    println!(
        "  Estimated size: {} - {} MB",
        estimate.min_mb, estimate.max_mb
    );
    println!();
}
