//! tilefetch - Offline slippy-map tile downloader
//!
//! This library downloads every map tile covering a geographic bounding box
//! across a set of zoom levels and stores them as `<zoom>/<x>/<y>.<ext>`,
//! the layout web map viewers read directly.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilefetch::config::DownloadConfig;
//! use tilefetch::orchestrator::{DownloadPlan, NoopObserver, TileDownloader};
//!
//! let config = DownloadConfig::default().with_output_dir("tiles");
//! let plan = DownloadPlan::from_config(&config)?;
//! println!("{} tiles to fetch", plan.total_tiles());
//!
//! let downloader = TileDownloader::from_config(&config)?;
//! let report = downloader.run_and_report(&plan, &NoopObserver)?;
//! ```

pub mod config;
pub mod coord;
pub mod fetch;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod storage;

/// Version of the tilefetch library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
