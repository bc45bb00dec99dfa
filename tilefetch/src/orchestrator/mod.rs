//! Tile download orchestration
//!
//! Turns a configured area into a [`DownloadPlan`] and walks every tile of it
//! with a [`TileDownloader`], pacing requests and reporting progress to a
//! [`DownloadObserver`].

mod download;
mod observer;
mod plan;
mod types;

pub use download::{Pacer, ThreadSleepPacer, TileDownloader};
pub use observer::{percent, DownloadObserver, NoopObserver};
pub use plan::{DownloadPlan, SizeEstimate, ESTIMATE_MAX_KB_PER_TILE, ESTIMATE_MIN_KB_PER_TILE};
pub use types::{DownloadError, DownloadReport, DownloadStats};
