//! Orchestrator types and errors

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchOutcome;
use crate::provider::ProviderError;
use crate::storage::StorageSummary;

/// Errors that stop a download run before or after the tile loop.
///
/// Individual tile failures never surface here; they are counted in
/// [`DownloadStats`].
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Configuration could not produce a plan
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client construction failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Output directory could not be created or scanned
    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Running counters for a download run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Tiles fetched and written during this run
    pub downloaded: u64,
    /// Tiles already present on disk
    pub skipped: u64,
    /// Tiles that could not be fetched or written
    pub failed: u64,
    /// Bytes written during this run
    pub bytes_downloaded: u64,
    /// The run stopped before every tile was processed
    pub cancelled: bool,
}

impl DownloadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies a fetch outcome into the matching counter.
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Cached => self.skipped += 1,
            FetchOutcome::Downloaded { bytes } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            FetchOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Tiles processed so far, whatever their outcome.
    pub fn processed(&self) -> u64 {
        self.downloaded + self.skipped + self.failed
    }
}

/// Final result of a completed (or cancelled) run.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub stats: DownloadStats,
    /// Everything below the output directory after the run, including
    /// tiles from earlier runs
    pub storage: StorageSummary,
    pub output_dir: PathBuf,
    pub elapsed: Duration,
    /// Copied from [`DownloadStats::cancelled`]
    pub cancelled: bool,
}
