//! Progress events emitted while a download runs.

use crate::coord::{TileCoord, TileRange};

/// Receives progress events from [`super::TileDownloader`].
///
/// Events arrive in enumeration order (zoom, x, y ascending). All methods
/// default to doing nothing.
pub trait DownloadObserver {
    /// A zoom level is about to be processed.
    fn zoom_started(&self, _range: &TileRange) {}

    /// Every tile in a zoom level has been processed.
    fn zoom_finished(&self, _range: &TileRange) {}

    /// A tile could not be fetched. The run continues with the next tile.
    fn tile_failed(&self, _tile: &TileCoord, _reason: &str) {}

    /// Periodic progress within the current zoom level.
    fn progress(&self, _zoom: u8, _done: u64, _total: u64) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DownloadObserver for NoopObserver {}

/// Percentage of `done` out of `total`, 0 for an empty total.
pub fn percent(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    done as f64 / total as f64 * 100.0
}
