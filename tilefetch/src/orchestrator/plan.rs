//! Pre-flight download plan.

use crate::config::{ConfigError, DownloadConfig};
use crate::coord::{tile_range_for_bounds, BoundingBox, CoordError, TileRange};

/// Lower bound of the typical compressed size of one raster tile, in KB.
pub const ESTIMATE_MIN_KB_PER_TILE: u64 = 15;

/// Upper bound of the typical compressed size of one raster tile, in KB.
pub const ESTIMATE_MAX_KB_PER_TILE: u64 = 25;

/// Rough disk footprint of a plan, in whole megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    pub min_mb: u64,
    pub max_mb: u64,
}

/// Tile ranges for every configured zoom level, in download order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    ranges: Vec<TileRange>,
}

impl DownloadPlan {
    /// Computes the ranges covering `bounds` at each zoom level.
    ///
    /// Zoom levels are visited in ascending order, each at most once.
    pub fn new(bounds: &BoundingBox, zoom_levels: &[u8], buffer: u32) -> Result<Self, CoordError> {
        let mut zooms = zoom_levels.to_vec();
        zooms.sort_unstable();
        zooms.dedup();

        let ranges = zooms
            .iter()
            .map(|&zoom| tile_range_for_bounds(zoom, bounds, buffer))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { ranges })
    }

    /// Builds the plan described by a download configuration.
    pub fn from_config(config: &DownloadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config.bounds(),
            config.zoom_levels(),
            config.buffer(),
        )?)
    }

    pub fn ranges(&self) -> &[TileRange] {
        &self.ranges
    }

    /// Number of tiles per zoom level, in plan order.
    pub fn zoom_counts(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.ranges.iter().map(|r| (r.zoom, r.tile_count()))
    }

    pub fn total_tiles(&self) -> u64 {
        self.ranges.iter().map(TileRange::tile_count).sum()
    }

    /// Estimated size on disk, assuming 15-25 KB per tile.
    pub fn size_estimate(&self) -> SizeEstimate {
        let total = self.total_tiles();
        SizeEstimate {
            min_mb: total * ESTIMATE_MIN_KB_PER_TILE / 1024,
            max_mb: total * ESTIMATE_MAX_KB_PER_TILE / 1024,
        }
    }

}
