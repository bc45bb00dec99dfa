//! Default values for all configuration settings.

use crate::coord::BoundingBox;

/// Default area: the Calcagnini retreat trail network, Virginia.
pub const DEFAULT_NORTH: f64 = 39.119012;
pub const DEFAULT_SOUTH: f64 = 39.097729;
pub const DEFAULT_EAST: f64 = -77.841725;
pub const DEFAULT_WEST: f64 = -77.868256;

pub const DEFAULT_ZOOM_LEVELS: [u8; 5] = [14, 15, 16, 17, 18];

pub const DEFAULT_OUTPUT_DIR: &str = "tiles";

pub const DEFAULT_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Pause after each freshly downloaded tile. Keeps request rates within
/// public tile server usage policies.
pub const DEFAULT_DELAY_MS: u64 = 150;

pub const DEFAULT_USER_AGENT: &str =
    concat!("tilefetch/", env!("CARGO_PKG_VERSION"), " (offline slippy-map tile downloader)");

pub const DEFAULT_TIMEOUT_SECS: u64 = crate::provider::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_BUFFER: u32 = crate::coord::DEFAULT_TILE_BUFFER;

/// Tiles processed within a zoom level between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 50;

pub const DEFAULT_LOG_FILE_NAME: &str = "tilefetch.log";

pub fn default_bounds() -> BoundingBox {
    BoundingBox::new(DEFAULT_NORTH, DEFAULT_SOUTH, DEFAULT_EAST, DEFAULT_WEST)
}
