//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator tile coordinates, and computes the tile ranges that
//! cover a bounding box at a given zoom level.

mod types;

pub use types::{
    BoundingBox, CoordError, TileCoord, TileRange, TileRangeIter, MAX_LAT, MAX_LON, MAX_ZOOM,
    MIN_LAT, MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Number of extra tiles added around a bounding box on every side.
///
/// Map viewers request neighbouring tiles while panning, so the corner
/// tiles alone leave gaps at the viewport edges.
pub const DEFAULT_TILE_BUFFER: u32 = 1;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    // Validate inputs
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    // Calculate number of tiles at this zoom level
    let n = 2.0_f64.powi(zoom as i32);
    let last = grid_size(zoom) - 1;

    // Convert longitude to tile X coordinate
    let x = ((lon + 180.0) / 360.0 * n) as u32;

    // Convert latitude to tile Y coordinate using Web Mercator projection
    let lat_rad = lat * PI / 180.0;
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

    // lon = 180 and lat = MIN_LAT land exactly on the far edge of the grid
    Ok(TileCoord {
        zoom,
        x: x.min(last),
        y: y.min(last),
    })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    // Convert tile X coordinate to longitude
    let lon = tile.x as f64 / n * 360.0 - 180.0;

    // Convert tile Y coordinate to latitude using inverse Web Mercator
    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

/// Number of tiles along one axis at the given zoom level.
#[inline]
pub fn grid_size(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Computes the range of tiles covering a bounding box.
///
/// The north-west and south-east corners are converted to tiles, the
/// resulting indices are normalised with min/max per axis (latitude grows
/// northward while tile y grows southward), and the range is widened by
/// `buffer` tiles on every side. Widening stops at the edges of the world
/// grid.
pub fn tile_range_for_bounds(
    zoom: u8,
    bbox: &BoundingBox,
    buffer: u32,
) -> Result<TileRange, CoordError> {
    let nw = to_tile_coords(bbox.north, bbox.west, zoom)?;
    let se = to_tile_coords(bbox.south, bbox.east, zoom)?;
    let last = grid_size(zoom) - 1;

    let x_min = nw.x.min(se.x);
    let x_max = nw.x.max(se.x);
    let y_min = nw.y.min(se.y);
    let y_max = nw.y.max(se.y);

    Ok(TileRange {
        zoom,
        x_min: x_min.saturating_sub(buffer),
        x_max: x_max.saturating_add(buffer).min(last),
        y_min: y_min.saturating_sub(buffer),
        y_max: y_max.saturating_add(buffer).min(last),
    })
}
