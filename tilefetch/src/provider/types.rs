//! Provider types and traits

use thiserror::Error;

use crate::coord::TileCoord;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Server answered with something other than 200 OK
    #[error("HTTP {0}")]
    HttpStatus(u16),
    /// Request never produced a usable response (DNS, connect, timeout, body read)
    #[error("{0}")]
    Transport(String),
    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
    /// Tile URL template is unusable
    #[error("Invalid tile URL template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// Trait for map tile sources.
///
/// Implementors turn a tile coordinate into the raw image bytes served for
/// it. The bytes are never decoded or re-encoded.
pub trait Provider: Send + Sync {
    /// Downloads the image for a single tile.
    ///
    /// # Returns
    ///
    /// Raw image data exactly as served, or an error.
    fn download_tile(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError>;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;

    /// File extension used for tiles from this provider (without the dot).
    fn extension(&self) -> &str;
}
