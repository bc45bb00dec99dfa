//! Generic slippy-map tile server provider.
//!
//! Works with any server that follows the `{z}/{x}/{y}` convention
//! (OpenStreetMap, most self-hosted tile caches, many commercial basemaps).
//!
//! # Coordinate System
//!
//! Uses standard Web Mercator XYZ tile coordinates:
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level
//!
//! # Usage Policy
//!
//! Public servers restrict bulk downloading. The OpenStreetMap tile usage
//! policy requires an identifying `User-Agent` and modest request rates:
//! <https://operations.osmfoundation.org/policies/tiles/>

use super::template::UrlTemplate;
use super::{HttpClient, Provider, ProviderError};
use crate::coord::TileCoord;

/// Tile provider backed by a URL template.
///
/// # Example
///
/// ```ignore
/// use tilefetch::provider::{ReqwestClient, TileServerProvider, UrlTemplate};
///
/// let client = ReqwestClient::new("MyApp/1.0")?;
/// let template = UrlTemplate::parse("https://tile.openstreetmap.org/{z}/{x}/{y}.png")?;
/// let provider = TileServerProvider::new(client, template);
/// ```
pub struct TileServerProvider<C: HttpClient> {
    http_client: C,
    template: UrlTemplate,
}

impl<C: HttpClient> TileServerProvider<C> {
    /// Creates a new provider.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `template` - URL template with `{z}`, `{x}`, `{y}` placeholders
    pub fn new(http_client: C, template: UrlTemplate) -> Self {
        Self {
            http_client,
            template,
        }
    }

    pub fn http_client(&self) -> &C {
        &self.http_client
    }
}

impl<C: HttpClient> Provider for TileServerProvider<C> {
    fn download_tile(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError> {
        let url = self.template.url_for(tile);
        self.http_client.get(&url)
    }

    fn name(&self) -> &str {
        self.template.host()
    }

    fn extension(&self) -> &str {
        self.template.extension()
    }
}
