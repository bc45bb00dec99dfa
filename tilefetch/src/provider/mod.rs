//! Map tile provider abstraction
//!
//! This module provides the HTTP client seam and the tile server provider
//! that turns tile coordinates into downloaded image bytes.
//!
//! ```ignore
//! use tilefetch::provider::{Provider, ReqwestClient, TileServerProvider, UrlTemplate};
//!
//! let http_client = ReqwestClient::new("MyApp/1.0")?;
//! let template: UrlTemplate = "https://tile.openstreetmap.org/{z}/{x}/{y}.png".parse()?;
//! let provider = TileServerProvider::new(http_client, template);
//! let bytes = provider.download_tile(&tile)?;
//! ```

mod http;
mod template;
mod tile_server;
mod types;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use template::{UrlTemplate, DEFAULT_EXTENSION};
pub use tile_server::TileServerProvider;
pub use types::{Provider, ProviderError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
