//! Single-tile fetcher with an on-disk existence cache.
//!
//! A tile that already exists below the output root is never requested
//! again, which makes interrupted runs resumable. New tiles are written to a
//! `.part` sibling first and renamed into place once the whole body is on
//! disk.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::coord::TileCoord;
use crate::provider::Provider;
use crate::storage::{partial_path, tile_path};

/// Result of fetching one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The tile file was already present; nothing was requested.
    Cached,
    /// The tile was downloaded and written to disk.
    Downloaded { bytes: u64 },
    /// The tile could not be fetched or stored; no file was written.
    Failed { reason: String },
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Cached => write!(f, "exists"),
            FetchOutcome::Downloaded { bytes } => write!(f, "downloaded ({} bytes)", bytes),
            FetchOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Downloads tiles from a provider into a slippy-map directory tree.
pub struct TileFetcher<P: Provider> {
    provider: P,
    root: PathBuf,
}

impl<P: Provider> TileFetcher<P> {
    /// Creates a fetcher writing below `root`.
    pub fn new(provider: P, root: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Destination path of a tile.
    pub fn path_for(&self, tile: &TileCoord) -> PathBuf {
        tile_path(&self.root, tile, self.provider.extension())
    }

    /// Fetches one tile.
    ///
    /// Never returns an error: network, HTTP and local I/O problems are all
    /// reported as [`FetchOutcome::Failed`].
    pub fn fetch(&self, tile: &TileCoord) -> FetchOutcome {
        let path = self.path_for(tile);

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(%tile, path = %parent.display(), error = %e, "Failed to create tile directory");
                return FetchOutcome::Failed {
                    reason: format!("Failed to create {}: {}", parent.display(), e),
                };
            }
        }

        if path.exists() {
            debug!(%tile, "Tile already cached");
            return FetchOutcome::Cached;
        }

        let data = match self.provider.download_tile(tile) {
            Ok(data) => data,
            Err(e) => {
                debug!(%tile, error = %e, "Tile download failed");
                return FetchOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match write_tile(&path, &data) {
            Ok(()) => {
                debug!(%tile, bytes = data.len(), "Tile downloaded");
                FetchOutcome::Downloaded {
                    bytes: data.len() as u64,
                }
            }
            Err(e) => {
                warn!(%tile, path = %path.display(), error = %e, "Failed to write tile");
                FetchOutcome::Failed {
                    reason: format!("Failed to write {}: {}", path.display(), e),
                }
            }
        }
    }
}

/// Writes `data` to a `.part` sibling and renames it over `path`.
fn write_tile(path: &Path, data: &[u8]) -> io::Result<()> {
    let partial = partial_path(path);

    if let Err(e) = fs::write(&partial, data).and_then(|_| fs::rename(&partial, path)) {
        fs::remove_file(&partial).ok();
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockHttpClient, ProviderError, TileServerProvider, UrlTemplate};

    const TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

    fn fetcher(
        root: &Path,
        response: Result<Vec<u8>, ProviderError>,
    ) -> TileFetcher<TileServerProvider<MockHttpClient>> {
        let provider = TileServerProvider::new(
            MockHttpClient::new(response),
            UrlTemplate::parse(TEMPLATE).unwrap(),
        );
        TileFetcher::new(provider, root)
    }

    fn calls(fetcher: &TileFetcher<TileServerProvider<MockHttpClient>>) -> usize {
        fetcher.provider().http_client().call_count()
    }

    #[test]
    fn test_download_writes_exact_body() {
        let temp = tempfile::TempDir::new().unwrap();
        let body = vec![7u8; 1234];
        let fetcher = fetcher(temp.path(), Ok(body.clone()));
        let tile = TileCoord::new(16, 18592, 25018);

        let outcome = fetcher.fetch(&tile);

        assert_eq!(outcome, FetchOutcome::Downloaded { bytes: 1234 });
        let path = temp.path().join("16/18592/25018.png");
        assert_eq!(fs::read(&path).unwrap(), body);
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_existing_tile_is_not_requested() {
        let temp = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher(temp.path(), Ok(vec![1, 2, 3]));
        let tile = TileCoord::new(14, 4648, 6254);

        assert_eq!(
            fetcher.fetch(&tile),
            FetchOutcome::Downloaded { bytes: 3 }
        );
        assert_eq!(fetcher.fetch(&tile), FetchOutcome::Cached);
        assert_eq!(fetcher.fetch(&tile), FetchOutcome::Cached);

        assert_eq!(calls(&fetcher), 1);
    }

    #[test]
    fn test_existing_tile_not_overwritten() {
        let temp = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher(temp.path(), Ok(vec![9; 10]));
        let tile = TileCoord::new(14, 1, 2);
        let path = fetcher.path_for(&tile);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"original").unwrap();

        assert_eq!(fetcher.fetch(&tile), FetchOutcome::Cached);
        assert_eq!(fs::read(&path).unwrap(), b"original");
        assert_eq!(calls(&fetcher), 0);
    }

    #[test]
    fn test_http_status_failure_writes_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher(temp.path(), Err(ProviderError::HttpStatus(404)));
        let tile = TileCoord::new(18, 74370, 100074);

        let outcome = fetcher.fetch(&tile);

        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                reason: "HTTP 404".to_string()
            }
        );
        let path = fetcher.path_for(&tile);
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_transport_failure_reports_message() {
        let temp = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher(
            temp.path(),
            Err(ProviderError::Transport("operation timed out".to_string())),
        );

        let outcome = fetcher.fetch(&TileCoord::new(16, 100, 200));

        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
        assert_eq!(outcome.to_string(), "failed: operation timed out");
    }

    #[test]
    fn test_failed_tile_is_retried_on_next_fetch() {
        let temp = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher(temp.path(), Err(ProviderError::HttpStatus(500)));
        let tile = TileCoord::new(10, 1, 1);

        fetcher.fetch(&tile);
        fetcher.fetch(&tile);

        assert_eq!(calls(&fetcher), 2);
    }

    #[test]
    fn test_unwritable_root_fails_without_request() {
        let temp = tempfile::TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let fetcher = fetcher(&blocker, Ok(vec![1]));

        let outcome = fetcher.fetch(&TileCoord::new(3, 1, 1));

        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
        assert_eq!(calls(&fetcher), 0);
    }
}
