//! On-disk tile layout.
//!
//! Tiles are stored using the slippy-map convention understood by web map
//! viewers such as Leaflet and OpenLayers:
//!
//! ```text
//! <root>/<zoom>/<x>/<y>.<ext>
//! ```

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Extension appended to tiles that are still being written.
pub const PARTIAL_EXTENSION: &str = "part";

/// Path of a tile file below `root`.
pub fn tile_path(root: &Path, tile: &crate::coord::TileCoord, extension: &str) -> PathBuf {
    root.join(tile.zoom.to_string())
        .join(tile.x.to_string())
        .join(format!("{}.{}", tile.y, extension))
}

/// Path used while a tile body is being written, before it is renamed into
/// place.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_EXTENSION);
    path.with_file_name(name)
}

/// File count and total size of a directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageSummary {
    pub files: u64,
    pub bytes: u64,
}

/// Walks `root` recursively and sums the sizes of all regular files.
///
/// Leftover partial writes are not counted. A missing root counts as empty.
pub fn summarize(root: &Path) -> io::Result<StorageSummary> {
    let mut summary = StorageSummary::default();

    if !root.exists() {
        return Ok(summary);
    }

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() || is_partial(entry.path()) {
            continue;
        }
        let metadata = entry.metadata().map_err(io::Error::other)?;
        summary.files += 1;
        summary.bytes += metadata.len();
    }

    Ok(summary)
}

fn is_partial(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PARTIAL_EXTENSION)
}

/// Formats a byte count as megabytes with two decimals, e.g. `"12.34 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoord;
    use std::fs;

    #[test]
    fn test_tile_path_layout() {
        let path = tile_path(Path::new("tiles"), &TileCoord::new(16, 18592, 25018), "png");
        assert_eq!(path, PathBuf::from("tiles/16/18592/25018.png"));
    }

    #[test]
    fn test_partial_path_is_sibling() {
        let path = PathBuf::from("tiles/16/18592/25018.png");
        assert_eq!(
            partial_path(&path),
            PathBuf::from("tiles/16/18592/25018.png.part")
        );
    }

    #[test]
    fn test_summarize_counts_nested_files() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("14/4648")).unwrap();
        fs::create_dir_all(root.join("15/9296")).unwrap();
        fs::write(root.join("14/4648/6254.png"), vec![0u8; 100]).unwrap();
        fs::write(root.join("14/4648/6255.png"), vec![0u8; 50]).unwrap();
        fs::write(root.join("15/9296/12509.png"), vec![0u8; 7]).unwrap();

        let summary = summarize(root).unwrap();

        assert_eq!(summary.files, 3);
        assert_eq!(summary.bytes, 157);
    }

    #[test]
    fn test_summarize_skips_partial_writes() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("16/18592")).unwrap();
        fs::write(root.join("16/18592/25018.png"), vec![0u8; 40]).unwrap();
        fs::write(root.join("16/18592/25019.png.part"), vec![0u8; 12]).unwrap();

        let summary = summarize(root).unwrap();

        assert_eq!(summary, StorageSummary { files: 1, bytes: 40 });
    }

    #[test]
    fn test_summarize_missing_root_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let summary = summarize(&temp.path().join("does-not-exist")).unwrap();
        assert_eq!(summary, StorageSummary::default());
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_megabytes(1536 * 1024), "1.50 MB");
    }
}
