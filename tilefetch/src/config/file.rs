//! Configuration file handling for ~/.tilefetch/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. Values
//! missing from the file keep their defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};
use thiserror::Error;

use super::defaults::DEFAULT_LOG_FILE_NAME;
use super::download::{format_zoom_levels, parse_zoom_levels, DownloadConfig};
use crate::coord::BoundingBox;
use crate::provider::UrlTemplate;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: config_directory().join(DEFAULT_LOG_FILE_NAME),
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub download: DownloadConfig,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.tilefetch/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.tilefetch/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }
}

/// Get the path to the config directory (~/.tilefetch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tilefetch")
}

/// Get the path to the config file (~/.tilefetch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Expands a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();
    let mut download = config.download.clone();

    // [area] section
    if let Some(section) = ini.section(Some("area")) {
        let current = *download.bounds();
        let bounds = BoundingBox {
            north: parse_value(section, "area", "north", "expected decimal degrees")?
                .unwrap_or(current.north),
            south: parse_value(section, "area", "south", "expected decimal degrees")?
                .unwrap_or(current.south),
            east: parse_value(section, "area", "east", "expected decimal degrees")?
                .unwrap_or(current.east),
            west: parse_value(section, "area", "west", "expected decimal degrees")?
                .unwrap_or(current.west),
        };
        download = download.with_bounds(bounds);
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = non_empty(section, "zoom_levels") {
            let levels = parse_zoom_levels(v).map_err(|e| invalid("download", "zoom_levels", v, e))?;
            download = download.with_zoom_levels(levels);
        }
        if let Some(v) = non_empty(section, "output_dir") {
            download = download.with_output_dir(expand_tilde(v));
        }
        if let Some(v) = non_empty(section, "url_template") {
            let template = UrlTemplate::parse(v).map_err(|e| invalid("download", "url_template", v, e))?;
            download = download.with_url_template(template);
        }
        if let Some(v) = non_empty(section, "user_agent") {
            download = download.with_user_agent(v);
        }
        if let Some(ms) = parse_value::<u64>(section, "download", "delay_ms", "must be a non-negative integer (milliseconds)")? {
            download = download.with_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = parse_value::<u64>(section, "download", "timeout", "must be a positive integer (seconds)")? {
            if secs == 0 {
                return Err(invalid("download", "timeout", "0", "must be a positive integer (seconds)"));
            }
            download = download.with_timeout(Duration::from_secs(secs));
        }
        if let Some(buffer) = parse_value(section, "download", "buffer", "must be a non-negative integer (tiles)")? {
            download = download.with_buffer(buffer);
        }
        if let Some(interval) = parse_value::<u64>(section, "download", "progress_interval", "must be a positive integer (tiles)")? {
            if interval == 0 {
                return Err(invalid("download", "progress_interval", "0", "must be a positive integer (tiles)"));
            }
            download = download.with_progress_interval(interval);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    config.download = download;
    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match non_empty(section, key) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| invalid(section_name, key, v, reason)),
        None => Ok(None),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: impl ToString) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Convert a `ConfigFile` to a commented INI string for saving.
fn to_config_string(config: &ConfigFile) -> String {
    let download = &config.download;
    let bounds = download.bounds();

    format!(
        r#"[area]
; Bounding box to download, in decimal degrees.
; Latitudes must lie within +/-85.05112878 (the Web Mercator limit).
north = {}
south = {}
east = {}
west = {}

[download]
; Zoom levels to fetch. Lists and ranges are accepted: 14,15,16 or 14-18
zoom_levels = {}
; Tiles are written to <output_dir>/<zoom>/<x>/<y>.<ext>
output_dir = {}
; Tile server URL with {{z}}, {{x}} and {{y}} placeholders.
; Check the server's usage policy before bulk downloading.
url_template = {}
; Identifying User-Agent header sent with every request
user_agent = {}
; Pause after each downloaded tile, in milliseconds
delay_ms = {}
; Request timeout in seconds
timeout = {}
; Extra tiles added around the area on every side
buffer = {}
; Tiles between progress reports within a zoom level
progress_interval = {}

[logging]
; Log file path (cleared at the start of each run)
file = {}
"#,
        bounds.north,
        bounds.south,
        bounds.east,
        bounds.west,
        format_zoom_levels(download.zoom_levels()),
        download.output_dir().display(),
        download.url_template(),
        download.user_agent(),
        download.delay().as_millis(),
        download.timeout().as_secs(),
        download.buffer(),
        download.progress_interval(),
        config.logging.file.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load_str(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, content).unwrap();
        ConfigFile::load_from(&path)
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_overlay_values() {
        let config = load_str(
            "[area]\nnorth = 51.52\nsouth = 51.50\n\n[download]\nzoom_levels = 12-13\noutput_dir = /tmp/london\ndelay_ms = 0\nurl_template = https://tiles.example.com/{z}/{x}/{y}.jpg\n",
        )
        .unwrap();

        let download = &config.download;
        assert_eq!(download.bounds().north, 51.52);
        assert_eq!(download.bounds().south, 51.50);
        // Untouched keys keep their defaults
        assert_eq!(download.bounds().east, crate::config::DEFAULT_EAST);
        assert_eq!(download.zoom_levels(), &[12, 13]);
        assert_eq!(download.output_dir(), Path::new("/tmp/london"));
        assert_eq!(download.delay(), Duration::ZERO);
        assert_eq!(download.url_template().extension(), "jpg");
    }

    #[test]
    fn test_invalid_number_reported_with_key() {
        let err = load_str("[area]\nnorth = up\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("area.north"), "{}", message);
        assert!(message.contains("'up'"), "{}", message);
    }

    #[test]
    fn test_invalid_template_rejected() {
        let err = load_str("[download]\nurl_template = https://example.com/{z}.png\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "url_template"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(load_str("[download]\ntimeout = 0\n").is_err());
    }

    #[test]
    fn test_save_then_load_preserves_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.ini");

        let mut config = ConfigFile::default();
        config.download = config
            .download
            .with_bounds(BoundingBox::new(48.9, 48.8, 2.4, 2.3))
            .with_zoom_levels(vec![10, 12, 13, 14])
            .with_delay(Duration::from_millis(500))
            .with_buffer(2);
        config.logging.file = PathBuf::from("/tmp/tilefetch.log");

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("tiles"), PathBuf::from("tiles"));
        assert_eq!(expand_tilde("/abs/tiles"), PathBuf::from("/abs/tiles"));
    }
}
