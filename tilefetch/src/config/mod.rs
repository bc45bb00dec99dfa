//! Configuration for tilefetch.
//!
//! [`DownloadConfig`] carries every setting of a run. [`ConfigFile`] loads
//! it, together with logging settings, from `~/.tilefetch/config.ini`.
//! Command-line flags are applied on top by the CLI.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tilefetch::config::{parse_zoom_levels, DownloadConfig};
//!
//! let config = DownloadConfig::default()
//!     .with_zoom_levels(parse_zoom_levels("12-14").unwrap())
//!     .with_delay(Duration::from_millis(250));
//!
//! assert_eq!(config.zoom_levels(), &[12, 13, 14]);
//! ```

mod defaults;
mod download;
mod file;

pub use defaults::*;
pub use download::{format_zoom_levels, parse_zoom_levels, ConfigError, DownloadConfig};
pub use file::{
    config_directory, config_file_path, expand_tilde, ConfigFile, ConfigFileError,
    LoggingSettings,
};
