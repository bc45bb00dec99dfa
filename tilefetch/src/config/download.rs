//! Download run configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::defaults::*;
use crate::coord::{tile_range_for_bounds, BoundingBox, CoordError, MAX_ZOOM};
use crate::provider::{ProviderError, UrlTemplate};

/// Invalid download configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No zoom levels to download
    #[error("At least one zoom level is required")]
    NoZoomLevels,

    /// Bounding box or zoom level outside the Web Mercator grid
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Malformed tile URL template
    #[error(transparent)]
    Template(#[from] ProviderError),

    /// Progress interval of zero
    #[error("Progress interval must be at least 1 tile")]
    InvalidProgressInterval,

    /// Zoom list that cannot be parsed
    #[error("Invalid zoom levels '{input}': {reason}")]
    InvalidZoomLevels { input: String, reason: String },
}

/// Everything needed to plan and run a download.
///
/// Every tunable of a run lives here so the orchestrator can be driven with
/// synthetic areas and zoom sets in tests.
///
/// # Example
///
/// ```
/// use tilefetch::config::DownloadConfig;
/// use tilefetch::coord::BoundingBox;
///
/// let config = DownloadConfig::default()
///     .with_bounds(BoundingBox::new(51.52, 51.50, -0.10, -0.14))
///     .with_zoom_levels(vec![16, 15, 15])
///     .with_output_dir("london");
///
/// assert_eq!(config.zoom_levels(), &[15, 16]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadConfig {
    bounds: BoundingBox,
    zoom_levels: Vec<u8>,
    output_dir: PathBuf,
    url_template: UrlTemplate,
    delay: Duration,
    user_agent: String,
    timeout: Duration,
    buffer: u32,
    progress_interval: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
            zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            url_template: default_template(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            buffer: DEFAULT_BUFFER,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl DownloadConfig {
    /// Create a new download configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the zoom levels. They are sorted and de-duplicated so runs always
    /// proceed from the coarsest level to the finest.
    pub fn with_zoom_levels(mut self, mut zoom_levels: Vec<u8>) -> Self {
        zoom_levels.sort_unstable();
        zoom_levels.dedup();
        self.zoom_levels = zoom_levels;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_url_template(mut self, url_template: UrlTemplate) -> Self {
        self.url_template = url_template;
        self
    }

    /// Set the pause after each freshly downloaded tile.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout. Default: 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of extra tiles added around the area on every side.
    pub fn with_buffer(mut self, buffer: u32) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: u64) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn zoom_levels(&self) -> &[u8] {
        &self.zoom_levels
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn url_template(&self) -> &UrlTemplate {
        &self.url_template
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn buffer(&self) -> u32 {
        self.buffer
    }

    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }

    /// Checks that a plan can be computed from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zoom_levels.is_empty() {
            return Err(ConfigError::NoZoomLevels);
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::InvalidProgressInterval);
        }
        for &zoom in &self.zoom_levels {
            if zoom > MAX_ZOOM {
                return Err(CoordError::InvalidZoom(zoom).into());
            }
            tile_range_for_bounds(zoom, &self.bounds, self.buffer)?;
        }
        Ok(())
    }
}

fn default_template() -> UrlTemplate {
    match UrlTemplate::parse(DEFAULT_URL_TEMPLATE) {
        Ok(template) => template,
        Err(e) => unreachable!("built-in tile URL template is valid: {}", e),
    }
}

/// Parses a zoom level list such as `"14,15,16"`, `"14-18"` or `"10,14-16"`.
///
/// The result is sorted and free of duplicates.
pub fn parse_zoom_levels(input: &str) -> Result<Vec<u8>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidZoomLevels {
        input: input.to_string(),
        reason,
    };
    let parse_one = |s: &str| -> Result<u8, ConfigError> {
        let zoom: u8 = s
            .trim()
            .parse()
            .map_err(|_| invalid(format!("'{}' is not a zoom level", s.trim())))?;
        if zoom > MAX_ZOOM {
            return Err(invalid(format!("{} exceeds maximum zoom {}", zoom, MAX_ZOOM)));
        }
        Ok(zoom)
    };

    let mut levels = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse_one(start)?, parse_one(end)?);
                if start > end {
                    return Err(invalid(format!("range {}-{} is reversed", start, end)));
                }
                levels.extend(start..=end);
            }
            None => levels.push(parse_one(part)?),
        }
    }

    if levels.is_empty() {
        return Err(ConfigError::NoZoomLevels);
    }

    levels.sort_unstable();
    levels.dedup();
    Ok(levels)
}

/// Formats zoom levels back into the compact form accepted by
/// [`parse_zoom_levels`], e.g. `[10, 14, 15, 16]` → `"10,14-16"`.
pub fn format_zoom_levels(levels: &[u8]) -> String {
    let mut parts = Vec::new();
    let mut iter = levels.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while end < u8::MAX && iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if end == start {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }

    parts.join(",")
}
