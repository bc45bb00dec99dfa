//! Tile URL templates.
//!
//! A template is a URL with `{z}`, `{x}` and `{y}` placeholders, e.g.
//! `https://tile.openstreetmap.org/{z}/{x}/{y}.png`.

use std::fmt;
use std::str::FromStr;

use super::types::ProviderError;
use crate::coord::TileCoord;

/// Extension assumed when the template's last path segment has none.
pub const DEFAULT_EXTENSION: &str = "png";

const PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// Parsed tile URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
    extension: String,
}

impl UrlTemplate {
    /// Parses a template, checking that every placeholder is present.
    pub fn parse(template: &str) -> Result<Self, ProviderError> {
        let template = template.trim();

        if !template.starts_with("http://") && !template.starts_with("https://") {
            return Err(ProviderError::InvalidTemplate {
                template: template.to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }

        if let Some(missing) = PLACEHOLDERS.iter().find(|p| !template.contains(*p)) {
            return Err(ProviderError::InvalidTemplate {
                template: template.to_string(),
                reason: format!("missing {} placeholder", missing),
            });
        }

        Ok(Self {
            extension: extension_of(template),
            template: template.to_string(),
        })
    }

    /// Builds the URL for a tile.
    pub fn url_for(&self, tile: &TileCoord) -> String {
        self.template
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// Image file extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Host portion of the URL, used as a human-readable provider name.
    pub fn host(&self) -> &str {
        let rest = self
            .template
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.template);
        rest.split('/').next().unwrap_or(rest)
    }
}

impl FromStr for UrlTemplate {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Extension of the last path segment, ignoring any query string.
fn extension_of(template: &str) -> String {
    let path = template.split(['?', '#']).next().unwrap_or(template);
    let last_segment = path.rsplit('/').next().unwrap_or(path);

    match last_segment.rsplit_once('.') {
        Some((_, ext))
            if !ext.is_empty() && !ext.contains('{') && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
