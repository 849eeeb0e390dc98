//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::output::EmbedMode;

/// Config file looked up in the working directory when nothing else is given.
const DEFAULT_CONFIG_FILE: &str = "readme-collage.toml";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How the image is referenced from the README.
    pub embed: EmbedMode,
    /// Where and how the image is fetched.
    pub source: SourceConfig,
    /// Collage query parameters.
    pub collage: CollageConfig,
    /// Input and output paths.
    pub paths: PathsConfig,
}

/// HTTP settings for the fetch.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Full URL override; when unset the URL is built from `[collage]`.
    pub url: Option<String>,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Overall fetch deadline in seconds.
    pub deadline_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            deadline_secs: 30,
        }
    }
}

impl SourceConfig {
    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Overall deadline.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// songstitch.art collage parameters.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CollageConfig {
    /// Last.fm user name.
    pub username: String,
    /// `album`, `artist` or `track`.
    pub method: String,
    /// Last.fm period, e.g. `7day`, `1month`, `overall`.
    pub period: String,
    /// Overlay artist names.
    pub artist: bool,
    /// Overlay album names.
    pub album: bool,
    /// Overlay play counts.
    pub playcount: bool,
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub columns: u32,
    /// Overlay font size.
    pub fontsize: u32,
    /// Overlay position, e.g. `bottomcentre`.
    pub textlocation: String,
    /// Ask the service for WebP instead of PNG/JPEG.
    pub webp: bool,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            username: "grumpylama".to_string(),
            method: "album".to_string(),
            period: "7day".to_string(),
            artist: false,
            album: false,
            playcount: false,
            rows: 1,
            columns: 5,
            fontsize: 15,
            textlocation: "bottomcentre".to_string(),
            webp: false,
        }
    }
}

/// Files read and written by a run.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// README template.
    pub template: PathBuf,
    /// Generated document.
    pub output: PathBuf,
    /// Directory for the saved image in file mode.
    pub image_dir: String,
    /// Saved image file name, without extension.
    pub image_name: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("tpl/README.md.tmpl"),
            output: PathBuf::from("README.md"),
            image_dir: "assets/img".to_string(),
            image_name: "lastfm-top-albums".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// `LASTFM_USERNAME` overrides the collage user name either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
            toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?
        } else {
            Self::default()
        };

        if let Some(username) = std::env::var("LASTFM_USERNAME").ok().filter(|u| !u.is_empty()) {
            config.collage.username = username;
        }
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        let source = &self.source;
        if source.request_timeout_secs == 0 || source.deadline_secs == 0 {
            return Err("request_timeout_secs and deadline_secs must be non-zero".to_string());
        }
        if source.request_timeout_secs >= source.deadline_secs {
            return Err(format!(
                "request_timeout_secs ({}) must be shorter than deadline_secs ({})",
                source.request_timeout_secs, source.deadline_secs
            ));
        }
        if self.collage.rows == 0 || self.collage.columns == 0 {
            return Err("collage rows and columns must be non-zero".to_string());
        }
        if self.paths.image_name.is_empty() {
            return Err("image_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `COLLAGE_CONFIG` environment variable
/// 3. `./readme-collage.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("COLLAGE_CONFIG") {
        return PathBuf::from(p);
    }

    PathBuf::from(DEFAULT_CONFIG_FILE)
}
