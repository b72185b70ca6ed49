//! YAML settings of the web application being mirrored.
//!
//! # Example
//!
//! ```yaml
//! languages: [en, fr]
//! catalog: var/catalog.json
//! static_root: var/static
//! media_root: var/media
//! touristic_contents_as_poi: false
//! tiles:
//!   url: "http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
//!   spatial_extent: [5.7, 44.6, 6.6, 45.2]
//!   cache_dir: var/tiles
//! ```
//!
//! Every key is optional. Relative paths are resolved against the directory
//! holding the settings file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::Language;

/// Run-independent settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Languages synced when `--languages` is not given.
    pub languages: Vec<Language>,
    /// Path to the catalog JSON exported by the web application.
    pub catalog: PathBuf,
    pub static_root: PathBuf,
    pub static_url: String,
    pub media_root: PathBuf,
    pub media_url: String,
    /// Static assets copied once per language, relative to `static_root`.
    pub static_files: Vec<String>,
    /// Fold touristic contents into each trek's POI collection in archives.
    pub touristic_contents_as_poi: bool,
    /// Timeout for a single render call against the live application.
    pub request_timeout_secs: u64,
    pub tiles: TileSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            languages: vec![Language::from("en")],
            catalog: PathBuf::from("catalog.json"),
            static_root: PathBuf::from("static"),
            static_url: "/static/".to_string(),
            media_root: PathBuf::from("media"),
            media_url: "/media/".to_string(),
            static_files: vec!["trekking/trek.svg".to_string()],
            touristic_contents_as_poi: false,
            request_timeout_secs: 60,
            tiles: TileSettings::default(),
        }
    }
}

/// Map tile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSettings {
    /// Tile URL template with `{z}`, `{x}`, `{y}` and optional `{s}` placeholders.
    pub url: String,
    pub subdomains: Vec<String>,
    /// On-disk tile cache shared between runs.
    pub cache_dir: Option<PathBuf>,
    /// `[min_lng, min_lat, max_lng, max_lat]` covered by the global tile archive.
    pub spatial_extent: Option<[f64; 4]>,
    pub global_zooms: Vec<u8>,
    pub low_zooms: Vec<u8>,
    pub high_zooms: Vec<u8>,
    /// Half-width in degrees of the box tiled at `low_zooms` around each vertex.
    pub radius_large: f64,
    /// Half-width in degrees of the box tiled at `high_zooms` around each vertex.
    pub radius_small: f64,
    pub timeout_secs: u64,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            url: "http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".into(), "b".into(), "c".into()],
            cache_dir: None,
            spatial_extent: None,
            global_zooms: (0..=12).collect(),
            low_zooms: vec![13, 14],
            high_zooms: vec![15, 16],
            radius_large: 0.01,
            radius_small: 0.005,
            timeout_secs: 30,
        }
    }
}

impl TileSettings {
    /// The global extent, required once tiles are synced.
    pub fn spatial_extent(&self) -> Result<[f64; 4], ConfigError> {
        let extent = self.spatial_extent.ok_or(ConfigError::Invalid {
            key: "tiles.spatial_extent",
            reason: "required unless tiles are skipped".to_string(),
        })?;
        let [min_x, min_y, max_x, max_y] = extent;
        if !(min_x < max_x && min_y < max_y) {
            return Err(ConfigError::Invalid {
                key: "tiles.spatial_extent",
                reason: format!("{extent:?} is not a [min_lng, min_lat, max_lng, max_lat] box"),
            });
        }
        Ok(extent)
    }
}

impl Settings {
    /// Load settings from `path`, resolving relative paths against its directory.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let mut settings: Settings =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Settings {
                path: path.to_path_buf(),
                source: e,
            })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        settings.resolve_paths(base);
        settings.validate()?;
        Ok(settings)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.catalog);
        resolve(&mut self.static_root);
        resolve(&mut self.media_root);
        if let Some(cache) = self.tiles.cache_dir.as_mut() {
            resolve(cache);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::Invalid {
                key: "languages",
                reason: "at least one language is required".to_string(),
            });
        }
        if self.tiles.radius_large <= 0.0 || self.tiles.radius_small <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "tiles.radius_large/radius_small",
                reason: "radii must be positive".to_string(),
            });
        }
        if let Some(z) = self
            .tiles
            .global_zooms
            .iter()
            .chain(&self.tiles.low_zooms)
            .chain(&self.tiles.high_zooms)
            .find(|z| **z > 22)
        {
            return Err(ConfigError::Invalid {
                key: "tiles.*_zooms",
                reason: format!("zoom level {z} is out of range (0..=22)"),
            });
        }
        Ok(())
    }

    /// `static_url` without surrounding slashes, used as the output prefix.
    pub fn static_prefix(&self) -> &str {
        self.static_url.trim_matches('/')
    }

    /// `media_url` without surrounding slashes, used as the output prefix.
    pub fn media_prefix(&self) -> &str {
        self.media_url.trim_matches('/')
    }
}
