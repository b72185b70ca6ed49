//! Tile sources: where tile bytes come from.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coords::Tile;
use crate::error::{io_err, TileError};
use crate::format::TileFormat;

/// Upper bound on a single tile body; anything larger is not a map tile.
const MAX_TILE_BYTES: u64 = 16 * 1024 * 1024;

/// Something that can deliver the raw image bytes of one tile.
pub trait TileSource {
    fn fetch(&self, tile: Tile) -> Result<Vec<u8>, TileError>;

    /// Image format of the delivered bytes.
    fn format(&self) -> TileFormat {
        TileFormat::Png
    }
}

impl<T: TileSource + ?Sized> TileSource for &T {
    fn fetch(&self, tile: Tile) -> Result<Vec<u8>, TileError> {
        (**self).fetch(tile)
    }

    fn format(&self) -> TileFormat {
        (**self).format()
    }
}

/// Downloads tiles from a URL template, optionally through an on-disk cache.
///
/// The template understands `{z}`, `{x}`, `{y}` and `{s}`; the subdomain is
/// picked from `x + y` so a given tile always hits the same host.
pub struct HttpTileSource {
    agent: ureq::Agent,
    url_template: String,
    subdomains: Vec<String>,
    referer: Option<String>,
    cache_dir: Option<PathBuf>,
    format: TileFormat,
}

impl HttpTileSource {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Self {
        let url_template = url_template.into();
        let format = TileFormat::from_url(&url_template);
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url_template,
            subdomains: Vec::new(),
            referer: None,
            cache_dir: None,
            format,
        }
    }

    pub fn with_subdomains(mut self, subdomains: Vec<String>) -> Self {
        self.subdomains = subdomains;
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn tile_url(&self, tile: Tile) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let i = (tile.x as usize + tile.y as usize) % self.subdomains.len();
            self.subdomains[i].as_str()
        };
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    fn cache_path(&self, tile: Tile) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| {
            dir.join(tile.z.to_string())
                .join(tile.x.to_string())
                .join(format!("{}.{}", tile.y, self.format.extension()))
        })
    }

    fn download(&self, tile: Tile) -> Result<Vec<u8>, TileError> {
        let url = self.tile_url(tile);
        let mut request = self.agent.get(&url);
        if let Some(referer) = &self.referer {
            request = request.set("Referer", referer);
        }
        let response = request.call().map_err(|e| TileError::Download {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        read_body(response.into_reader(), MAX_TILE_BYTES, url)
    }
}

impl TileSource for HttpTileSource {
    fn fetch(&self, tile: Tile) -> Result<Vec<u8>, TileError> {
        let cached = self.cache_path(tile);
        if let Some(path) = &cached {
            if let Ok(bytes) = std::fs::read(path) {
                tracing::trace!(%tile, "tile cache hit");
                return Ok(bytes);
            }
        }

        let bytes = self.download(tile)?;

        if let Some(path) = &cached {
            if let Err(err) = write_cache(path, &bytes) {
                tracing::warn!(%tile, error = %err, "failed to cache tile");
            }
        }
        Ok(bytes)
    }

    fn format(&self) -> TileFormat {
        self.format
    }
}

/// Write a cached tile via `.tmp` + rename so readers never see a partial file.
fn write_cache(path: &Path, bytes: &[u8]) -> Result<(), TileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Read a whole tile body, refusing empty ones and anything above `limit`.
fn read_body(reader: impl Read, limit: u64, url: String) -> Result<Vec<u8>, TileError> {
    let mut bytes = Vec::new();
    if let Err(e) = reader.take(limit + 1).read_to_end(&mut bytes) {
        return Err(TileError::Download {
            url,
            reason: e.to_string(),
        });
    }
    let reason = if bytes.is_empty() {
        "empty response body".to_string()
    } else if bytes.len() as u64 > limit {
        format!("response body exceeds {limit} bytes")
    } else {
        return Ok(bytes);
    };
    Err(TileError::Download { url, reason })
}
