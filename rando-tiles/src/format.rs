//! Tile image format guessed from the tile source URL.
//!
//! Handles plain templates such as `http://osm.org/{z}/{x}/{y}.png` as well
//! as WMTS-style URLs carrying `...&FORMAT=image/jpeg&...`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl TileFormat {
    /// Parse a MIME type (`image/jpeg`) or a bare extension (`jpg`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        let s = s.strip_prefix("image/").unwrap_or(&s);
        match s {
            "png" => Some(TileFormat::Png),
            "jpeg" | "jpg" => Some(TileFormat::Jpeg),
            "webp" => Some(TileFormat::Webp),
            _ => None,
        }
    }

    /// Guess the format of tiles served by `url`.
    ///
    /// An explicit `FORMAT=` parameter wins; otherwise the trailing path
    /// extension is used. Falls back to PNG.
    pub fn from_url(url: &str) -> Self {
        if let Some(format) = format_param(url).and_then(TileFormat::parse) {
            return format;
        }
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let last_segment = path.rsplit('/').next().unwrap_or(path);
        match last_segment.rsplit_once('.').and_then(|(_, ext)| TileFormat::parse(ext)) {
            Some(format) => format,
            None => {
                tracing::warn!(%url, "cannot guess tile format from URL, assuming png");
                TileFormat::Png
            }
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            TileFormat::Png => "image/png",
            TileFormat::Jpeg => "image/jpeg",
            TileFormat::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
            TileFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Value of a `FORMAT=` parameter made of letters and slashes.
fn format_param(url: &str) -> Option<&str> {
    let start = url.find("FORMAT=")? + "FORMAT=".len();
    let rest = &url[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '/'))
        .unwrap_or(rest.len());
    let value = &rest[..end];
    (!value.is_empty()).then_some(value)
}
