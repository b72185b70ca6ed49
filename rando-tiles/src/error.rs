//! Error types for rando-tiles.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TileError {
    /// A coverage box that is inverted, empty, or not finite.
    #[error("invalid bounding box {0:?}")]
    InvalidBbox([f64; 4]),

    #[error("zoom level {0} is out of range (0..=22)")]
    InvalidZoom(u8),

    /// The remote source failed to deliver a tile.
    #[error("failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    /// Tile cache I/O failure.
    #[error("tile cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TileError {
    TileError::Io {
        path: path.into(),
        source,
    }
}
