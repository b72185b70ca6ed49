//! Error types for rando-sync.
//!
//! Only unrecoverable conditions are errors. A single export that fails is
//! recorded as a [`TaskFailure`](crate::TaskFailure) and the run goes on.

use std::path::PathBuf;

use thiserror::Error;

use rando_core::ConfigError;
use rando_tiles::TileError;

/// All errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The destination already holds entries this tool did not create.
    #[error("destination directory {path} contains extra data: {}", extra.join(", "))]
    DestinationNotEmpty { path: PathBuf, extra: Vec<String> },

    /// `--url` is not an absolute http(s) URL.
    #[error("url parameter should start with http:// or https:// (got `{0}`)")]
    InvalidUrl(String),

    /// The destination is the working tree or the parked previous bundle.
    #[error("destination {0} clashes with a directory used by the sync itself")]
    ReservedDestination(PathBuf),

    /// No languages to sync.
    #[error("no language to synchronize")]
    NoLanguage,

    /// Settings or catalog problem.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tile coverage could not be computed.
    #[error("tile error: {0}")]
    Tile(#[from] TileError),

    /// Zip container error while building or reading an archive.
    #[error("archive error at {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SyncError::Zip`].
pub(crate) fn zip_err(path: impl Into<PathBuf>, source: zip::result::ZipError) -> SyncError {
    SyncError::Zip {
        path: path.into(),
        source,
    }
}
