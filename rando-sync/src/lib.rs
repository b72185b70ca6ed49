//! # rando-sync
//!
//! Snapshot a live rando application into a self-contained offline bundle.
//!
//! A run renders every listing and per-trek export into a temporary tree,
//! packs them (and map tiles) into zip archives, and swaps the tree into the
//! destination in one rename. Archives whose entries did not change keep the
//! previous file's modification time so mirrors can skip them.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use rando_core::{Catalog, Settings};
//! use rando_render::HttpRenderer;
//! use rando_sync::{SyncJob, SyncOptions, Supervisor};
//! use rando_tiles::HttpTileSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load_at("rando.yaml".as_ref())?;
//! let catalog = Catalog::load_at(&settings.catalog)?;
//! let tiles = HttpTileSource::new(settings.tiles.url.clone(), Duration::from_secs(30));
//! let mut options = SyncOptions::new("/srv/rando", "http://localhost:8000");
//! options.skip_pdf = true;
//! let job = SyncJob::new(options, settings)?;
//! let renderer = HttpRenderer::new(&job.url, Duration::from_secs(60));
//! let report = Supervisor::new(&job, &catalog, &renderer, &tiles).run()?;
//! println!("{} files, success: {}", report.written, report.success());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod differ;
pub mod error;
pub mod job;
pub mod language;
pub mod progress;
pub mod report;
pub mod snapshot;
pub mod supervisor;
pub mod tiles;
pub mod trek;

pub use archive::Archive;
pub use differ::{entry_checksums, ArchiveOutcome, Differ};
pub use error::SyncError;
pub use job::{SyncJob, SyncOptions, DEPRECATED_DIR_NAME, TMP_DIR_NAME};
pub use language::{export_language, LanguageSummary};
pub use progress::{JsonLinesProgress, NoProgress, ProgressReporter};
pub use report::{ArchiveRecord, FailureReason, SyncReport, TaskFailure};
pub use snapshot::{ExportTask, Snapshotter, TaskOutcome};
pub use supervisor::{check_destination, Stage, Supervisor, EXPECTED_ENTRIES};
pub use tiles::TileArchiver;
pub use trek::export_trek;
