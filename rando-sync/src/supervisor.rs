//! Sync supervisor: drives a whole run from destination check to swap.
//!
//! Stages are linear:
//!
//! ```text
//! Init → ValidateDestination → GlobalTiles → TrekTiles → Language(..)×N → Swap → Done
//! ```
//!
//! Any `Err` on the way moves to `Abort`, removes the temporary tree and
//! propagates; the destination root is only ever touched by the final swap.

use std::fmt;
use std::path::Path;

use rando_core::{Catalog, Language};
use rando_render::Renderable;
use rando_tiles::{BBox, TileSource};

use crate::archive::Archive;
use crate::differ::Differ;
use crate::error::{io_err, SyncError};
use crate::job::{sibling, SyncJob, DEPRECATED_DIR_NAME};
use crate::language::export_language;
use crate::progress::{NoProgress, ProgressReporter};
use crate::report::{FailureReason, SyncReport};
use crate::snapshot::Snapshotter;
use crate::tiles::TileArchiver;

/// Top-level entries a destination root may already contain.
pub const EXPECTED_ENTRIES: [&str; 4] = ["api", "media", "static", "zip"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Init,
    ValidateDestination,
    GlobalTiles,
    TrekTiles,
    Language(Language),
    Swap,
    Done,
    /// Terminal state after an unrecoverable error in any stage.
    Abort,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => f.write_str("init"),
            Stage::ValidateDestination => f.write_str("validate-destination"),
            Stage::GlobalTiles => f.write_str("global-tiles"),
            Stage::TrekTiles => f.write_str("trek-tiles"),
            Stage::Language(lang) => write!(f, "language:{lang}"),
            Stage::Swap => f.write_str("swap"),
            Stage::Done => f.write_str("done"),
            Stage::Abort => f.write_str("abort"),
        }
    }
}

/// Fail when `dst_root` holds anything but the bundle's own top-level entries.
///
/// A missing destination is fine; it is created by the swap.
pub fn check_destination(dst_root: &Path) -> Result<(), SyncError> {
    let entries = match std::fs::read_dir(dst_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(io_err(dst_root, e)),
    };
    let mut extra = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dst_root, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !EXPECTED_ENTRIES.contains(&name.as_str()) {
            extra.push(name);
        }
    }
    if extra.is_empty() {
        Ok(())
    } else {
        extra.sort();
        Err(SyncError::DestinationNotEmpty {
            path: dst_root.to_path_buf(),
            extra,
        })
    }
}

/// Replace `dst_root` with `tmp_root`.
///
/// The old tree is moved aside first and restored if the new one cannot be
/// moved in.
fn swap_roots(dst_root: &Path, tmp_root: &Path) -> Result<(), SyncError> {
    let deprecated = sibling(dst_root, DEPRECATED_DIR_NAME);
    if deprecated.exists() {
        std::fs::remove_dir_all(&deprecated).map_err(|e| io_err(&deprecated, e))?;
    }

    let had_previous = dst_root.exists();
    if had_previous {
        std::fs::rename(dst_root, &deprecated).map_err(|e| io_err(dst_root, e))?;
    }
    if let Err(e) = std::fs::rename(tmp_root, dst_root) {
        if had_previous {
            if let Err(restore) = std::fs::rename(&deprecated, dst_root) {
                tracing::error!(path = %deprecated.display(), "could not restore previous bundle: {restore}");
            }
        }
        return Err(io_err(tmp_root, e));
    }
    if had_previous {
        if let Err(e) = std::fs::remove_dir_all(&deprecated) {
            tracing::warn!(path = %deprecated.display(), "could not remove previous bundle: {e}");
        }
    }
    Ok(())
}

/// Runs one sync job against its collaborators.
pub struct Supervisor<'a> {
    job: &'a SyncJob,
    catalog: &'a Catalog,
    renderer: &'a dyn Renderable,
    tiles: &'a dyn TileSource,
    progress: &'a dyn ProgressReporter,
    stage: Stage,
}

impl<'a> Supervisor<'a> {
    pub fn new(
        job: &'a SyncJob,
        catalog: &'a Catalog,
        renderer: &'a dyn Renderable,
        tiles: &'a dyn TileSource,
    ) -> Self {
        Self {
            job,
            catalog,
            renderer,
            tiles,
            progress: &NoProgress,
            stage: Stage::Init,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Run every stage and swap the result into place.
    ///
    /// `Ok` means the bundle was published; check
    /// [`SyncReport::success`] for degraded exports.
    pub fn run(&mut self) -> Result<SyncReport, SyncError> {
        let job = self.job;
        self.enter(Stage::ValidateDestination);
        if let Err(err) = self.prepare() {
            return Err(self.abort(err));
        }

        match self.run_stages() {
            Ok(report) => {
                self.enter(Stage::Done);
                Ok(report)
            }
            Err(err) => {
                if job.tmp_root.exists() {
                    if let Err(e) = std::fs::remove_dir_all(&job.tmp_root) {
                        tracing::error!(path = %job.tmp_root.display(), "could not remove working tree: {e}");
                    }
                }
                Err(self.abort(err))
            }
        }
    }

    /// Check the destination and start from a fresh working tree.
    fn prepare(&self) -> Result<(), SyncError> {
        let job = self.job;
        check_destination(&job.dst_root)?;

        if job.tmp_root.exists() {
            tracing::warn!(path = %job.tmp_root.display(), "removing leftover working tree");
            std::fs::remove_dir_all(&job.tmp_root).map_err(|e| io_err(&job.tmp_root, e))?;
        }
        std::fs::create_dir_all(&job.tmp_root).map_err(|e| io_err(&job.tmp_root, e))
    }

    fn abort(&mut self, err: SyncError) -> SyncError {
        tracing::error!(stage = %self.stage, "sync aborted: {err}");
        self.enter(Stage::Abort);
        err
    }

    fn run_stages(&mut self) -> Result<SyncReport, SyncError> {
        let job = self.job;
        let mut snap = Snapshotter::new(
            self.renderer,
            &job.tmp_root,
            &job.host,
            Differ::new(&job.dst_root),
        );

        if let Some(extent) = job.global_extent {
            self.sync_tiles(&mut snap, &extent)?;
        }

        let step = (50 / job.languages.len()) as u8;
        let mut current = 30;
        for lang in &job.languages {
            current += step;
            self.progress.report(current, &format!("Language : {lang} ..."));
            self.enter(Stage::Language(lang.clone()));
            let summary = export_language(job, self.catalog, &mut snap, lang)?;
            tracing::info!(%lang, treks = summary.treks, "language exported");
        }
        self.progress.report(100, "Sync ended");

        self.enter(Stage::Swap);
        swap_roots(&job.dst_root, &job.tmp_root)?;
        Ok(snap.into_report())
    }

    fn sync_tiles(&mut self, snap: &mut Snapshotter<'_>, extent: &BBox) -> Result<(), SyncError> {
        let job = self.job;
        let tiles = &job.settings.tiles;

        self.progress.report(10, "Global tiles syncing ...");
        self.enter(Stage::GlobalTiles);
        let mut global = TileArchiver::new(Archive::create(&job.tmp_root, "zip/tiles/global.zip")?);
        global.add_coverage(extent, &tiles.global_zooms)?;
        global.run(self.tiles, snap)?;

        self.progress.report(20, "Trek tiles syncing ...");
        self.enter(Stage::TrekTiles);
        for trek in self.catalog.tile_treks(&job.languages, job.sources()) {
            let rel = format!("zip/tiles/{}.zip", trek.id);
            let mut archiver = TileArchiver::new(Archive::create(&job.tmp_root, &rel)?);
            for &[lng, lat] in &trek.geometry {
                let boxes = BBox::around(lng, lat, tiles.radius_large).and_then(|large| {
                    BBox::around(lng, lat, tiles.radius_small).map(|small| (large, small))
                });
                match boxes {
                    Ok((large, small)) => {
                        archiver.add_coverage(&large, &tiles.low_zooms)?;
                        archiver.add_coverage(&small, &tiles.high_zooms)?;
                    }
                    Err(err) => snap.record_failure(None, rel.clone(), FailureReason::Tile(err.to_string())),
                }
            }
            archiver.run(self.tiles, snap)?;
        }
        self.progress.report(30, "Tiles synced ...");
        Ok(())
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(from = %self.stage, to = %stage, "stage");
        self.stage = stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_destination_is_accepted() {
        let dir = TempDir::new().unwrap();
        check_destination(&dir.path().join("out")).unwrap();
    }

    #[test]
    fn expected_entries_are_accepted() {
        let dir = TempDir::new().unwrap();
        for name in EXPECTED_ENTRIES {
            std::fs::create_dir_all(dir.path().join(name)).unwrap();
        }
        check_destination(dir.path()).unwrap();
    }

    #[test]
    fn foreign_entries_are_listed() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("api")).unwrap();
        std::fs::create_dir_all(dir.path().join("foo")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        match check_destination(dir.path()).unwrap_err() {
            SyncError::DestinationNotEmpty { extra, .. } => assert_eq!(extra, vec!["foo", "notes.txt"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn swap_replaces_previous_bundle() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("out");
        let tmp = dir.path().join("tmp_sync_rando");
        std::fs::create_dir_all(dst.join("api")).unwrap();
        std::fs::write(dst.join("api/old.json"), "old").unwrap();
        std::fs::create_dir_all(tmp.join("api")).unwrap();
        std::fs::write(tmp.join("api/new.json"), "new").unwrap();

        swap_roots(&dst, &tmp).unwrap();

        assert!(dst.join("api/new.json").is_file());
        assert!(!dst.join("api/old.json").exists());
        assert!(!tmp.exists());
        assert!(!dir.path().join(DEPRECATED_DIR_NAME).exists());
    }

    #[test]
    fn stages_display_for_logs() {
        assert_eq!(Stage::Language(Language::from("fr")).to_string(), "language:fr");
        assert_eq!(Stage::ValidateDestination.to_string(), "validate-destination");
        assert_eq!(Stage::Abort.to_string(), "abort");
    }
}
