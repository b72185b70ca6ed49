//! Tile archiver: accumulate coverages, fetch once, zip, seal.

use rando_tiles::{BBox, TileSet, TileSource};

use crate::archive::Archive;
use crate::differ::ArchiveOutcome;
use crate::error::SyncError;
use crate::report::FailureReason;
use crate::snapshot::Snapshotter;

/// Builds one tile archive (`zip/tiles/global.zip` or `zip/tiles/<id>.zip`).
///
/// Coverages are unioned into a [`TileSet`] before any download starts, so a
/// tile shared by several coverages is fetched exactly once.
pub struct TileArchiver {
    archive: Archive,
    tiles: TileSet,
}

impl TileArchiver {
    pub fn new(archive: Archive) -> Self {
        Self {
            archive,
            tiles: TileSet::new(),
        }
    }

    /// Add every tile intersecting `bbox` at each of `zooms`.
    pub fn add_coverage(&mut self, bbox: &BBox, zooms: &[u8]) -> Result<usize, SyncError> {
        Ok(self.tiles.add_coverage(bbox, zooms)?)
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Fetch every accumulated tile and seal the archive.
    ///
    /// A tile that cannot be fetched is recorded as degraded and left out.
    pub fn run(mut self, source: &dyn TileSource, snap: &mut Snapshotter<'_>) -> Result<ArchiveOutcome, SyncError> {
        let ext = source.format().extension();
        let mut fetched = 0;
        for tile in &self.tiles {
            match source.fetch(*tile) {
                Ok(bytes) => {
                    let name = format!("{}/{}/{}.{ext}", tile.z, tile.x, tile.y);
                    self.archive.insert(&name, &bytes)?;
                    fetched += 1;
                }
                Err(err) => snap.record_failure(None, tile.to_string(), FailureReason::Tile(err.to_string())),
            }
        }
        tracing::info!(
            archive = %self.archive.rel_path().display(),
            requested = self.tiles.len(),
            fetched,
            "tiles fetched"
        );
        snap.count_tiles(fetched);
        snap.seal(self.archive)
    }
}
