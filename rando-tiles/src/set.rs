//! [`TileSet`]: tile coordinates accumulated from several coverages.

use std::collections::BTreeSet;

use crate::coords::{tiles_in_bbox, BBox, Tile};
use crate::error::TileError;

/// A deduplicated, ordered set of tiles.
///
/// Overlapping coverages (neighbouring vertex buffers of one trek, say)
/// contribute each tile once, so every tile is fetched once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileSet {
    tiles: BTreeSet<Tile>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every tile intersecting `bbox` at each of `zooms`.
    ///
    /// Returns how many tiles were new to the set.
    pub fn add_coverage(&mut self, bbox: &BBox, zooms: &[u8]) -> Result<usize, TileError> {
        let before = self.tiles.len();
        for zoom in zooms {
            self.tiles.extend(tiles_in_bbox(bbox, *zoom)?);
        }
        Ok(self.tiles.len() - before)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        self.tiles.contains(tile)
    }

    /// Tiles in `(z, x, y)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

impl Extend<Tile> for TileSet {
    fn extend<I: IntoIterator<Item = Tile>>(&mut self, iter: I) {
        self.tiles.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a Tile;
    type IntoIter = std::collections::btree_set::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
