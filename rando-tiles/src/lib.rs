//! # rando-tiles
//!
//! Slippy-map tiling for offline map bundles.
//!
//! - [`coords`]: tile addressing and bounding-box enumeration
//! - [`set`]: [`TileSet`], the deduplicated union of several coverages
//! - [`format`]: tile image format guessed from the source URL
//! - [`source`]: where tile bytes come from ([`HttpTileSource`], with disk cache)

pub mod coords;
pub mod error;
pub mod format;
pub mod set;
pub mod source;

pub use coords::{tiles_in_bbox, BBox, Tile, MAX_ZOOM};
pub use error::TileError;
pub use format::TileFormat;
pub use set::TileSet;
pub use source::{HttpTileSource, TileSource};
