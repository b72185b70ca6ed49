//! Tile addressing in the spherical-mercator slippy-map scheme.
//!
//! A tile is included in a coverage when it intersects the bounding box:
//! the inclusive range of tile indices spanned by the box's north-west and
//! south-east corners, clamped to the valid range at that zoom.

use std::f64::consts::PI;
use std::fmt;

use crate::error::TileError;

pub const MAX_ZOOM: u8 = 22;

/// Latitude limit of the web-mercator projection.
const MAX_LAT: f64 = 85.051_128_779_806_59;

/// A tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl Tile {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A WGS84 bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Result<Self, TileError> {
        let raw = [min_lng, min_lat, max_lng, max_lat];
        if raw.iter().any(|v| !v.is_finite()) || min_lng > max_lng || min_lat > max_lat {
            return Err(TileError::InvalidBbox(raw));
        }
        Ok(Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// The square box of half-width `radius` degrees centred on a point.
    pub fn around(lng: f64, lat: f64, radius: f64) -> Result<Self, TileError> {
        Self::new(lng - radius, lat - radius, lng + radius, lat + radius)
    }
}

impl TryFrom<[f64; 4]> for BBox {
    type Error = TileError;

    fn try_from(v: [f64; 4]) -> Result<Self, Self::Error> {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}

fn lng_to_x(lng: f64, n: f64) -> f64 {
    (lng.clamp(-180.0, 180.0) + 180.0) / 360.0 * n
}

fn lat_to_y(lat: f64, n: f64) -> f64 {
    let rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    (1.0 - (rad.tan() + 1.0 / rad.cos()).ln() / PI) / 2.0 * n
}

fn tile_index(v: f64, n: u32) -> u32 {
    (v.floor() as i64).clamp(0, i64::from(n) - 1) as u32
}

/// Every tile at `zoom` intersecting `bbox`, in column-major order.
pub fn tiles_in_bbox(bbox: &BBox, zoom: u8) -> Result<impl Iterator<Item = Tile>, TileError> {
    if zoom > MAX_ZOOM {
        return Err(TileError::InvalidZoom(zoom));
    }
    let n = 1u32 << zoom;
    let nf = f64::from(n);
    let x0 = tile_index(lng_to_x(bbox.min_lng, nf), n);
    let x1 = tile_index(lng_to_x(bbox.max_lng, nf), n);
    // North is the smaller row index.
    let y0 = tile_index(lat_to_y(bbox.max_lat, nf), n);
    let y1 = tile_index(lat_to_y(bbox.min_lat, nf), n);

    Ok((x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| Tile::new(zoom, x, y))))
}
