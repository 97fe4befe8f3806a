//! Value types shared by the grid, the caches, and the map UI.
//!
//! Covers geographic points ([`LatLng`]), cell rectangles ([`CellBounds`]),
//! grid coordinates ([`CellKey`], [`Cell`]), and tokens ([`Coin`]).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::CoinId;

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A geographic point in degrees.
///
/// Latitude and longitude are not range-checked. Supplying valid
/// coordinates is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LatLng {
    /// Latitude in degrees, nominally `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, nominally `[-180, 180]`.
    pub lng: f64,
}

impl LatLng {
    /// Create a point from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned rectangle covered by one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellBounds {
    /// Minimum latitude / minimum longitude corner.
    pub south_west: LatLng,
    /// Maximum latitude / maximum longitude corner.
    pub north_east: LatLng,
}

impl CellBounds {
    /// Extent along the latitude axis, in degrees.
    pub fn height(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    /// Extent along the longitude axis, in degrees.
    pub fn width(&self) -> f64 {
        self.north_east.lng - self.south_west.lng
    }

    /// Whether `point` lies inside the half-open rectangle
    /// `[south_west, north_east)`.
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat < self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng < self.north_east.lng
    }

    /// Center of the rectangle.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            self.south_west.lat + self.height() / 2.0,
            self.south_west.lng + self.width() / 2.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// The canonical key of a grid cell.
///
/// This is the only key used for cells anywhere in the workspace: the board's
/// canonical map, the cache registry, and randomness seeds all go through it.
/// Its string form is `"i,j"` with no whitespace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct CellKey {
    /// Quantized latitude index.
    pub i: i64,
    /// Quantized longitude index.
    pub j: i64,
}

impl CellKey {
    /// Create a key from grid indices.
    pub const fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    /// The key displaced by `(di, dj)`, saturating at the `i64` limits.
    pub const fn offset(self, di: i64, dj: i64) -> Self {
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
        }
    }
}

impl core::fmt::Display for CellKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

/// A discrete grid cell.
///
/// Cells are immutable. Code that needs identity semantics must obtain
/// cells from the board, which hands out one shared instance per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cell {
    key: CellKey,
}

impl Cell {
    /// Create a cell value for `key`.
    pub const fn new(key: CellKey) -> Self {
        Self { key }
    }

    /// The canonical key of this cell.
    pub const fn key(&self) -> CellKey {
        self.key
    }

    /// Quantized latitude index.
    pub const fn i(&self) -> i64 {
        self.key.i
    }

    /// Quantized longitude index.
    pub const fn j(&self) -> i64 {
        self.key.j
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.key.i, self.key.j)
    }
}

// ---------------------------------------------------------------------------
// Coins
// ---------------------------------------------------------------------------

/// An immutable, uniquely identified token.
///
/// Coins are minted when a cache is first spawned and afterwards only move
/// between caches and the player inventory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coin {
    id: CoinId,
}

impl Coin {
    /// Mint a coin with the given serial at `origin`.
    pub const fn new(origin: CellKey, serial: u32) -> Self {
        Self {
            id: CoinId::new(origin, serial),
        }
    }

    /// The coin's unique identifier.
    pub const fn id(&self) -> CoinId {
        self.id
    }

    /// The cell the coin was minted in.
    pub const fn origin(&self) -> CellKey {
        self.id.origin
    }

    /// The coin's serial within its origin cache.
    pub const fn serial(&self) -> u32 {
        self.id.serial
    }

    /// Popup label, e.g. `[i: 369894, j: -3779] serial: 2`.
    pub fn label(&self) -> String {
        format!(
            "[i: {}, j: {}] serial: {}",
            self.id.origin.i, self.id.origin.j, self.id.serial
        )
    }
}

impl core::fmt::Display for Coin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.id)
    }
}
