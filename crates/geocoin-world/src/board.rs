//! The grid canonicalizer.
//!
//! The [`Board`] quantizes geographic points into integer cell coordinates
//! using a fixed tile width, and hands out exactly one shared [`Cell`]
//! instance per coordinate pair. Downstream code may therefore compare
//! cells by identity (`Rc::ptr_eq`) as well as by value.
//!
//! Quantization offsets both axes by the domain range so the usual
//! coordinates map to non-negative indices:
//!
//! ```text
//! i = floor((lat + 90)  / tile_width)
//! j = floor((lng + 180) / tile_width)
//! ```
//!
//! Out-of-range coordinates are not rejected; they simply produce indices
//! outside the usual range, possibly negative.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use geocoin_types::{Cell, CellBounds, CellKey, LatLng};

use crate::error::WorldError;

/// Latitude offset that moves the south pole to index 0.
const LAT_OFFSET: f64 = 90.0;

/// Longitude offset that moves the antimeridian to index 0.
const LNG_OFFSET: f64 = 180.0;

/// Quantizes points into canonical cells.
///
/// The canonical map grows monotonically: cells are never evicted for the
/// lifetime of the board.
#[derive(Debug, Clone)]
pub struct Board {
    /// Width and height of one tile, in degrees.
    tile_width: f64,
    /// Default neighborhood radius, in tiles.
    visibility_radius: u32,
    /// One shared instance per key.
    known_cells: BTreeMap<CellKey, Rc<Cell>>,
}

impl Board {
    /// Create a board with the given tile width (degrees) and default
    /// visibility radius (tiles).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidTileWidth`] if `tile_width` is zero,
    /// negative, or not finite.
    pub fn new(tile_width: f64, visibility_radius: u32) -> Result<Self, WorldError> {
        if !tile_width.is_finite() || tile_width <= 0.0 {
            return Err(WorldError::InvalidTileWidth { tile_width });
        }
        Ok(Self {
            tile_width,
            visibility_radius,
            known_cells: BTreeMap::new(),
        })
    }

    /// Tile width in degrees.
    pub const fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Default neighborhood radius in tiles.
    pub const fn visibility_radius(&self) -> u32 {
        self.visibility_radius
    }

    /// Number of distinct cells canonicalized so far.
    pub fn known_cell_count(&self) -> usize {
        self.known_cells.len()
    }

    /// Return the shared cell for `key`, creating it on first use.
    pub fn canonicalize(&mut self, key: CellKey) -> Rc<Cell> {
        Rc::clone(
            self.known_cells
                .entry(key)
                .or_insert_with(|| Rc::new(Cell::new(key))),
        )
    }

    /// Quantize `point` without touching the canonical map.
    pub fn key_for_point(&self, point: LatLng) -> CellKey {
        CellKey::new(
            quantize(point.lat, LAT_OFFSET, self.tile_width),
            quantize(point.lng, LNG_OFFSET, self.tile_width),
        )
    }

    /// Return the canonical cell containing `point`.
    pub fn cell_for_point(&mut self, point: LatLng) -> Rc<Cell> {
        let key = self.key_for_point(point);
        self.canonicalize(key)
    }

    /// Geographic rectangle covered by `cell`.
    ///
    /// Pure function of the cell's indices and the tile width.
    #[allow(clippy::cast_precision_loss)] // indices beyond 2^53 are far outside the globe
    pub fn bounds_for_cell(&self, cell: &Cell) -> CellBounds {
        let w = self.tile_width;
        let south = -LAT_OFFSET + cell.i() as f64 * w;
        let west = -LNG_OFFSET + cell.j() as f64 * w;
        CellBounds {
            south_west: LatLng::new(south, west),
            north_east: LatLng::new(south + w, west + w),
        }
    }

    /// All canonical cells within `radius` tiles of the cell containing
    /// `point`, in both axes.
    ///
    /// The result is in row-major order (`di` outer, `dj` inner, both
    /// ascending) and contains no duplicate keys. Away from the `i64`
    /// limits it has exactly `(2 * radius + 1)^2` entries; at the limits the
    /// saturating offsets collapse onto the edge cells and duplicates are
    /// dropped.
    pub fn neighborhood(&mut self, point: LatLng, radius: u32) -> Vec<Rc<Cell>> {
        let origin = self.key_for_point(point);
        let reach = i64::from(radius);

        let mut seen = BTreeSet::new();
        let mut cells = Vec::new();
        for di in reach.saturating_neg()..=reach {
            for dj in reach.saturating_neg()..=reach {
                let key = origin.offset(di, dj);
                if seen.insert(key) {
                    cells.push(self.canonicalize(key));
                }
            }
        }
        cells
    }

    /// [`neighborhood`](Self::neighborhood) at the board's visibility radius.
    pub fn cells_near_point(&mut self, point: LatLng) -> Vec<Rc<Cell>> {
        self.neighborhood(point, self.visibility_radius)
    }
}

/// `floor((value + offset) / width)`, saturating at the `i64` limits.
///
/// Float-to-int `as` casts saturate and map NaN to 0, which keeps
/// quantization total for every input.
#[allow(clippy::cast_possible_truncation)]
fn quantize(value: f64, offset: f64, width: f64) -> i64 {
    ((value + offset) / width).floor() as i64
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::indexing_slicing
)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const TILE: f64 = 1e-4;
    const CLASSROOM: LatLng = LatLng::new(36.989_493_795_784_01, -122.062_771_285_485_04);

    fn board() -> Board {
        Board::new(TILE, 8).unwrap()
    }

    #[test]
    fn rejects_bad_tile_widths() {
        for width in [0.0, -1e-4, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Board::new(width, 1),
                Err(WorldError::InvalidTileWidth { .. })
            ));
        }
    }

    #[test]
    fn new_board_keeps_parameters() {
        let board = Board::new(0.25, 3).unwrap();
        assert_eq!(board.tile_width(), 0.25);
        assert_eq!(board.visibility_radius(), 3);
        assert_eq!(board.known_cell_count(), 0);
    }

    #[test]
    fn classroom_quantizes_to_expected_cell() {
        let mut board = board();
        let cell = board.cell_for_point(CLASSROOM);
        assert_eq!(cell.key(), CellKey::new(1_269_894, 579_372));
    }

    #[test]
    fn canonicalize_returns_same_instance() {
        let mut board = board();
        let a = board.canonicalize(CellKey::new(3, -4));
        let b = board.canonicalize(CellKey::new(3, -4));
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(board.known_cell_count(), 1);
    }

    #[test]
    fn points_in_same_tile_share_cell_instance() {
        let mut board = board();
        let a = board.cell_for_point(CLASSROOM);
        let b = board.cell_for_point(LatLng::new(CLASSROOM.lat + 1e-6, CLASSROOM.lng + 1e-6));
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn random_points_in_one_tile_are_identical() {
        let mut board = board();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let lat = rng.random_range(-80.0..80.0);
            let lng = rng.random_range(-170.0..170.0);
            let first = board.cell_for_point(LatLng::new(lat, lng));
            let bounds = board.bounds_for_cell(&first);
            let inner = bounds.center();
            let second = board.cell_for_point(inner);
            assert!(Rc::ptr_eq(&first, &second), "{first} vs {second}");
        }
    }

    #[test]
    fn out_of_range_points_do_not_fail() {
        let mut board = board();
        let cell = board.cell_for_point(LatLng::new(-100.0, -200.0));
        assert!(cell.i() < 0);
        assert!(cell.j() < 0);

        let huge = board.cell_for_point(LatLng::new(f64::MAX, f64::MIN));
        assert_eq!(huge.key(), CellKey::new(i64::MAX, i64::MIN));

        let nan = board.cell_for_point(LatLng::new(f64::NAN, f64::NAN));
        assert_eq!(nan.key(), CellKey::new(0, 0));
    }

    #[test]
    fn bounds_have_expected_corners() {
        let board = Board::new(0.5, 0).unwrap();
        let bounds = board.bounds_for_cell(&Cell::new(CellKey::new(0, 0)));
        assert_eq!(bounds.south_west, LatLng::new(-90.0, -180.0));
        assert_eq!(bounds.north_east, LatLng::new(-89.5, -179.5));

        let bounds = board.bounds_for_cell(&Cell::new(CellKey::new(-2, 3)));
        assert_eq!(bounds.south_west, LatLng::new(-91.0, -178.5));
        assert_eq!(bounds.north_east, LatLng::new(-90.5, -178.0));
    }

    #[test]
    fn bounds_are_one_tile_square_and_contain_point() {
        let mut board = board();
        let cell = board.cell_for_point(CLASSROOM);
        let bounds = board.bounds_for_cell(&cell);
        assert!((bounds.height() - TILE).abs() < 1e-9);
        assert!((bounds.width() - TILE).abs() < 1e-9);
        assert!((bounds.south_west.lat - (-90.0 + 1_269_894.0 * TILE)).abs() < 1e-9);
        assert!((bounds.south_west.lng - (-180.0 + 579_372.0 * TILE)).abs() < 1e-9);
        assert!(bounds.contains(CLASSROOM));
    }

    #[test]
    fn bounds_do_not_grow_the_canonical_map() {
        let board = board();
        let _ = board.bounds_for_cell(&Cell::new(CellKey::new(1, 1)));
        assert_eq!(board.known_cell_count(), 0);
    }

    #[test]
    fn neighborhood_radius_one_is_three_by_three() {
        let mut board = board();
        let cells = board.neighborhood(CLASSROOM, 1);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0].key(), CellKey::new(1_269_893, 579_371));
        assert_eq!(cells[4].key(), CellKey::new(1_269_894, 579_372));
        assert_eq!(cells[8].key(), CellKey::new(1_269_895, 579_373));
    }

    #[test]
    fn neighborhood_radius_zero_is_origin_only() {
        let mut board = board();
        let cells = board.neighborhood(CLASSROOM, 0);
        assert_eq!(cells.len(), 1);
        let origin = board.cell_for_point(CLASSROOM);
        assert!(Rc::ptr_eq(&cells[0], &origin));
    }

    #[test]
    fn neighborhood_size_and_uniqueness_hold_for_random_points() {
        let mut board = Board::new(0.01, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let point = LatLng::new(rng.random_range(-90.0..90.0), rng.random_range(-180.0..180.0));
            let radius: u32 = rng.random_range(0..6);
            let cells = board.neighborhood(point, radius);
            let side = (2 * radius + 1) as usize;
            assert_eq!(cells.len(), side * side);
            let keys: BTreeSet<CellKey> = cells.iter().map(|c| c.key()).collect();
            assert_eq!(keys.len(), cells.len());
        }
    }

    #[test]
    fn neighborhood_is_deterministic_and_canonical() {
        let mut board = board();
        let first = board.neighborhood(CLASSROOM, 2);
        let second = board.neighborhood(CLASSROOM, 2);
        assert_eq!(first.len(), 25);
        for (a, b) in first.iter().zip(&second) {
            assert!(Rc::ptr_eq(a, b));
        }
        assert_eq!(board.known_cell_count(), 25);
    }

    #[test]
    fn neighborhood_at_index_limit_drops_duplicates() {
        let mut board = board();
        let cells = board.neighborhood(LatLng::new(f64::MAX, f64::MAX), 1);
        // Positive offsets saturate back onto the corner row and column.
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].key(), CellKey::new(i64::MAX - 1, i64::MAX - 1));
        assert_eq!(cells[3].key(), CellKey::new(i64::MAX, i64::MAX));
        let keys: BTreeSet<CellKey> = cells.iter().map(|c| c.key()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn cells_near_point_uses_visibility_radius() {
        let mut board = board();
        assert_eq!(board.cells_near_point(CLASSROOM).len(), 17 * 17);
    }
}
