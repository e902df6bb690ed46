//! The grid: who stands where, and how much water is on the floor.
//!
//! Both maps are sparse. A cell that is absent from `occupants` is empty and
//! a cell absent from `floor` is dry, so the grid is unbounded while only
//! touched cells cost memory. `BTreeMap` keeps iteration order (and thus the
//! whole simulation) deterministic.

use crate::bucket::BucketId;
use leaky_types::ast::Landmarks;
use leaky_types::Coord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Water volume in hundredths of a pint.
pub type Centipints = u64;

pub const CENTIPINTS_PER_PINT: Centipints = 100;

/// What stands on a cell. The floor water under it is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Occupant {
    #[default]
    Empty,
    Depot,
    Tap,
    Pond,
    Bucket(BucketId),
}

impl Occupant {
    pub fn is_empty(self) -> bool {
        self == Occupant::Empty
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Empty => f.write_str("empty floor"),
            Occupant::Depot => f.write_str("the bucket depot"),
            Occupant::Tap => f.write_str("the tap"),
            Occupant::Pond => f.write_str("the pond"),
            Occupant::Bucket(id) => write!(f, "bucket {id}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorldGrid {
    occupants: BTreeMap<Coord, Occupant>,
    /// Only cells with a nonzero amount are present.
    floor: BTreeMap<Coord, Centipints>,
}

impl WorldGrid {
    pub fn new(landmarks: &Landmarks) -> Self {
        let mut grid = Self::default();
        grid.set_occupant(landmarks.depot, Occupant::Depot);
        grid.set_occupant(landmarks.tap, Occupant::Tap);
        grid.set_occupant(landmarks.pond, Occupant::Pond);
        grid
    }

    pub fn occupant_at(&self, coord: Coord) -> Occupant {
        self.occupants.get(&coord).copied().unwrap_or_default()
    }

    pub(crate) fn set_occupant(&mut self, coord: Coord, occupant: Occupant) {
        if occupant.is_empty() {
            self.occupants.remove(&coord);
        } else {
            self.occupants.insert(coord, occupant);
        }
    }

    // ── Floor water ──────────────────────────────────────────────────────────

    pub fn floor_water(&self, coord: Coord) -> Centipints {
        self.floor.get(&coord).copied().unwrap_or(0)
    }

    pub fn set_floor_water(&mut self, coord: Coord, amount: Centipints) {
        if amount == 0 {
            self.floor.remove(&coord);
        } else {
            self.floor.insert(coord, amount);
        }
    }

    pub fn add_floor_water(&mut self, coord: Coord, delta: Centipints) {
        if delta > 0 {
            let total = self.floor_water(coord).saturating_add(delta);
            self.set_floor_water(coord, total);
        }
    }

    /// Subtract up to `delta`, clamping at zero. Returns the amount removed.
    pub fn remove_floor_water(&mut self, coord: Coord, delta: Centipints) -> Centipints {
        let current = self.floor_water(coord);
        let removed = current.min(delta);
        self.set_floor_water(coord, current - removed);
        removed
    }

    /// Wet cells in coordinate order.
    pub fn wet_cells(&self) -> impl Iterator<Item = (Coord, Centipints)> + '_ {
        self.floor.iter().map(|(&c, &w)| (c, w))
    }

    pub fn wet_cell_count(&self) -> usize {
        self.floor.len()
    }

    /// Every wet cell loses one centipint; cells that dry out leave the ledger.
    pub(crate) fn evaporate(&mut self) {
        self.floor.retain(|_, water| {
            *water -= 1;
            *water > 0
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaky_types::RelativeFacing;

    fn grid() -> WorldGrid {
        WorldGrid::new(&Landmarks::from_facings(
            RelativeFacing::Front,
            RelativeFacing::Right,
            RelativeFacing::Left,
        ))
    }

    #[test]
    fn test_landmarks_are_occupants() {
        let g = grid();
        assert_eq!(g.occupant_at(Coord::new(0, 1)), Occupant::Depot);
        assert_eq!(g.occupant_at(Coord::new(1, 0)), Occupant::Tap);
        assert_eq!(g.occupant_at(Coord::new(-1, 0)), Occupant::Pond);
        assert_eq!(g.occupant_at(Coord::new(0, -1)), Occupant::Empty);
        assert_eq!(g.occupant_at(Coord::new(1_000_000, -7)), Occupant::Empty);
    }

    #[test]
    fn test_clearing_occupant_removes_entry() {
        let mut g = grid();
        let c = Coord::new(5, 5);
        g.set_occupant(c, Occupant::Bucket(BucketId(0)));
        assert_eq!(g.occupant_at(c), Occupant::Bucket(BucketId(0)));
        g.set_occupant(c, Occupant::Empty);
        assert!(g.occupants.get(&c).is_none());
    }

    #[test]
    fn test_floor_water_is_sparse() {
        let mut g = grid();
        let c = Coord::new(2, 3);
        g.add_floor_water(c, 0);
        assert_eq!(g.wet_cell_count(), 0);
        g.add_floor_water(c, 150);
        assert_eq!(g.floor_water(c), 150);
        assert_eq!(g.remove_floor_water(c, 40), 40);
        assert_eq!(g.floor_water(c), 110);
        assert_eq!(g.remove_floor_water(c, 500), 110);
        assert_eq!(g.floor_water(c), 0);
        assert_eq!(g.wet_cell_count(), 0);
    }

    #[test]
    fn test_evaporation_floors_at_zero() {
        let mut g = grid();
        g.set_floor_water(Coord::new(0, 0), 1);
        g.set_floor_water(Coord::new(3, 0), 2);
        g.evaporate();
        assert_eq!(g.floor_water(Coord::new(0, 0)), 0);
        assert_eq!(g.floor_water(Coord::new(3, 0)), 1);
        assert_eq!(g.wet_cell_count(), 1);
        g.evaporate();
        g.evaporate();
        assert_eq!(g.wet_cell_count(), 0);
    }

    #[test]
    fn test_wet_cells_in_coordinate_order() {
        let mut g = grid();
        g.set_floor_water(Coord::new(1, 0), 5);
        g.set_floor_water(Coord::new(-1, 2), 7);
        let cells: Vec<_> = g.wet_cells().collect();
        assert_eq!(cells, vec![(Coord::new(-1, 2), 7), (Coord::new(1, 0), 5)]);
    }
}
