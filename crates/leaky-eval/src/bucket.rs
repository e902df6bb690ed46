//! Buckets and where they are.
//!
//! Buckets are never destroyed, so the store is an append-only arena and a
//! bucket's id is its index.

use crate::world::{Centipints, Occupant, WorldGrid, CENTIPINTS_PER_PINT};
use leaky_types::Coord;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BucketId(pub u32);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BucketLocation {
    HeldByAgent,
    PlacedAt(Coord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub id: BucketId,
    /// Whole pints.
    pub capacity: u64,
    pub holes: u64,
    pub contents: Centipints,
    pub location: BucketLocation,
}

impl Bucket {
    pub fn capacity_centipints(&self) -> Centipints {
        self.capacity.saturating_mul(CENTIPINTS_PER_PINT)
    }

    /// How much more fits before the bucket overflows.
    pub fn room(&self) -> Centipints {
        self.capacity_centipints().saturating_sub(self.contents)
    }

    /// Where the bucket is, given where the agent stands.
    pub fn position(&self, agent: Coord) -> Coord {
        match self.location {
            BucketLocation::HeldByAgent => agent,
            BucketLocation::PlacedAt(coord) => coord,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BucketStore {
    buckets: Vec<Bucket>,
}

impl BucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bucket in the agent's hands.
    pub(crate) fn collect(&mut self, capacity: u64, holes: u64) -> BucketId {
        let id = BucketId(self.buckets.len() as u32);
        self.buckets.push(Bucket {
            id,
            capacity,
            holes,
            contents: 0,
            location: BucketLocation::HeldByAgent,
        });
        id
    }

    pub fn get(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: BucketId) -> Option<&mut Bucket> {
        self.buckets.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Put a held bucket down on `coord`, updating the grid in the same step.
    pub(crate) fn place(&mut self, id: BucketId, coord: Coord, grid: &mut WorldGrid) {
        if let Some(bucket) = self.get_mut(id) {
            bucket.location = BucketLocation::PlacedAt(coord);
            grid.set_occupant(coord, Occupant::Bucket(id));
        }
    }

    /// Lift a placed bucket into the agent's hands, clearing its cell.
    pub(crate) fn pick_up(&mut self, id: BucketId, grid: &mut WorldGrid) {
        if let Some(bucket) = self.get_mut(id) {
            if let BucketLocation::PlacedAt(coord) = bucket.location {
                grid.set_occupant(coord, Occupant::Empty);
            }
            bucket.location = BucketLocation::HeldByAgent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaky_types::ast::Landmarks;
    use leaky_types::RelativeFacing;

    #[test]
    fn test_place_and_pick_up_move_occupant_with_bucket() {
        let mut grid = WorldGrid::new(&Landmarks::from_facings(
            RelativeFacing::Front,
            RelativeFacing::Right,
            RelativeFacing::Left,
        ));
        let mut store = BucketStore::new();
        let id = store.collect(3, 1);
        let spot = Coord::new(0, -1);

        store.place(id, spot, &mut grid);
        assert_eq!(grid.occupant_at(spot), Occupant::Bucket(id));
        assert_eq!(store.get(id).map(|b| b.location), Some(BucketLocation::PlacedAt(spot)));

        store.pick_up(id, &mut grid);
        assert_eq!(grid.occupant_at(spot), Occupant::Empty);
        assert_eq!(store.get(id).map(|b| b.location), Some(BucketLocation::HeldByAgent));
    }

    #[test]
    fn test_room_and_position() {
        let mut store = BucketStore::new();
        let id = store.collect(2, 0);
        let bucket = store.get_mut(id).unwrap();
        bucket.contents = 150;
        assert_eq!(bucket.room(), 50);
        bucket.contents = 260;
        assert_eq!(bucket.room(), 0);
        assert_eq!(bucket.position(Coord::new(4, 4)), Coord::new(4, 4));
        bucket.location = BucketLocation::PlacedAt(Coord::new(1, 1));
        assert_eq!(bucket.position(Coord::new(4, 4)), Coord::new(1, 1));
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut store = BucketStore::new();
        assert_eq!(store.collect(1, 0), BucketId(0));
        assert_eq!(store.collect(1, 0), BucketId(1));
        assert_eq!(store.len(), 2);
    }
}
