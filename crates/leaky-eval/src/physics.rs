//! Water physics: deposits, per-tick leakage, and overflow redistribution.
//!
//! Nothing here fails. Water is only ever moved between cells and buckets,
//! never created or destroyed, except by evaporation.

use crate::bucket::{BucketId, BucketLocation, BucketStore};
use crate::world::{Centipints, Occupant, WorldGrid};
use leaky_types::Coord;
use tracing::debug;

/// Drop `amount` onto `coord`. A placed bucket there takes it with no
/// capacity check; anything else (landmarks included) gets floor water.
pub(crate) fn deposit(
    grid: &mut WorldGrid,
    buckets: &mut BucketStore,
    coord: Coord,
    amount: Centipints,
) {
    if amount == 0 {
        return;
    }
    match grid.occupant_at(coord) {
        Occupant::Bucket(id) => {
            if let Some(bucket) = buckets.get_mut(id) {
                bucket.contents = bucket.contents.saturating_add(amount);
            }
        }
        _ => grid.add_floor_water(coord, amount),
    }
}

/// Split `amount` over the four neighbours of `center`: `amount / 4` each,
/// then the remainder one centipint at a time in N, E, S, W order.
pub(crate) fn spread_to_neighbours(
    grid: &mut WorldGrid,
    buckets: &mut BucketStore,
    center: Coord,
    amount: Centipints,
) {
    let share = amount / 4;
    let mut remainder = amount % 4;
    for neighbour in center.neighbours() {
        let extra = if remainder > 0 {
            remainder -= 1;
            1
        } else {
            0
        };
        deposit(grid, buckets, neighbour, share + extra);
    }
}

/// Every bucket loses one centipint per hole, in ascending id order.
///
/// A held bucket drips onto the agent's cell; a placed one drains into its
/// four neighbours.
pub(crate) fn leak(grid: &mut WorldGrid, buckets: &mut BucketStore, agent: Coord) {
    for index in 0..buckets.len() {
        let id = BucketId(index as u32);
        let Some(bucket) = buckets.get_mut(id) else {
            continue;
        };
        let lost = bucket.holes.min(bucket.contents);
        if lost == 0 {
            continue;
        }
        bucket.contents -= lost;
        let location = bucket.location;
        match location {
            BucketLocation::HeldByAgent => grid.add_floor_water(agent, lost),
            BucketLocation::PlacedAt(at) => spread_to_neighbours(grid, buckets, at, lost),
        }
    }
}

/// Clamp bucket `id` to its capacity and hand the excess out: `excess / 4`
/// to each neighbour of the bucket, `excess % 4` onto the agent's cell.
///
/// Neighbour buckets are topped up without overflowing in turn. Returns the
/// excess that was redistributed.
pub(crate) fn settle_overflow(
    grid: &mut WorldGrid,
    buckets: &mut BucketStore,
    id: BucketId,
    agent: Coord,
) -> Centipints {
    let Some(bucket) = buckets.get_mut(id) else {
        return 0;
    };
    let capacity = bucket.capacity_centipints();
    if bucket.contents <= capacity {
        return 0;
    }
    let excess = bucket.contents - capacity;
    bucket.contents = capacity;
    let center = bucket.position(agent);

    debug!(bucket = %id, excess, x = center.x, y = center.y, "bucket overflowed");

    let share = excess / 4;
    for neighbour in center.neighbours() {
        deposit(grid, buckets, neighbour, share);
    }
    grid.add_floor_water(agent, excess % 4);
    excess
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaky_types::ast::Landmarks;
    use leaky_types::RelativeFacing;

    fn world() -> (WorldGrid, BucketStore) {
        let grid = WorldGrid::new(&Landmarks::from_facings(
            RelativeFacing::Front,
            RelativeFacing::Right,
            RelativeFacing::Left,
        ));
        (grid, BucketStore::new())
    }

    #[test]
    fn test_held_bucket_leaks_onto_agent_cell() {
        let (mut grid, mut buckets) = world();
        let id = buckets.collect(5, 3);
        buckets.get_mut(id).unwrap().contents = 2;

        leak(&mut grid, &mut buckets, Coord::ORIGIN);
        assert_eq!(buckets.get(id).unwrap().contents, 0);
        assert_eq!(grid.floor_water(Coord::ORIGIN), 2);
    }

    #[test]
    fn test_placed_bucket_leak_remainder_goes_north_first() {
        let (mut grid, mut buckets) = world();
        let id = buckets.collect(5, 7);
        buckets.get_mut(id).unwrap().contents = 100;
        let at = Coord::new(5, 5);
        buckets.place(id, at, &mut grid);

        leak(&mut grid, &mut buckets, Coord::ORIGIN);
        // 7 = 4 * 1 + 3: N, E, S get the extra centipint.
        assert_eq!(grid.floor_water(Coord::new(5, 6)), 2);
        assert_eq!(grid.floor_water(Coord::new(6, 5)), 2);
        assert_eq!(grid.floor_water(Coord::new(5, 4)), 2);
        assert_eq!(grid.floor_water(Coord::new(4, 5)), 1);
        assert_eq!(buckets.get(id).unwrap().contents, 93);
    }

    #[test]
    fn test_leak_into_neighbour_bucket_ignores_capacity() {
        let (mut grid, mut buckets) = world();
        let leaky = buckets.collect(1, 4);
        buckets.get_mut(leaky).unwrap().contents = 50;
        buckets.place(leaky, Coord::new(3, 0), &mut grid);
        let full = buckets.collect(1, 0);
        buckets.get_mut(full).unwrap().contents = 100;
        buckets.place(full, Coord::new(4, 0), &mut grid);

        leak(&mut grid, &mut buckets, Coord::ORIGIN);
        assert_eq!(buckets.get(full).unwrap().contents, 101);
        assert_eq!(grid.floor_water(Coord::new(4, 0)), 0);
    }

    #[test]
    fn test_overflow_splits_excess_and_remainder() {
        let (mut grid, mut buckets) = world();
        let id = buckets.collect(2, 0);
        buckets.get_mut(id).unwrap().contents = 307;

        let excess = settle_overflow(&mut grid, &mut buckets, id, Coord::ORIGIN);
        assert_eq!(excess, 107);
        assert_eq!(buckets.get(id).unwrap().contents, 200);
        // Held: neighbours are the agent's. North is the depot at (0, 1).
        for n in Coord::ORIGIN.neighbours() {
            assert_eq!(grid.floor_water(n), 26);
        }
        assert_eq!(grid.floor_water(Coord::ORIGIN), 3);
    }

    #[test]
    fn test_overflow_into_full_bucket_does_not_cascade() {
        let (mut grid, mut buckets) = world();
        let target = buckets.collect(1, 0);
        buckets.get_mut(target).unwrap().contents = 100;
        buckets.place(target, Coord::new(0, -1), &mut grid);
        let id = buckets.collect(1, 0);
        buckets.get_mut(id).unwrap().contents = 140;

        settle_overflow(&mut grid, &mut buckets, id, Coord::ORIGIN);
        assert_eq!(buckets.get(target).unwrap().contents, 110);
        assert_eq!(grid.floor_water(Coord::new(0, -2)), 0);
    }

    #[test]
    fn test_no_overflow_within_capacity() {
        let (mut grid, mut buckets) = world();
        let id = buckets.collect(3, 0);
        buckets.get_mut(id).unwrap().contents = 300;
        assert_eq!(settle_overflow(&mut grid, &mut buckets, id, Coord::ORIGIN), 0);
        assert_eq!(grid.wet_cell_count(), 0);
    }
}
