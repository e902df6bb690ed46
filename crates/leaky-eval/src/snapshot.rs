//! Serializable view of the whole world at one moment.

use crate::agent::{Agent, PendingFlags, WelliesLedger};
use crate::bucket::{Bucket, BucketId, BucketStore};
use crate::world::{Centipints, WorldGrid};
use leaky_types::{Coord, Direction};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSnapshot {
    pub position: Coord,
    pub facing: Direction,
    pub held: Option<BucketId>,
    pub wellies_depth: usize,
    pub wellies: WelliesLedger,
    pub pending: PendingFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WetCell {
    pub coord: Coord,
    pub water: Centipints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub finished: bool,
    pub agent: AgentSnapshot,
    /// In id order.
    pub buckets: Vec<Bucket>,
    /// In coordinate order.
    pub wet_cells: Vec<WetCell>,
}

impl WorldSnapshot {
    pub(crate) fn capture(
        tick: u64,
        agent: &Agent,
        buckets: &BucketStore,
        world: &WorldGrid,
        finished: bool,
    ) -> Self {
        Self {
            tick,
            finished,
            agent: AgentSnapshot {
                position: agent.position,
                facing: agent.facing,
                held: agent.held,
                wellies_depth: agent.wellies_depth(),
                wellies: agent.ledger(),
                pending: agent.pending(),
            },
            buckets: buckets.iter().cloned().collect(),
            wet_cells: world
                .wet_cells()
                .map(|(coord, water)| WetCell { coord, water })
                .collect(),
        }
    }

    /// Total water in the world, floor and buckets together.
    pub fn total_water(&self) -> Centipints {
        let floor: Centipints = self.wet_cells.iter().map(|c| c.water).sum();
        let held: Centipints = self.buckets.iter().map(|b| b.contents).sum();
        floor + held
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
