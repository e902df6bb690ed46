//! The agent: position, facing, hands, wellies, and one-shot requests.

use crate::bucket::BucketId;
use leaky_types::ast::Invocation;
use leaky_types::{Coord, Direction};
use serde::Serialize;

/// A checkpoint taken when a pair of wellies is put on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WellyFrame {
    /// Index of the `put on my wellies` instruction.
    pub put_on_index: usize,
    pub position_at_don: Coord,
    pub direction_at_don: Direction,
}

/// Requests made by `i wish to ...`. Each one applies only to the very next
/// instruction executed, whatever that instruction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PendingFlags {
    pub speak_with_god: bool,
    pub hear_from_god: bool,
    pub scream_into_void: bool,
    pub wellies_returned: bool,
}

impl PendingFlags {
    pub fn set(&mut self, invocation: Invocation) {
        match invocation {
            Invocation::SpeakWithGod => self.speak_with_god = true,
            Invocation::HearFromGod => self.hear_from_god = true,
            Invocation::ScreamIntoVoid => self.scream_into_void = true,
            Invocation::WelliesReturned => self.wellies_returned = true,
        }
    }
}

/// Running totals that account for every frame ever pushed.
///
/// `worn == donned - doffed - slipped` holds after every instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WelliesLedger {
    pub donned: u64,
    pub doffed: u64,
    pub slipped: u64,
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Coord,
    pub facing: Direction,
    pub held: Option<BucketId>,
    /// Last element is the outermost (most recently donned) pair.
    wellies: Vec<WellyFrame>,
    ledger: WelliesLedger,
    pub(crate) pending: PendingFlags,
}

impl Agent {
    /// A fresh agent at the origin, looking north, empty-handed.
    pub fn new() -> Self {
        Self {
            position: Coord::ORIGIN,
            facing: Direction::North,
            held: None,
            wellies: Vec::new(),
            ledger: WelliesLedger::default(),
            pending: PendingFlags::default(),
        }
    }

    /// The cell directly ahead.
    pub fn ahead(&self) -> Coord {
        self.position.step(self.facing)
    }

    pub fn pending(&self) -> PendingFlags {
        self.pending
    }

    /// Clear and return the flags set by the previous instruction.
    pub(crate) fn take_pending(&mut self) -> PendingFlags {
        std::mem::take(&mut self.pending)
    }

    // ── Wellies stack ────────────────────────────────────────────────────────

    pub fn wellies(&self) -> &[WellyFrame] {
        &self.wellies
    }

    pub fn wellies_depth(&self) -> usize {
        self.wellies.len()
    }

    pub fn ledger(&self) -> WelliesLedger {
        self.ledger
    }

    pub(crate) fn put_on_wellies(&mut self, put_on_index: usize) {
        self.wellies.push(WellyFrame {
            put_on_index,
            position_at_don: self.position,
            direction_at_don: self.facing,
        });
        self.ledger.donned += 1;
    }

    /// Returns `false` if there was nothing to take off.
    pub(crate) fn take_off_wellies(&mut self) -> bool {
        let popped = self.wellies.pop().is_some();
        if popped {
            self.ledger.doffed += 1;
        }
        popped
    }

    /// Lose the `count` outermost pairs in a slip, outermost first.
    /// The caller checks that enough pairs are worn.
    pub(crate) fn slip_off(&mut self, count: usize) -> Vec<WellyFrame> {
        let keep = self.wellies.len().saturating_sub(count);
        let lost: Vec<WellyFrame> = self.wellies.drain(keep..).rev().collect();
        self.ledger.slipped += lost.len() as u64;
        lost
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic tick counter: one tick per executed instruction, one per step
/// while moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Clock {
    ticks: u64,
}

impl Clock {
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn advance(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }
}
