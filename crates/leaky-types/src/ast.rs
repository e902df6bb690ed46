//! Program representation shared by the parser and the engine.
//!
//! A program is a landmark header followed by a flat instruction sequence.
//! Every instruction knows its index in that sequence: the wellies matching
//! table and the engine's program counter are both expressed in indices.

use crate::grid::{Coord, Direction, RelativeFacing, Turn};
use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capacity used for `collect a max pint bucket`.
pub const MAX_CAPACITY_PINTS: u64 = u32::MAX as u64;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed Leaky Bucket program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub landmarks: Landmarks,
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Where the three fixed landmarks sit. The header places each one next to
/// the agent's starting cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmarks {
    pub depot: Coord,
    pub tap: Coord,
    pub pond: Coord,
}

impl Landmarks {
    /// Place the landmarks by their facing from an agent at the origin
    /// looking north.
    pub fn from_facings(depot: RelativeFacing, tap: RelativeFacing, pond: RelativeFacing) -> Self {
        let at = |facing| Coord::ORIGIN.step(Direction::North.resolve(facing));
        Self {
            depot: at(depot),
            tap: at(tap),
            pond: at(pond),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Instructions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Position in [`Program::instructions`].
    pub index: usize,
    pub kind: InstructionKind,
    pub span: Span,
}

impl Instruction {
    pub fn new(index: usize, kind: InstructionKind, span: Span) -> Self {
        Self { index, kind, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    /// `collect a N pint bucket [with H holes]`
    CollectBucket { capacity: u64, holes: u64 },
    /// `turn left|right|around|all the way around`
    Turn(Turn),
    /// `move N steps`
    Move { steps: u64 },
    /// `move until my bucket is empty`
    MoveUntilEmpty,
    Fill(FillKind),
    /// `pick up the bucket F`
    PickUp(RelativeFacing),
    /// `place the bucket down F`
    PlaceDown(RelativeFacing),
    /// `empty the bucket here` / `empty the bucket onto the square F`
    Empty {
        target: EmptyTarget,
        without_overflow: bool,
    },
    /// `shrink my bucket`
    Shrink,
    /// `i wish to ...`
    Invoke(Invocation),
    /// `put on my wellies`
    PutOnWellies,
    /// `take off my wellies`
    TakeOffWellies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    /// `fill the bucket to the top`
    ToTheTop,
    /// `fill the bucket with N pints of water`
    Pints(u64),
    /// `let god fill the bucket as he wishes`
    LetGod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyTarget {
    /// The floor under the agent.
    Here,
    Square(RelativeFacing),
}

/// One-shot requests that modify the instruction executed right after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Invocation {
    SpeakWithGod,
    HearFromGod,
    ScreamIntoVoid,
    WelliesReturned,
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollectBucket { capacity, holes } => {
                if *capacity == MAX_CAPACITY_PINTS {
                    write!(f, "collect a max pint bucket")?;
                } else {
                    write!(f, "collect a {capacity} pint bucket")?;
                }
                if *holes > 0 {
                    write!(f, " with {holes} holes")?;
                }
                Ok(())
            }
            Self::Turn(Turn::Left) => write!(f, "turn left"),
            Self::Turn(Turn::Right) => write!(f, "turn right"),
            Self::Turn(Turn::Around) => write!(f, "turn around"),
            Self::Turn(Turn::AllTheWayAround) => write!(f, "turn all the way around"),
            Self::Move { steps } => write!(f, "move {steps} steps"),
            Self::MoveUntilEmpty => write!(f, "move until my bucket is empty"),
            Self::Fill(FillKind::ToTheTop) => write!(f, "fill the bucket to the top"),
            Self::Fill(FillKind::Pints(n)) => write!(f, "fill the bucket with {n} pints of water"),
            Self::Fill(FillKind::LetGod) => write!(f, "let god fill the bucket as he wishes"),
            Self::PickUp(facing) => write!(f, "pick up the bucket {facing}"),
            Self::PlaceDown(facing) => write!(f, "place the bucket down {facing}"),
            Self::Empty {
                target,
                without_overflow,
            } => {
                match target {
                    EmptyTarget::Here => write!(f, "empty the bucket here")?,
                    EmptyTarget::Square(facing) => {
                        write!(f, "empty the bucket onto the square {facing}")?
                    }
                }
                if *without_overflow {
                    write!(f, " without overflow")?;
                }
                Ok(())
            }
            Self::Shrink => write!(f, "shrink my bucket"),
            Self::Invoke(Invocation::SpeakWithGod) => write!(f, "i wish to speak with god"),
            Self::Invoke(Invocation::HearFromGod) => write!(f, "i wish to hear from god"),
            Self::Invoke(Invocation::ScreamIntoVoid) => write!(f, "i wish to scream into the void"),
            Self::Invoke(Invocation::WelliesReturned) => {
                write!(f, "i wish to have my wellies returned")
            }
            Self::PutOnWellies => write!(f, "put on my wellies"),
            Self::TakeOffWellies => write!(f, "take off my wellies"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmarks_from_facings() {
        let lm = Landmarks::from_facings(
            RelativeFacing::Front,
            RelativeFacing::Right,
            RelativeFacing::Left,
        );
        assert_eq!(lm.depot, Coord::new(0, 1));
        assert_eq!(lm.tap, Coord::new(1, 0));
        assert_eq!(lm.pond, Coord::new(-1, 0));
    }

    #[test]
    fn test_display_is_canonical_phrase() {
        let collect = InstructionKind::CollectBucket {
            capacity: 5,
            holes: 2,
        };
        assert_eq!(collect.to_string(), "collect a 5 pint bucket with 2 holes");

        let max = InstructionKind::CollectBucket {
            capacity: MAX_CAPACITY_PINTS,
            holes: 0,
        };
        assert_eq!(max.to_string(), "collect a max pint bucket");

        let empty = InstructionKind::Empty {
            target: EmptyTarget::Square(RelativeFacing::Left),
            without_overflow: true,
        };
        assert_eq!(
            empty.to_string(),
            "empty the bucket onto the square to my left without overflow"
        );
    }
}
