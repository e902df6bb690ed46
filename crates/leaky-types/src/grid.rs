//! Grid geometry: coordinates, compass directions, and facings relative to
//! the agent.
//!
//! North is `+y` and east is `+x`. The agent always starts at the origin
//! facing north.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer cell coordinate on the unbounded grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The adjacent cell in `direction`.
    pub fn step(self, direction: Direction) -> Coord {
        let (dx, dy) = direction.offset();
        Coord::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours in N, E, S, W order.
    pub fn neighbours(self) -> [Coord; 4] {
        Direction::ALL.map(|d| self.step(d))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Absolute compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Clockwise order, which is also the tie-break order for water sharing.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn index(self) -> u8 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index % 4)]
    }

    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// Rotate clockwise by `quarter_turns` quarter turns.
    pub fn rotate(self, quarter_turns: u8) -> Self {
        Self::from_index(self.index() + quarter_turns % 4)
    }

    /// The absolute direction of something at `facing` relative to an agent
    /// looking this way.
    pub fn resolve(self, facing: RelativeFacing) -> Self {
        self.rotate(facing.quarter_turns())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// A direction relative to where the agent is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeFacing {
    Front,
    Right,
    Behind,
    Left,
}

impl RelativeFacing {
    fn quarter_turns(self) -> u8 {
        match self {
            RelativeFacing::Front => 0,
            RelativeFacing::Right => 1,
            RelativeFacing::Behind => 2,
            RelativeFacing::Left => 3,
        }
    }
}

impl fmt::Display for RelativeFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = match self {
            RelativeFacing::Front => "in front of me",
            RelativeFacing::Right => "to my right",
            RelativeFacing::Behind => "behind me",
            RelativeFacing::Left => "to my left",
        };
        f.write_str(phrase)
    }
}

/// How far a `turn` instruction rotates the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
    Around,
    /// A full revolution: direction is unchanged but the turn still happens.
    AllTheWayAround,
}

impl Turn {
    /// Clockwise quarter turns.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Turn::Right => 1,
            Turn::Around => 2,
            Turn::Left => 3,
            Turn::AllTheWayAround => 4,
        }
    }
}
