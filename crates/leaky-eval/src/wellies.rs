//! Wellies: static put-on/take-off matching and slip resolution.
//!
//! Wellies are donned and doffed in strict nesting order and the language
//! has no other branching, so the correspondence between `put on my wellies`
//! and `take off my wellies` is plain bracket matching over the instruction
//! sequence. The table is built once before execution; slips then resolve
//! their jump targets with a single lookup.

use crate::agent::Agent;
use crate::error::{CrashKind, OpResult};
use leaky_types::ast::{Instruction, InstructionKind};
use leaky_types::{Coord, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellyMatchTable {
    /// Indexed by position in the instruction vector; `Some` only for
    /// matched put-ons.
    matches: Vec<Option<usize>>,
    unmatched_take_offs: Vec<usize>,
}

impl WellyMatchTable {
    pub fn build(instructions: &[Instruction]) -> Self {
        let mut matches = vec![None; instructions.len()];
        let mut unmatched_take_offs = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        for (position, instr) in instructions.iter().enumerate() {
            match instr.kind {
                InstructionKind::PutOnWellies => open.push(position),
                InstructionKind::TakeOffWellies => match open.pop() {
                    Some(put_on) => matches[put_on] = Some(position),
                    None => unmatched_take_offs.push(position),
                },
                _ => {}
            }
        }

        Self {
            matches,
            unmatched_take_offs,
        }
    }

    /// The take-off matching the put-on at `put_on_index`, if any.
    pub fn matching_take_off(&self, put_on_index: usize) -> Option<usize> {
        self.matches.get(put_on_index).copied().flatten()
    }

    pub fn unmatched_take_offs(&self) -> &[usize] {
        &self.unmatched_take_offs
    }

    /// Resolve a slip on a floor holding `pints` whole pints of water.
    ///
    /// The caller only invokes this for `pints >= 1`.
    pub(crate) fn resolve_slip(
        &self,
        agent: &mut Agent,
        pints: u64,
        wellies_returned: bool,
    ) -> OpResult<Slip> {
        let worn = agent.wellies_depth();
        if (worn as u64) < pints {
            return Err(CrashKind::FellOver(format!(
                "slipped on {pints} pints of water wearing {worn} pairs of wellies"
            )));
        }

        if wellies_returned {
            if let Some(frame) = agent.slip_off(1).first().copied() {
                agent.position = frame.position_at_don;
                agent.facing = frame.direction_at_don;
                return Ok(Slip::Rewind {
                    resume_at: frame.put_on_index + 1,
                    position: frame.position_at_don,
                    facing: frame.direction_at_don,
                });
            }
        }

        // `pints <= worn`, which is a usize.
        let lost = agent.slip_off(pints as usize);
        let earliest = lost
            .iter()
            .map(|f| f.put_on_index)
            .min()
            .unwrap_or_default();
        Ok(Slip::Skip {
            resume_at: self.matching_take_off(earliest).map(|t| t + 1),
        })
    }
}

/// Where execution continues after a slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slip {
    /// Wellies were returned: back to just after the outermost put-on, with
    /// position and facing restored.
    Rewind {
        resume_at: usize,
        position: Coord,
        facing: Direction,
    },
    /// Skip past the take-off of the earliest pair lost. `None` when that pair
    /// is never taken off, which ends the program.
    Skip { resume_at: Option<usize> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaky_types::{Span, Turn};

    fn program(kinds: &[InstructionKind]) -> Vec<Instruction> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, k)| Instruction::new(i, *k, Span::point(i as u32 + 1, 1)))
            .collect()
    }

    const ON: InstructionKind = InstructionKind::PutOnWellies;
    const OFF: InstructionKind = InstructionKind::TakeOffWellies;
    const TURN: InstructionKind = InstructionKind::Turn(Turn::Left);

    #[test]
    fn test_nested_matching() {
        // 0:on 1:on 2:turn 3:off 4:on 5:off 6:off
        let table = WellyMatchTable::build(&program(&[ON, ON, TURN, OFF, ON, OFF, OFF]));
        assert_eq!(table.matching_take_off(0), Some(6));
        assert_eq!(table.matching_take_off(1), Some(3));
        assert_eq!(table.matching_take_off(4), Some(5));
        assert_eq!(table.matching_take_off(2), None);
        assert!(table.unmatched_take_offs().is_empty());
    }

    #[test]
    fn test_unmatched_on_and_off() {
        // 0:off 1:on 2:on 3:off
        let table = WellyMatchTable::build(&program(&[OFF, ON, ON, OFF]));
        assert_eq!(table.unmatched_take_offs(), &[0]);
        assert_eq!(table.matching_take_off(1), None);
        assert_eq!(table.matching_take_off(2), Some(3));
        assert_eq!(table.matching_take_off(99), None);
    }

    #[test]
    fn test_matching_uses_positions_not_recorded_indices() {
        let instructions = vec![
            Instruction::new(5, ON, Span::point(1, 1)),
            Instruction::new(6, OFF, Span::point(2, 1)),
            Instruction::new(40, OFF, Span::point(3, 1)),
        ];
        let table = WellyMatchTable::build(&instructions);
        assert_eq!(table.matching_take_off(0), Some(1));
        assert_eq!(table.matching_take_off(5), None);
        assert_eq!(table.unmatched_take_offs(), &[2]);
    }

    fn agent_wearing(put_ons: &[usize]) -> Agent {
        let mut agent = Agent::new();
        for &i in put_ons {
            agent.put_on_wellies(i);
            agent.position = agent.position.step(Direction::South);
        }
        agent
    }

    #[test]
    fn test_slip_skips_past_earliest_lost_pair() {
        // 0:on 1:on 2:on 3:turn 4:off 5:off 6:off
        let table = WellyMatchTable::build(&program(&[ON, ON, ON, TURN, OFF, OFF, OFF]));
        let mut agent = agent_wearing(&[0, 1, 2]);
        let before = agent.position;

        let slip = table.resolve_slip(&mut agent, 2, false).unwrap();
        // Frames 2 and 1 are lost; frame 1 closes at 5.
        assert_eq!(slip, Slip::Skip { resume_at: Some(6) });
        assert_eq!(agent.wellies_depth(), 1);
        assert_eq!(agent.position, before);
    }

    #[test]
    fn test_slip_without_take_off_ends_program() {
        let table = WellyMatchTable::build(&program(&[ON, TURN]));
        let mut agent = agent_wearing(&[0]);
        let slip = table.resolve_slip(&mut agent, 1, false).unwrap();
        assert_eq!(slip, Slip::Skip { resume_at: None });
        assert_eq!(agent.wellies_depth(), 0);
    }

    #[test]
    fn test_slip_with_too_few_wellies_falls_over() {
        let table = WellyMatchTable::build(&program(&[ON, TURN, OFF]));
        let mut agent = agent_wearing(&[0]);
        let err = table.resolve_slip(&mut agent, 2, false).unwrap_err();
        assert!(matches!(err, CrashKind::FellOver(_)));
        assert_eq!(agent.wellies_depth(), 1);
    }

    #[test]
    fn test_returned_wellies_rewind_one_pair() {
        let table = WellyMatchTable::build(&program(&[ON, ON, ON, TURN, OFF, OFF, OFF]));
        let mut agent = agent_wearing(&[0, 1, 2]);
        agent.facing = Direction::East;

        let slip = table.resolve_slip(&mut agent, 2, true).unwrap();
        assert_eq!(
            slip,
            Slip::Rewind {
                resume_at: 3,
                position: Coord::new(0, -2),
                facing: Direction::North,
            }
        );
        assert_eq!(agent.wellies_depth(), 2);
        assert_eq!(agent.position, Coord::new(0, -2));
        assert_eq!(agent.facing, Direction::North);
    }
}
