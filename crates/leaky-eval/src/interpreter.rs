//! The instruction dispatcher.
//!
//! One call to [`Interpreter::step`] executes one instruction: it clears the
//! one-shot flags left by the previous instruction, applies the instruction's
//! effect, advances the clock (once, or once per cell moved) with full water
//! physics on every tick, and picks the next program counter.

use crate::agent::{Agent, Clock, PendingFlags};
use crate::bucket::{Bucket, BucketId, BucketStore};
use crate::config::EngineConfig;
use crate::error::{Crash, CrashKind, EvalResult, OpResult};
use crate::io::{format_pints, IoPort};
use crate::physics;
use crate::snapshot::WorldSnapshot;
use crate::wellies::{Slip, WellyMatchTable};
use crate::world::{Centipints, Occupant, WorldGrid, CENTIPINTS_PER_PINT};
use leaky_types::ast::{EmptyTarget, FillKind, Instruction, InstructionKind, Program};
use leaky_types::{RelativeFacing, Turn};
use tracing::{debug, trace, warn};

/// Largest pond offering that god will accept as a character, in pints.
pub const MAX_CHARACTER_PINTS: u64 = 127;

/// What the dispatcher does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub instructions_executed: u64,
}

pub struct Interpreter<'p, I: IoPort> {
    program: &'p Program,
    table: WellyMatchTable,
    world: WorldGrid,
    buckets: BucketStore,
    agent: Agent,
    clock: Clock,
    /// `None` once the program has halted.
    pc: Option<usize>,
    executed: u64,
    io: I,
    config: EngineConfig,
}

impl<'p, I: IoPort> Interpreter<'p, I> {
    pub fn new(program: &'p Program, io: I) -> Self {
        Self::with_config(program, io, EngineConfig::default())
    }

    pub fn with_config(program: &'p Program, io: I, config: EngineConfig) -> Self {
        Self {
            program,
            table: WellyMatchTable::build(&program.instructions),
            world: WorldGrid::new(&program.landmarks),
            buckets: BucketStore::new(),
            agent: Agent::new(),
            clock: Clock::default(),
            pc: Some(0),
            executed: 0,
            io,
            config,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    pub fn buckets(&self) -> &BucketStore {
        &self.buckets
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn welly_table(&self) -> &WellyMatchTable {
        &self.table
    }

    /// Index of the next instruction, or `None` when nothing is left to run.
    pub fn pc(&self) -> Option<usize> {
        self.pc.filter(|&pc| pc < self.program.len())
    }

    pub fn is_finished(&self) -> bool {
        self.pc().is_none()
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    pub fn into_io(self) -> I {
        self.io
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(
            self.clock.ticks(),
            &self.agent,
            &self.buckets,
            &self.world,
            self.is_finished(),
        )
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.clock.ticks(),
            instructions_executed: self.executed,
        }
    }

    // ── Driving ──────────────────────────────────────────────────────────────

    /// Run to completion or to the first crash.
    pub fn run(&mut self) -> EvalResult<RunSummary> {
        while self.step()? {}
        debug!(
            ticks = self.clock.ticks(),
            executed = self.executed,
            "program finished"
        );
        Ok(self.summary())
    }

    /// Execute one instruction. Returns `false` without doing anything once
    /// the program has finished.
    pub fn step(&mut self) -> EvalResult<bool> {
        let Some(pc) = self.pc() else {
            self.pc = None;
            return Ok(false);
        };
        let program = self.program;
        let instr = &program.instructions[pc];
        trace!(
            index = pc,
            line = instr.span.start_line,
            tick = self.clock.ticks(),
            instruction = %instr.kind,
            "execute"
        );

        let flow = self.execute(pc, instr).map_err(|kind| Crash {
            kind,
            index: pc,
            span: instr.span,
        })?;
        self.executed += 1;
        self.pc = match flow {
            Flow::Next => Some(pc + 1),
            Flow::Jump(target) => Some(target),
            Flow::Halt => None,
        };
        Ok(true)
    }

    /// `pc` is the instruction's position in the program, which is what wellies
    /// frames and jump targets refer to.
    fn execute(&mut self, pc: usize, instr: &Instruction) -> OpResult<Flow> {
        let flags = self.agent.take_pending();
        let flow = match instr.kind {
            // Movement ticks once per cell on its own.
            InstructionKind::Move { steps } => {
                self.walk(steps)?;
                return Ok(Flow::Next);
            }
            InstructionKind::MoveUntilEmpty => {
                self.walk_until_empty()?;
                return Ok(Flow::Next);
            }
            InstructionKind::CollectBucket { capacity, holes } => {
                self.collect(capacity, holes)?;
                Flow::Next
            }
            InstructionKind::Turn(turn) => self.turn(turn, flags)?,
            InstructionKind::Fill(kind) => {
                self.fill(kind, flags)?;
                Flow::Next
            }
            InstructionKind::PickUp(facing) => {
                self.pick_up(facing)?;
                Flow::Next
            }
            InstructionKind::PlaceDown(facing) => {
                self.place_down(facing)?;
                Flow::Next
            }
            InstructionKind::Empty {
                target,
                without_overflow,
            } => {
                self.empty(target, without_overflow, flags)?;
                Flow::Next
            }
            InstructionKind::Shrink => {
                self.shrink()?;
                Flow::Next
            }
            InstructionKind::Invoke(invocation) => {
                self.agent.pending.set(invocation);
                Flow::Next
            }
            InstructionKind::PutOnWellies => {
                if self.agent.held.is_some() {
                    return Err(CrashKind::BucketHandsError(
                        "cannot put on wellies while holding a bucket".into(),
                    ));
                }
                self.agent.put_on_wellies(pc);
                Flow::Next
            }
            InstructionKind::TakeOffWellies => {
                if !self.agent.take_off_wellies() {
                    warn!(
                        index = pc,
                        line = instr.span.start_line,
                        "took off wellies while wearing none"
                    );
                }
                Flow::Next
            }
        };
        self.tick()?;
        Ok(flow)
    }

    // ── Clock and physics ────────────────────────────────────────────────────

    /// Advance the clock, then evaporate, then leak.
    fn tick(&mut self) -> OpResult<()> {
        let now = self.clock.advance();
        if let Some(limit) = self.config.tick_limit {
            if now > limit {
                return Err(CrashKind::TickLimitExceeded(limit));
            }
        }
        self.world.evaporate();
        physics::leak(&mut self.world, &mut self.buckets, self.agent.position);
        Ok(())
    }

    // ── Movement ─────────────────────────────────────────────────────────────

    /// Step into the cell ahead; one tick.
    fn advance(&mut self) -> OpResult<()> {
        let target = self.agent.ahead();
        let occupant = self.world.occupant_at(target);
        if !occupant.is_empty() {
            return Err(CrashKind::FellOver(format!(
                "walked into {occupant} at {target}"
            )));
        }
        self.agent.position = target;
        self.tick()
    }

    fn walk(&mut self, steps: u64) -> OpResult<()> {
        if steps == 0 {
            return self.tick();
        }
        for _ in 0..steps {
            self.advance()?;
        }
        Ok(())
    }

    fn walk_until_empty(&mut self) -> OpResult<()> {
        let id = self.held("move until it is empty")?;
        if self.bucket(id)?.contents == 0 {
            return self.tick();
        }
        while self.bucket(id)?.contents > 0 {
            self.advance()?;
        }
        Ok(())
    }

    fn turn(&mut self, turn: Turn, flags: PendingFlags) -> OpResult<Flow> {
        if self.agent.held.is_some() {
            return Err(CrashKind::BucketHandsError(
                "cannot turn while holding a bucket".into(),
            ));
        }
        let pints = self.world.floor_water(self.agent.position) / CENTIPINTS_PER_PINT;
        if pints == 0 {
            self.agent.facing = self.agent.facing.rotate(turn.quarter_turns());
            return Ok(Flow::Next);
        }

        let slip = self
            .table
            .resolve_slip(&mut self.agent, pints, flags.wellies_returned)?;
        debug!(
            pints,
            depth = self.agent.wellies_depth(),
            ?slip,
            "slipped"
        );
        Ok(match slip {
            Slip::Rewind { resume_at, .. } => Flow::Jump(resume_at),
            Slip::Skip {
                resume_at: Some(target),
            } => Flow::Jump(target),
            Slip::Skip { resume_at: None } => Flow::Halt,
        })
    }

    // ── Buckets ──────────────────────────────────────────────────────────────

    fn held(&self, action: &str) -> OpResult<BucketId> {
        self.agent
            .held
            .ok_or_else(|| CrashKind::BucketNotHeld(format!("must be holding a bucket to {action}")))
    }

    fn bucket(&self, id: BucketId) -> OpResult<&Bucket> {
        self.buckets
            .get(id)
            .ok_or_else(|| CrashKind::BucketNotHeld(format!("bucket {id} does not exist")))
    }

    fn bucket_mut(&mut self, id: BucketId) -> OpResult<&mut Bucket> {
        self.buckets
            .get_mut(id)
            .ok_or_else(|| CrashKind::BucketNotHeld(format!("bucket {id} does not exist")))
    }

    fn require_facing(&self, landmark: Occupant, name: &'static str) -> OpResult<()> {
        if self.world.occupant_at(self.agent.ahead()) == landmark {
            Ok(())
        } else {
            Err(CrashKind::NotFacingRequiredLandmark(name))
        }
    }

    fn collect(&mut self, capacity: u64, holes: u64) -> OpResult<()> {
        self.require_facing(Occupant::Depot, "bucket depot")?;
        if let Some(id) = self.agent.held {
            return Err(CrashKind::BucketAlreadyHeld(format!(
                "cannot collect a bucket while holding bucket {id}"
            )));
        }
        let id = self.buckets.collect(capacity, holes);
        self.agent.held = Some(id);
        Ok(())
    }

    fn fill(&mut self, kind: FillKind, flags: PendingFlags) -> OpResult<()> {
        if flags.hear_from_god {
            let id = self.held("fill it")?;
            let c = self.io.read_character()?;
            let pints = u64::from(u32::from(c));
            return self.pour_in(id, pints.saturating_mul(CENTIPINTS_PER_PINT));
        }
        if kind == FillKind::LetGod {
            let id = self.held("fill it")?;
            let pints = self.io.read_integer()?;
            return self.pour_in(id, pints.saturating_mul(CENTIPINTS_PER_PINT));
        }

        self.require_facing(Occupant::Tap, "tap")?;
        let id = self.held("fill it")?;
        match kind {
            FillKind::Pints(pints) => self.pour_in(id, pints.saturating_mul(CENTIPINTS_PER_PINT)),
            FillKind::ToTheTop | FillKind::LetGod => {
                let bucket = self.bucket_mut(id)?;
                bucket.contents = bucket.contents.max(bucket.capacity_centipints());
                self.overflow(id);
                Ok(())
            }
        }
    }

    /// Add water to a bucket and let any excess overflow.
    fn pour_in(&mut self, id: BucketId, amount: Centipints) -> OpResult<()> {
        let bucket = self.bucket_mut(id)?;
        bucket.contents = bucket.contents.saturating_add(amount);
        self.overflow(id);
        Ok(())
    }

    fn overflow(&mut self, id: BucketId) {
        physics::settle_overflow(&mut self.world, &mut self.buckets, id, self.agent.position);
    }

    fn pick_up(&mut self, facing: RelativeFacing) -> OpResult<()> {
        reject_behind(facing, "pick up a bucket")?;
        if let Some(id) = self.agent.held {
            return Err(CrashKind::BucketAlreadyHeld(format!(
                "cannot pick up another bucket while holding bucket {id}"
            )));
        }
        let target = self.agent.position.step(self.agent.facing.resolve(facing));
        let Occupant::Bucket(id) = self.world.occupant_at(target) else {
            return Err(CrashKind::InvalidTarget(format!(
                "there is no bucket {facing}"
            )));
        };
        self.buckets.pick_up(id, &mut self.world);
        self.agent.held = Some(id);
        Ok(())
    }

    fn place_down(&mut self, facing: RelativeFacing) -> OpResult<()> {
        reject_behind(facing, "place a bucket")?;
        let id = self.held("place it down")?;
        let target = self.agent.position.step(self.agent.facing.resolve(facing));
        let occupant = self.world.occupant_at(target);
        if !occupant.is_empty() {
            return Err(CrashKind::InvalidTarget(format!(
                "cannot place a bucket on {occupant}"
            )));
        }
        self.buckets.place(id, target, &mut self.world);
        self.agent.held = None;
        Ok(())
    }

    fn empty(
        &mut self,
        target: EmptyTarget,
        without_overflow: bool,
        flags: PendingFlags,
    ) -> OpResult<()> {
        let facing = match target {
            EmptyTarget::Here => None,
            EmptyTarget::Square(facing) => {
                reject_behind(facing, "empty a bucket")?;
                Some(facing)
            }
        };
        let id = self.held("empty it")?;

        let Some(facing) = facing else {
            if without_overflow {
                return Err(CrashKind::InvalidWithoutOverflowTarget("here"));
            }
            let amount = std::mem::take(&mut self.bucket_mut(id)?.contents);
            self.world.add_floor_water(self.agent.position, amount);
            return Ok(());
        };

        let square = self.agent.position.step(self.agent.facing.resolve(facing));
        match self.world.occupant_at(square) {
            Occupant::Empty => {
                if without_overflow {
                    return Err(CrashKind::InvalidWithoutOverflowTarget("onto the floor"));
                }
                let amount = std::mem::take(&mut self.bucket_mut(id)?.contents);
                self.world.add_floor_water(square, amount);
            }
            Occupant::Bucket(other) => {
                let room = self.bucket(other)?.room();
                let source = self.bucket_mut(id)?;
                let amount = if without_overflow {
                    source.contents.min(room)
                } else {
                    source.contents
                };
                source.contents -= amount;
                let dest = self.bucket_mut(other)?;
                dest.contents = dest.contents.saturating_add(amount);
                if !without_overflow {
                    self.overflow(other);
                }
            }
            Occupant::Pond => {
                if without_overflow {
                    return Err(CrashKind::InvalidWithoutOverflowTarget("into the pond"));
                }
                let amount = self.bucket(id)?.contents;
                self.offer_to_pond(amount, flags)?;
                self.bucket_mut(id)?.contents = 0;
            }
            occupant @ (Occupant::Depot | Occupant::Tap) => {
                return Err(CrashKind::InvalidTarget(format!(
                    "cannot empty a bucket into {occupant}"
                )));
            }
        }
        Ok(())
    }

    fn offer_to_pond(&mut self, amount: Centipints, flags: PendingFlags) -> OpResult<()> {
        if flags.scream_into_void {
            return Ok(());
        }
        if flags.speak_with_god {
            let pints = amount / CENTIPINTS_PER_PINT;
            if amount % CENTIPINTS_PER_PINT != 0 || pints > MAX_CHARACTER_PINTS {
                return Err(CrashKind::GodRejected(format!(
                    "{} pints is not a character",
                    format_pints(amount)
                )));
            }
            // `pints <= 127`, always a valid ASCII code point.
            let c = char::from(pints as u8);
            self.io.write_character(c)?;
            return Ok(());
        }
        self.io.write_pints(amount)?;
        Ok(())
    }

    fn shrink(&mut self) -> OpResult<()> {
        let id = self.held("shrink it")?;
        let bucket = self.bucket_mut(id)?;
        bucket.capacity = bucket.contents.div_ceil(CENTIPINTS_PER_PINT).max(1);
        Ok(())
    }
}

fn reject_behind(facing: RelativeFacing, action: &str) -> OpResult<()> {
    if facing == RelativeFacing::Behind {
        Err(CrashKind::InvalidTarget(format!("cannot {action} behind me")))
    } else {
        Ok(())
    }
}
