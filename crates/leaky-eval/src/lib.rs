//! Leaky Bucket execution engine.
//!
//! Runs a parsed [`Program`] against an unbounded sparse grid: one agent,
//! leaking buckets, floor water that evaporates, and wellies that checkpoint
//! the agent so a slip on a wet floor can skip or rewind part of the program.
//!
//! ```text
//! Program → WellyMatchTable → Interpreter ⟲ (execute → tick: evaporate, leak) → IoPort
//! ```
//!
//! All state is ordered (`BTreeMap`, id-ordered arenas), so a program given
//! the same input always produces the same output and the same final world.
//!
//! [`Program`]: leaky_types::ast::Program

pub mod agent;
pub mod bucket;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod io;
mod physics;
pub mod snapshot;
pub mod wellies;
pub mod world;

pub use agent::{Agent, PendingFlags, WellyFrame, WelliesLedger};
pub use bucket::{Bucket, BucketId, BucketLocation, BucketStore};
pub use config::{ConfigError, EngineConfig, TICK_LIMIT_ENV};
pub use error::{Crash, CrashKind, EvalResult};
pub use interpreter::{Interpreter, RunSummary};
pub use io::{format_pints, BufferedIo, IoError, IoPort, Output, StdIo};
pub use snapshot::WorldSnapshot;
pub use wellies::{Slip, WellyMatchTable};
pub use world::{Centipints, Occupant, WorldGrid, CENTIPINTS_PER_PINT};
