//! Runtime crash types for the Leaky Bucket engine.
//!
//! Every runtime failure is fatal: the program stops at the instruction that
//! crashed and nothing more is written to the output port.

use leaky_types::Span;
use thiserror::Error;

/// Why a program crashed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrashKind {
    /// Walked into an obstacle, or slipped with too few wellies on.
    #[error("fell over: {0}")]
    FellOver(String),
    /// Turned or put on wellies while holding a bucket.
    #[error("hands are full: {0}")]
    BucketHandsError(String),
    #[error("must be facing the {0}")]
    NotFacingRequiredLandmark(&'static str),
    #[error("not holding a bucket: {0}")]
    BucketNotHeld(String),
    #[error("already holding a bucket: {0}")]
    BucketAlreadyHeld(String),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("cannot empty {0} without overflow")]
    InvalidWithoutOverflowTarget(&'static str),
    #[error("god rejected the offering: {0}")]
    GodRejected(String),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The configured tick limit was reached.
    #[error("tick limit of {0} exceeded")]
    TickLimitExceeded(u64),
    #[error("i/o failure: {0}")]
    Io(String),
}

/// A crash, located at the instruction that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct Crash {
    pub kind: CrashKind,
    /// Index of the crashing instruction.
    pub index: usize,
    pub span: Span,
}

impl Crash {
    /// 1-based source line of the crashing instruction.
    pub fn line(&self) -> u32 {
        self.span.start_line
    }
}

/// Result alias for whole-instruction execution.
pub type EvalResult<T> = Result<T, Crash>;

/// Result alias for the primitive operations inside one instruction.
pub(crate) type OpResult<T> = Result<T, CrashKind>;
