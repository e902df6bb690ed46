//! Shared types for the Leaky Bucket toolchain.
//!
//! This crate defines the instruction sequence handed from the parser to the
//! engine, grid geometry, source spans, and compile-time diagnostics.

mod error;
mod span;
pub mod ast;
pub mod grid;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, LeakyError, Severity, MAX_ERRORS};
pub use grid::{Coord, Direction, RelativeFacing, Turn};
pub use span::{SourceFile, Span};
