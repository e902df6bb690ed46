//! Leaky Bucket parser: converts a word token stream into a [`Program`].
//!
//! [`Program`]: leaky_types::ast::Program

mod parse_header;
mod parse_instr;
mod parser;

pub use parser::{ParseResult, Parser};
