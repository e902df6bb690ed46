//! Token types for the Leaky Bucket lexer.
//!
//! The language is a fixed set of English phrases, so there are no keywords
//! at this level: every run of letters is a [`TokenKind::Word`] and the
//! parser matches phrases word by word.

use leaky_types::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is the given (lowercase) word.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w == word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A lowercased run of letters, e.g. `bucket`.
    Word(String),
    /// A non-negative integer literal.
    Number(u64),
    /// End of a non-blank line.
    Newline,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(w) => f.write_str(w),
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
