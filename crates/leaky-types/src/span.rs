use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a token or statement sits in the source, 1-based.
///
/// Statements never cross a line break, but spans keep an end line anyway so
/// a phrase can be reported from its first word to its last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "line")]
    pub start_line: u32,
    #[serde(rename = "column")]
    pub start_col: u32,
    pub end_line: u32,
    #[serde(rename = "end_column")]
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Zero-width span, used for line ends and end of input.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        let (start_line, start_col) =
            (self.start_line, self.start_col).min((other.start_line, other.start_col));
        let (end_line, end_col) = (self.end_line, self.end_col).max((other.end_line, other.end_col));
        Span::new(start_line, start_col, end_line, end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A named program text with a line index, so diagnostics can quote the
/// offending line.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Line `line_number` (1-based) without its `\n` or `\r\n`.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
