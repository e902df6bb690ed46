//! The input/output port a running program talks to.
//!
//! Programs read from god (`let god fill ...`, `hear from god`) and write to
//! the pond. [`StdIo`] wires the port to the process streams; [`BufferedIo`]
//! scripts the input and records every write, for tests and embedding.

use crate::error::CrashKind;
use crate::world::{Centipints, CENTIPINTS_PER_PINT};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("expected {expected}, got {got:?}")]
    Malformed { expected: &'static str, got: String },
    #[error("input exhausted")]
    Exhausted,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<IoError> for CrashKind {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => CrashKind::Io(e.to_string()),
            other => CrashKind::MalformedInput(other.to_string()),
        }
    }
}

pub trait IoPort {
    /// Read a non-negative whole number of pints.
    fn read_integer(&mut self) -> IoResult<u64>;

    /// Read the next character of input, which must be ASCII. Line breaks
    /// are skipped.
    fn read_character(&mut self) -> IoResult<char>;

    /// Write a quantity emptied into the pond.
    fn write_pints(&mut self, amount: Centipints) -> IoResult<()>;

    fn write_character(&mut self, c: char) -> IoResult<()>;
}

/// Render centipints as pints, exact and without trailing zeros:
/// `500` → `5`, `525` → `5.25`, `50` → `0.5`.
pub fn format_pints(amount: Centipints) -> String {
    let whole = amount / CENTIPINTS_PER_PINT;
    let frac = amount % CENTIPINTS_PER_PINT;
    if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{whole}.{}", frac / 10)
    } else {
        format!("{whole}.{frac:02}")
    }
}

fn ascii_only(c: char) -> IoResult<char> {
    if c.is_ascii() {
        Ok(c)
    } else {
        Err(IoError::Malformed {
            expected: "an ASCII character",
            got: c.to_string(),
        })
    }
}

fn parse_integer(line: &str) -> IoResult<u64> {
    let trimmed = line.trim();
    trimmed.parse::<u64>().map_err(|_| IoError::Malformed {
        expected: "a whole number of pints",
        got: trimmed.to_string(),
    })
}

// ── Process streams ──────────────────────────────────────────────────────────

/// Reads from stdin and writes one line per output to stdout.
pub struct StdIo<R = io::StdinLock<'static>, W = io::Stdout> {
    reader: R,
    writer: W,
    /// Unconsumed characters of the last line read by `read_character`.
    line_buffer: VecDeque<char>,
}

impl StdIo {
    pub fn new() -> Self {
        Self::from_parts(io::stdin().lock(), io::stdout())
    }
}

impl Default for StdIo {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdIo<R, W> {
    pub fn from_parts(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            line_buffer: VecDeque::new(),
        }
    }

    fn read_line(&mut self) -> IoResult<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(IoError::Exhausted);
        }
        Ok(line)
    }

    fn write_line(&mut self, text: &str) -> IoResult<()> {
        writeln!(self.writer, "{text}")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> IoPort for StdIo<R, W> {
    fn read_integer(&mut self) -> IoResult<u64> {
        // Whatever `read_character` left of a line is a line of its own.
        let rest: String = self.line_buffer.drain(..).collect();
        if !rest.trim().is_empty() {
            return parse_integer(&rest);
        }
        let line = self.read_line()?;
        parse_integer(&line)
    }

    fn read_character(&mut self) -> IoResult<char> {
        loop {
            if let Some(c) = self.line_buffer.pop_front() {
                if c != '\n' && c != '\r' {
                    return ascii_only(c);
                }
                continue;
            }
            let line = self.read_line()?;
            self.line_buffer.extend(line.chars());
        }
    }

    fn write_pints(&mut self, amount: Centipints) -> IoResult<()> {
        self.write_line(&format_pints(amount))
    }

    fn write_character(&mut self, c: char) -> IoResult<()> {
        self.write_line(&c.to_string())
    }
}

// ── In-memory port ───────────────────────────────────────────────────────────

/// One write to the pond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Pints(Centipints),
    Character(char),
}

/// A port with scripted input lines and captured output.
#[derive(Debug, Clone, Default)]
pub struct BufferedIo {
    input: VecDeque<char>,
    output: Vec<Output>,
    /// Set once `read_character` has consumed part of a line.
    mid_line: bool,
}

impl BufferedIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input is consumed line by line for integers and char by char for
    /// characters, exactly as from stdin.
    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            ..Self::default()
        }
    }

    pub fn outputs(&self) -> &[Output] {
        &self.output
    }

    /// Everything written, rendered the way [`StdIo`] would print it.
    pub fn rendered(&self) -> String {
        let mut out = String::new();
        for entry in &self.output {
            match entry {
                Output::Pints(amount) => out.push_str(&format_pints(*amount)),
                Output::Character(c) => out.push(*c),
            }
            out.push('\n');
        }
        out
    }
}

impl BufferedIo {
    fn next_line(&mut self) -> Option<String> {
        if self.input.is_empty() {
            return None;
        }
        let mut line = String::new();
        while let Some(c) = self.input.pop_front() {
            if c == '\n' {
                break;
            }
            line.push(c);
        }
        Some(line)
    }
}

impl IoPort for BufferedIo {
    fn read_integer(&mut self) -> IoResult<u64> {
        if std::mem::take(&mut self.mid_line) {
            if let Some(rest) = self.next_line().filter(|l| !l.trim().is_empty()) {
                return parse_integer(&rest);
            }
        }
        let line = self.next_line().ok_or(IoError::Exhausted)?;
        parse_integer(&line)
    }

    fn read_character(&mut self) -> IoResult<char> {
        while let Some(c) = self.input.pop_front() {
            if c != '\n' && c != '\r' {
                self.mid_line = true;
                return ascii_only(c);
            }
            self.mid_line = false;
        }
        Err(IoError::Exhausted)
    }

    fn write_pints(&mut self, amount: Centipints) -> IoResult<()> {
        self.output.push(Output::Pints(amount));
        Ok(())
    }

    fn write_character(&mut self, c: char) -> IoResult<()> {
        self.output.push(Output::Character(c));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pints_is_exact() {
        assert_eq!(format_pints(0), "0");
        assert_eq!(format_pints(500), "5");
        assert_eq!(format_pints(525), "5.25");
        assert_eq!(format_pints(50), "0.5");
        assert_eq!(format_pints(1), "0.01");
        assert_eq!(format_pints(499), "4.99");
        assert_eq!(format_pints(12_310), "123.1");
    }

    #[test]
    fn test_buffered_reads_lines_and_characters() {
        let mut io = BufferedIo::with_input("12\nhi\n -3\n");
        assert_eq!(io.read_integer().unwrap(), 12);
        assert_eq!(io.read_character().unwrap(), 'h');
        assert_eq!(io.read_character().unwrap(), 'i');
        assert!(matches!(io.read_integer(), Err(IoError::Malformed { .. })));
        assert!(matches!(io.read_character(), Err(IoError::Exhausted)));
        assert!(matches!(io.read_integer(), Err(IoError::Exhausted)));
    }

    #[test]
    fn test_read_character_rejects_non_ascii() {
        let mut io = BufferedIo::with_input("é");
        assert!(matches!(
            io.read_character(),
            Err(IoError::Malformed { expected: "an ASCII character", .. })
        ));

        let input: &[u8] = "\u{e9}z\n".as_bytes();
        let mut io = StdIo::from_parts(input, Vec::new());
        assert!(matches!(io.read_character(), Err(IoError::Malformed { .. })));
        assert_eq!(io.read_character().unwrap(), 'z');
    }

    #[test]
    fn test_buffered_captures_output() {
        let mut io = BufferedIo::new();
        io.write_pints(525).unwrap();
        io.write_character('A').unwrap();
        assert_eq!(io.outputs(), &[Output::Pints(525), Output::Character('A')]);
        assert_eq!(io.rendered(), "5.25\nA\n");
    }

    #[test]
    fn test_std_io_over_in_memory_streams() {
        let input: &[u8] = b"7\nab\n";
        let mut io = StdIo::from_parts(input, Vec::new());
        assert_eq!(io.read_integer().unwrap(), 7);
        assert_eq!(io.read_character().unwrap(), 'a');
        assert_eq!(io.read_character().unwrap(), 'b');
        assert!(matches!(io.read_character(), Err(IoError::Exhausted)));

        io.write_pints(50).unwrap();
        io.write_character('!').unwrap();
        assert_eq!(String::from_utf8(io.writer).unwrap(), "0.5\n!\n");
    }
}
