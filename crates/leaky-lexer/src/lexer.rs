//! Turns Leaky Bucket source into a flat stream of words, numbers and line ends.
//!
//! - Case-insensitive: words are lowercased.
//! - `--` starts a comment that runs to the end of the line.
//! - Blank and comment-only lines produce no tokens at all, so the parser
//!   sees exactly one `Newline` per statement.
//! - Error recovery: unexpected characters are reported and skipped, up to
//!   [`leaky_types::MAX_ERRORS`].

use leaky_types::{CompileErrors, ErrorCode, LeakyError, SourceFile, Span};

use crate::token::{Token, TokenKind};

pub struct Lexer<'src> {
    source: &'src [u8],
    source_file: &'src SourceFile,
    offset: usize,
    /// 1-based position of the next unread byte.
    line: u32,
    col: u32,
    errors: CompileErrors,
}

/// Everything the lexer produced, errors included.
pub struct LexResult {
    /// Terminated by a single [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            offset: 0,
            line: 1,
            col: 1,
            errors: CompileErrors::empty(),
        }
    }

    pub fn lex(mut self) -> LexResult {
        let mut tokens: Vec<Token> = Vec::new();

        loop {
            if self.errors.total_errors >= leaky_types::MAX_ERRORS {
                break;
            }

            self.skip_blank();
            let start_line = self.line;
            let start_col = self.col;

            let Some(ch) = self.current() else {
                break;
            };

            match ch {
                b'\n' => {
                    self.bump();
                    // Collapse blank lines: only terminate a line that had content.
                    if tokens
                        .last()
                        .is_some_and(|t| t.kind != TokenKind::Newline)
                    {
                        tokens.push(Token::new(
                            TokenKind::Newline,
                            Span::point(start_line, start_col),
                        ));
                    }
                }
                b'-' if self.lookahead(1) == Some(b'-') => self.skip_comment(),
                b'0'..=b'9' => {
                    if let Some(token) = self.scan_number() {
                        tokens.push(token);
                    }
                }
                b'a'..=b'z' | b'A'..=b'Z' => tokens.push(self.scan_word()),
                _ => {
                    self.bump();
                    let span = self.span_from(start_line, start_col);
                    self.report(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character '{}'", char::from(ch).escape_default()),
                        span,
                    );
                }
            }
        }

        if tokens.last().is_some_and(|t| t.kind != TokenKind::Newline) {
            tokens.push(Token::new(TokenKind::Newline, self.here()));
        }
        tokens.push(Token::new(TokenKind::Eof, self.here()));

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    fn current(&self) -> Option<u8> {
        self.source.get(self.offset).copied()
    }

    fn lookahead(&self, ahead: usize) -> Option<u8> {
        self.source.get(self.offset + ahead).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.source.get(self.offset).copied()?;
        self.offset += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn here(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn report(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        self.errors
            .push_error(LeakyError::new(&self.source_file.name, code, message, span, source_line));
    }

    /// Newlines are significant and stay put.
    fn skip_blank(&mut self) {
        while matches!(self.current(), Some(b' ' | b'\t' | b'\r')) {
            self.bump();
        }
    }

    fn skip_comment(&mut self) {
        while self.current().is_some_and(|ch| ch != b'\n') {
            self.bump();
        }
    }

    fn scan_word(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let mut word = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_alphabetic() || ch == b'\'' {
                word.push(char::from(ch.to_ascii_lowercase()));
                self.bump();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Word(word), self.span_from(start_line, start_col))
    }

    fn scan_number(&mut self) -> Option<Token> {
        let start_line = self.line;
        let start_col = self.col;
        let start = self.offset;
        while self.current().is_some_and(|ch| ch.is_ascii_digit()) {
            self.bump();
        }
        let span = self.span_from(start_line, start_col);
        let digits = String::from_utf8_lossy(&self.source[start..self.offset]);
        match digits.parse::<u64>() {
            Ok(n) => Some(Token::new(TokenKind::Number(n), span)),
            Err(_) => {
                self.report(
                    ErrorCode::NUMBER_TOO_LARGE,
                    format!("number '{digits}' is too large"),
                    span,
                );
                None
            }
        }
    }
}
