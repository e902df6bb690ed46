//! Core parser infrastructure: token cursor, phrase matching, error reporting.

use leaky_lexer::token::{Token, TokenKind};
use leaky_types::ast::Program;
use leaky_types::{CompileErrors, ErrorCode, LeakyError, RelativeFacing, SourceFile, Span};

/// The Leaky Bucket parser.
///
/// Every statement is one line. The parser matches each line against the
/// fixed phrase templates, reports lines that match none of them, and
/// resumes at the next line.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    source_file: &'src SourceFile,
    errors: CompileErrors,
}

/// Result of parsing. `program` is `None` whenever `errors` holds an error.
pub struct ParseResult {
    pub program: Option<Program>,
    pub errors: CompileErrors,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        // The lexer guarantees a trailing Eof, so the last token is a safe fallback.
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or(Span::point(1, 1))
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Returns `true` if the current token ends a statement.
    pub(crate) fn at_line_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof)
    }

    // ── Phrase Matching ───────────────────────────────────────────────────────

    /// If the current token is `word`, advance and return `true`.
    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.peek().is_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the whole sequence of words or nothing.
    pub(crate) fn eat_words(&mut self, words: &[&str]) -> bool {
        let start = self.pos;
        if words.iter().all(|w| self.eat_word(w)) {
            true
        } else {
            self.pos = start;
            false
        }
    }

    /// Consume one of several alternative word sequences, returning the
    /// index of the alternative that matched.
    pub(crate) fn eat_any(&mut self, alternatives: &[&[&str]]) -> Option<usize> {
        alternatives.iter().position(|words| self.eat_words(words))
    }

    pub(crate) fn eat_number(&mut self) -> Option<u64> {
        match self.peek().kind {
            TokenKind::Number(n) => {
                self.advance();
                Some(n)
            }
            _ => None,
        }
    }

    /// `in front of me` | `to my right` | `behind me` | `to my left`
    pub(crate) fn eat_facing(&mut self) -> Option<RelativeFacing> {
        const FACINGS: [(&[&str], RelativeFacing); 4] = [
            (&["in", "front", "of", "me"], RelativeFacing::Front),
            (&["to", "my", "right"], RelativeFacing::Right),
            (&["behind", "me"], RelativeFacing::Behind),
            (&["to", "my", "left"], RelativeFacing::Left),
        ];
        FACINGS
            .iter()
            .find(|(words, _)| self.eat_words(words))
            .map(|(_, facing)| *facing)
    }

    /// Run a template; if it fails or leaves words before the end of the
    /// line, rewind so the next template sees the statement untouched.
    pub(crate) fn attempt<T>(&mut self, template: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        match template(self) {
            Some(value) if self.at_line_end() => Some(value),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    // ── Statement Boundaries ─────────────────────────────────────────────────

    /// Span covering every token from the current one to the end of the line.
    pub(crate) fn statement_span(&self) -> Span {
        let start = self.current_span();
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .take_while(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
            .fold(start, |span, t| span.merge(t.span))
    }

    /// Skip the rest of the current statement, including its newline.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
        self.eat_newline();
    }

    pub(crate) fn eat_newline(&mut self) {
        if self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.diagnostic(code, message, span);
        self.errors.push_error(error);
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let error = self.diagnostic(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(error);
    }

    pub(crate) fn warning_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let warning = self.diagnostic(code, message, span);
        self.errors.push_warning(warning);
    }

    fn diagnostic(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> LeakyError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        LeakyError::new(&self.source_file.name, code, message, span, source_line)
    }

    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.total_errors >= leaky_types::MAX_ERRORS
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`Program`].
    pub fn parse(mut self) -> ParseResult {
        let landmarks = self.parse_header();
        let instructions = self.parse_instructions();
        self.check_wellies_balance(&instructions);

        let program = match landmarks {
            Some(landmarks) if !self.errors.has_errors() => Some(Program {
                landmarks,
                instructions,
            }),
            _ => None,
        };
        ParseResult {
            program,
            errors: self.errors,
        }
    }
}

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span {
        start_line: 1,
        start_col: 1,
        end_line: 1,
        end_col: 1,
    },
};
