use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostics past this count are counted but not kept.
pub const MAX_ERRORS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Derived from the hundreds digit of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Header,
    Structure,
    Wellies,
}

/// `E` followed by a three digit number; see the associated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // E1xx: syntax errors
    pub const UNKNOWN_INSTRUCTION: Self = Self(100);
    pub const UNEXPECTED_CHARACTER: Self = Self(101);
    pub const NUMBER_TOO_LARGE: Self = Self(102);

    // E2xx: header errors
    pub const MISSING_LANDMARK: Self = Self(200);
    pub const LANDMARKS_OVERLAP: Self = Self(201);

    // E3xx: structure errors
    pub const TARGET_BEHIND: Self = Self(300);
    pub const WITHOUT_OVERFLOW_HERE: Self = Self(301);
    pub const ZERO_CAPACITY: Self = Self(302);

    // E4xx: wellies anomalies (warnings)
    pub const UNMATCHED_TAKE_OFF: Self = Self(400);

    pub fn category(self) -> ErrorCategory {
        match self.0 {
            200..=299 => ErrorCategory::Header,
            300..=399 => ErrorCategory::Structure,
            400..=499 => ErrorCategory::Wellies,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Header => write!(f, "header"),
            Self::Structure => write!(f, "structure"),
            Self::Wellies => write!(f, "wellies"),
        }
    }
}

/// A structured compile-time diagnostic.
///
/// Renderers (the CLI, JSON consumers) read the fields directly; they must
/// not parse the display string.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{span}: {code} [{category}] {message}")]
pub struct LeakyError {
    pub file: String,
    pub code: ErrorCode,
    pub severity: Severity,
    /// Derived from `code`.
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The offending source line, verbatim.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LeakyError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Downgrade this diagnostic to a warning.
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Diagnostics collected over one compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<LeakyError>,
    pub warnings: Vec<LeakyError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the [`MAX_ERRORS`] limit.
    pub fn push_error(&mut self, error: LeakyError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    pub fn push_warning(&mut self, warning: LeakyError) {
        self.warnings.push(warning.as_warning());
        self.total_warnings += 1;
    }

    /// Fold another stage's diagnostics into this one.
    pub fn extend(&mut self, other: CompileErrors) {
        // Errors dropped by the other stage's cap still count.
        self.total_errors += other.total_errors.saturating_sub(other.errors.len());
        for error in other.errors {
            self.push_error(error);
        }
        for warning in other.warnings {
            self.push_warning(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(code: ErrorCode) -> LeakyError {
        LeakyError::new(
            "prog.leaky",
            code,
            "cannot target the square behind me",
            Span::new(7, 1, 7, 36),
            "pick up the bucket behind me",
        )
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::UNKNOWN_INSTRUCTION.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::NUMBER_TOO_LARGE.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::MISSING_LANDMARK.category(), ErrorCategory::Header);
        assert_eq!(ErrorCode::TARGET_BEHIND.category(), ErrorCategory::Structure);
        assert_eq!(ErrorCode::UNMATCHED_TAKE_OFF.category(), ErrorCategory::Wellies);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::TARGET_BEHIND.to_string(), "E300");
        assert_eq!(ErrorCode::UNKNOWN_INSTRUCTION.to_string(), "E100");
    }

    #[test]
    fn test_error_display() {
        let err = sample(ErrorCode::TARGET_BEHIND);
        assert_eq!(
            err.to_string(),
            "7:1: E300 [structure] cannot target the square behind me"
        );
    }

    #[test]
    fn test_error_json_uses_flat_span() {
        let err = sample(ErrorCode::TARGET_BEHIND).with_suggestion("use 'to my left' instead");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"line\":7"));
        assert!(json.contains("\"column\":1"));
        assert!(json.contains("\"end_column\":36"));
        assert!(json.contains("\"category\":\"structure\""));
        assert!(json.contains("\"suggestion\""));

        let back: LeakyError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, err.code);
        assert_eq!(back.span, err.span);
    }

    #[test]
    fn test_compile_errors_max_limit() {
        let mut errs = CompileErrors::empty();
        for _ in 0..25 {
            errs.push_error(sample(ErrorCode::UNKNOWN_INSTRUCTION));
        }
        assert_eq!(errs.errors.len(), MAX_ERRORS);
        assert_eq!(errs.total_errors, 25);
        assert!(errs.has_errors());
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut errs = CompileErrors::empty();
        errs.push_warning(sample(ErrorCode::UNMATCHED_TAKE_OFF));
        assert!(!errs.has_errors());
        assert_eq!(errs.total_warnings, 1);
        assert_eq!(errs.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_extend_keeps_uncapped_totals() {
        let mut lexer = CompileErrors::empty();
        for _ in 0..22 {
            lexer.push_error(sample(ErrorCode::UNEXPECTED_CHARACTER));
        }
        let mut all = CompileErrors::empty();
        all.push_error(sample(ErrorCode::UNKNOWN_INSTRUCTION));
        all.extend(lexer);
        assert_eq!(all.errors.len(), MAX_ERRORS);
        assert_eq!(all.total_errors, 23);
    }
}
