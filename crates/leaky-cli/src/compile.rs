//! Source file → `Program`, with diagnostics from every stage.

use anyhow::{Context, Result};
use leaky_lexer::Lexer;
use leaky_types::ast::Program;
use leaky_types::{CompileErrors, LeakyError, SourceFile};
use std::path::Path;

pub struct Compiled {
    /// `None` when any stage reported an error.
    pub program: Option<Program>,
    pub diagnostics: CompileErrors,
}

pub fn compile_file(path: &Path) -> Result<Compiled> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(compile_source(&path.display().to_string(), &source))
}

pub fn compile_source(name: &str, source: &str) -> Compiled {
    let sf = SourceFile::new(name, source);
    let lex = Lexer::new(&sf).lex();
    let mut diagnostics = lex.errors;
    if diagnostics.has_errors() {
        return Compiled {
            program: None,
            diagnostics,
        };
    }

    let parsed = leaky_parser::Parser::new(lex.tokens, &sf).parse();
    diagnostics.extend(parsed.errors);
    Compiled {
        program: parsed.program.filter(|_| !diagnostics.has_errors()),
        diagnostics,
    }
}

/// `file:line:col: E### [category] message`, then the offending line.
pub fn render(diagnostic: &LeakyError) -> String {
    let mut out = format!("{}:{diagnostic}", diagnostic.file);
    if !diagnostic.source_line.is_empty() {
        out.push_str("\n    ");
        out.push_str(diagnostic.source_line.trim_end());
    }
    if let Some(suggestion) = &diagnostic.suggestion {
        out.push_str("\n    help: ");
        out.push_str(suggestion);
    }
    out
}

/// Print warnings then errors to stderr, with a count of anything dropped.
pub fn report(diagnostics: &CompileErrors) {
    for warning in &diagnostics.warnings {
        eprintln!("warning: {}", render(warning));
    }
    for error in &diagnostics.errors {
        eprintln!("error: {}", render(error));
    }
    let hidden = diagnostics.total_errors.saturating_sub(diagnostics.errors.len());
    if hidden > 0 {
        eprintln!("... and {hidden} more errors");
    }
}
