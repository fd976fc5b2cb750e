//! Error taxonomy and diagnostic formatting.
//!
//! Load-time errors are synchronous results from the load operations.
//! Runtime errors are discovered during search and delivered through the
//! error channel, never thrown across the query call boundary. Syntax
//! errors carry a rendered ariadne report.

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::prelude::Simple;
use thiserror::Error;

use crate::host::Handle;
use crate::lexer::Token;
use crate::store::RULE_FILE_EXTENSION;

/// Failures reported synchronously by the load operations.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source `{0}` has already been loaded")]
    DuplicateSource(String),

    #[error("`{}` does not have the required `.{}` extension", .0.display(), RULE_FILE_EXTENSION)]
    InvalidExtension(PathBuf),

    #[error("rule file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error in `{source_id}`:\n{diagnostic}")]
    Syntax {
        source_id: String,
        diagnostic: String,
    },
}

/// Failures discovered during search, delivered on the error channel.
///
/// These arise from host callouts and from applying a rule body
/// operation to an incompatible term. Exhaustion without solutions is
/// not an error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("`{type_name}` does not support method `{method}`")]
    UnsupportedMethod { type_name: String, method: String },

    #[error("no registered host object for handle {0}")]
    UnknownObject(Handle),

    #[error("variable `{0}` is unbound in a callout receiver position")]
    UnboundVariable(String),

    #[error("method `{method}` on `{type_name}` expects {expected} arguments, got {got}")]
    ArityMismatch {
        type_name: String,
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("host error: {0}")]
    Host(String),
}

// ============================================================================
// Diagnostic rendering
// ============================================================================

/// Format lexer errors into a user-friendly string
pub fn format_lexer_errors(source: &str, errors: Vec<Simple<char>>) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = error.span();
        let report = Report::build(ReportKind::Error, (), span.start)
            .with_message("Lexical error")
            .with_label(
                Label::new(span.clone())
                    .with_message(format_lexer_error(&error))
                    .with_color(Color::Red),
            );

        report
            .finish()
            .write(Source::from(source), &mut output)
            .expect("Failed to write error report");
    }

    String::from_utf8(output).unwrap_or_else(|_| "Error formatting failed".to_string())
}

/// Format a single lexer error into a readable message
fn format_lexer_error(error: &Simple<char>) -> String {
    use chumsky::error::SimpleReason;

    if let SimpleReason::Custom(msg) = error.reason() {
        return msg.clone();
    }

    let found = error
        .found()
        .map(|c| format!("'{}'", c))
        .unwrap_or_else(|| "end of input".to_string());

    format!("Unexpected character {}", found)
}

/// Format parser errors into a user-friendly string
pub fn format_parser_errors(
    source: &str,
    errors: Vec<Simple<Token>>,
    token_spans: &[(Token, std::ops::Range<usize>)],
) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = error.span();

        // Spans from the token stream are already character positions;
        // spans produced at end-of-input fall past the last token and are
        // clamped to the source length.
        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);
        let char_span = if token_spans.is_empty() {
            0..0
        } else {
            start..end
        };

        let report = Report::build(ReportKind::Error, (), char_span.start)
            .with_message("Parse error")
            .with_label(
                Label::new(char_span.clone())
                    .with_message(format_parser_error(&error))
                    .with_color(Color::Red),
            );

        report
            .finish()
            .write(Source::from(source), &mut output)
            .expect("Failed to write error report");
    }

    String::from_utf8(output).unwrap_or_else(|_| "Error formatting failed".to_string())
}

/// Format a single parser error into a readable message
fn format_parser_error(error: &Simple<Token>) -> String {
    use chumsky::error::SimpleReason;

    if let SimpleReason::Custom(msg) = error.reason() {
        return msg.clone();
    }

    let found = error
        .found()
        .map(|t| format!("'{}'", t))
        .unwrap_or_else(|| "end of input".to_string());

    let expected: Vec<String> = error
        .expected()
        .filter_map(|opt| opt.as_ref())
        .map(|t| format!("'{}'", t))
        .collect();

    if expected.is_empty() {
        format!("Unexpected token {}", found)
    } else {
        format!(
            "Unexpected {}, expected one of: {}",
            found,
            expected.join(", ")
        )
    }
}
