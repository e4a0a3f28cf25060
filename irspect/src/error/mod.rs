//! Error types and issue reporting
//!
//! `SpecError` covers the CLI boundary only (unreadable or malformed IR
//! files). The validation core itself never returns `Err`; its findings are
//! `SemanticIssue`s rendered here with ariadne over a listing of the IR's
//! effect clauses.

use thiserror::Error;

use crate::ir::IntermediateRepresentation;
use crate::issue::{SemanticIssue, Severity};

/// Result type alias
pub type Result<T> = std::result::Result<T, SpecError>;

/// Boundary error: loading an IR from disk
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("IO error: {message}")]
    Io { message: String },

    #[error("JSON error: {message}")]
    Json { message: String },

    #[error("Schema error: {message}")]
    Schema { message: String },
}

impl SpecError {
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn json_error(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    pub fn schema_error(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SpecError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for SpecError {
    fn from(err: serde_json::Error) -> Self {
        Self::json_error(err.to_string())
    }
}

/// The effect clauses as a newline-separated listing. Reports are rendered
/// against this synthetic source, one clause per line.
pub fn effect_listing(ir: &IntermediateRepresentation) -> String {
    ir.effects
        .iter()
        .map(|e| e.description.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte span of effect `index` within `effect_listing`'s output
fn effect_span(ir: &IntermediateRepresentation, index: usize) -> std::ops::Range<usize> {
    let mut offset = 0;
    for (i, effect) in ir.effects.iter().enumerate() {
        let len = effect.description.len();
        if i == index {
            return offset..offset + len;
        }
        offset += len + 1; // newline
    }
    0..0
}

/// Report issues with ariadne
pub fn report_issues(filename: &str, ir: &IntermediateRepresentation, issues: &[SemanticIssue]) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let listing = effect_listing(ir);

    for issue in issues {
        let (kind, color) = match issue.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };
        let span = issue
            .effect_index
            .map(|i| effect_span(ir, i))
            .unwrap_or(0..0);

        let mut report = Report::build(kind, (filename, span.clone()))
            .with_message(format!("[{}] {}", issue.category, issue.message));
        if span != (0..0) {
            report = report.with_label(
                Label::new((filename, span))
                    .with_message(&issue.message)
                    .with_color(color),
            );
        }
        if let Some(suggestion) = &issue.suggestion {
            report = report.with_help(suggestion);
        }
        report
            .finish()
            .print((filename, Source::from(listing.as_str())))
            .unwrap();
    }
}
