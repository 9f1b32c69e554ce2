//! Diagnostic and fix value types, plus the serializable output shape
//! consumed by reporting collaborators.

use serde::Serialize;

use crate::fix::TextEdit;
use crate::level::Severity;
use crate::rule::RuleDescriptor;
use crate::tree::ByteSpan;

/// A single located finding produced by a rule.
#[derive(Debug, Clone)]
#[must_use]
pub struct Diagnostic {
    pub rule: &'static RuleDescriptor,
    pub severity: Severity,
    pub span: ByteSpan,
    pub message: String,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Diagnostic carrying the rule's default severity and no fix. The
    /// walker re-stamps severity from registry overrides afterwards.
    pub fn new(rule: &'static RuleDescriptor, span: ByteSpan, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.severity,
            span,
            message: message.into(),
            fix: None,
        }
    }

    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// A proposed text transformation: an ordered set of edits applied
/// atomically. Edits within one fix must not overlap each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub edits: Vec<TextEdit>,
}

impl Fix {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }

    pub fn single(edit: TextEdit) -> Self {
        Self { edits: vec![edit] }
    }

    /// Smallest span covering every edit. Used for reporting; conflict
    /// resolution compares individual edits, not envelopes.
    pub fn envelope(&self) -> ByteSpan {
        let start = self.edits.iter().map(|e| e.span.start).min().unwrap_or(0);
        let end = self.edits.iter().map(|e| e.span.end).max().unwrap_or(start);
        ByteSpan::new(start, end)
    }
}

/// 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Compute the 1-based line/column of a byte offset.
pub fn position_at(source: &str, byte_offset: usize) -> Position {
    let mut line = 1usize;
    let mut column = 1usize;

    let end = byte_offset.min(source.len());
    for b in source.as_bytes().iter().take(end) {
        if *b == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    Position { line, column }
}

/// Line/column span in the external output shape.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSpan {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

/// The diagnostic shape handed to reporting collaborators: rule id,
/// severity, message, a line/column span, and whether the attached fix was
/// applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    pub rule_id: &'static str,
    pub severity: Severity,
    pub message: String,
    pub span: RecordSpan,
    pub fixed: bool,
}

impl DiagnosticRecord {
    pub fn from_diagnostic(diag: &Diagnostic, source: &str, fixed: bool) -> Self {
        let start = position_at(source, diag.span.start);
        let end = position_at(source, diag.span.end);
        Self {
            rule_id: diag.rule.name,
            severity: diag.severity,
            message: diag.message.clone(),
            span: RecordSpan {
                start_line: start.line,
                start_col: start.column,
                end_line: end.line,
                end_col: end.column,
            },
            fixed,
        }
    }
}
