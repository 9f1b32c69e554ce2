//! Resolves conflicts among proposed fixes and applies the survivors.
//!
//! Diagnostics arrive already sorted by (span start, rule priority, rule
//! id); walking them in that order and accepting the first non-conflicting
//! fix makes the outcome deterministic. A fix is atomic: its edits apply
//! together or the whole fix is recorded as skipped.

use crate::diagnostics::Diagnostic;
use crate::fix::{EditError, TextEdit, apply_edits, validate_edits};
use crate::tree::ByteSpan;

/// Why a proposed fix was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// An edit overlaps an already-accepted fix's edit.
    Conflict,
    /// The fix's own edits are empty, out of bounds, or self-overlapping.
    InvalidEdits,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Conflict => "skipped-due-to-conflict",
            SkipReason::InvalidEdits => "invalid-edits",
        }
    }
}

/// Identity of a fix that made it into the output text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    pub rule: &'static str,
    pub span: ByteSpan,
}

/// Identity of a fix that was proposed but withheld, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFix {
    pub rule: &'static str,
    pub span: ByteSpan,
    pub reason: SkipReason,
}

/// Result of one fix-application pass.
#[derive(Debug)]
pub struct FixOutcome {
    pub text: String,
    pub applied: Vec<AppliedFix>,
    pub skipped: Vec<SkippedFix>,
}

/// Apply the fixes attached to `diagnostics` to `source`.
///
/// Accepts fixes left to right in diagnostic order; a fix is accepted iff
/// none of its edits overlaps any already-accepted edit
/// (first-accepted-wins). Every proposed fix ends up in exactly one of
/// `applied` or `skipped`; nothing is dropped silently.
pub fn apply_fixes(source: &str, diagnostics: &[Diagnostic]) -> Result<FixOutcome, EditError> {
    let mut accepted_edits: Vec<TextEdit> = Vec::new();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    for diag in diagnostics {
        let Some(fix) = &diag.fix else {
            continue;
        };

        if fix.edits.is_empty() || validate_edits(&fix.edits, source.len()).is_err() {
            skipped.push(SkippedFix {
                rule: diag.rule.name,
                span: fix.envelope(),
                reason: SkipReason::InvalidEdits,
            });
            continue;
        }

        let conflicts = fix
            .edits
            .iter()
            .any(|edit| accepted_edits.iter().any(|a| a.overlaps_with(edit)));
        if conflicts {
            skipped.push(SkippedFix {
                rule: diag.rule.name,
                span: fix.envelope(),
                reason: SkipReason::Conflict,
            });
            continue;
        }

        accepted_edits.extend(fix.edits.iter().cloned());
        applied.push(AppliedFix {
            rule: diag.rule.name,
            span: fix.envelope(),
        });
    }

    let text = apply_edits(source, &accepted_edits)?;

    Ok(FixOutcome {
        text,
        applied,
        skipped,
    })
}
