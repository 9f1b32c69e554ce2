//! Text-edit primitives for applying fixes to source code.
//!
//! Everything here works on strings and byte offsets; no I/O. Edits are
//! validated to be non-overlapping and in bounds, then applied in reverse
//! order so earlier offsets stay valid while splicing.

use thiserror::Error;

use crate::tree::ByteSpan;

/// Error type for edit application.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("overlapping edits detected at byte {0}")]
    OverlappingEdits(usize),

    #[error("edit range [{start}..{end}) exceeds source length {source_len}")]
    InvalidRange {
        start: usize,
        end: usize,
        source_len: usize,
    },

    #[error("edit start {start} is after edit end {end}")]
    InvalidEditOrder { start: usize, end: usize },
}

/// A single text replacement, addressed by byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: ByteSpan,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: ByteSpan, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Remove a range, inserting nothing.
    pub fn delete(span: ByteSpan) -> Self {
        Self::new(span, String::new())
    }

    /// Insert text at a position.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(ByteSpan::new(offset, offset), text)
    }

    /// Replace a range with new text.
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self::new(ByteSpan::new(start, end), replacement)
    }

    pub fn overlaps_with(&self, other: &TextEdit) -> bool {
        self.span.overlaps(other.span)
    }

    pub fn validate(&self, source_len: usize) -> Result<(), EditError> {
        if self.span.start > self.span.end {
            return Err(EditError::InvalidEditOrder {
                start: self.span.start,
                end: self.span.end,
            });
        }
        if self.span.end > source_len {
            return Err(EditError::InvalidRange {
                start: self.span.start,
                end: self.span.end,
                source_len,
            });
        }
        Ok(())
    }
}

/// Validate that a list of edits is in bounds and pairwise non-overlapping.
pub fn validate_edits(edits: &[TextEdit], source_len: usize) -> Result<(), EditError> {
    for edit in edits {
        edit.validate(source_len)?;
    }

    for i in 0..edits.len() {
        for j in (i + 1)..edits.len() {
            if edits[i].overlaps_with(&edits[j]) {
                return Err(EditError::OverlappingEdits(edits[i].span.start));
            }
        }
    }

    Ok(())
}

/// Apply a list of non-overlapping edits to source text.
///
/// Non-edited spans are reproduced verbatim. Edits may arrive in any order;
/// they are applied back-to-front so offsets computed against the original
/// text remain valid throughout.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    validate_edits(edits, source.len())?;

    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| {
        b.span
            .start
            .cmp(&a.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });

    let mut result = source.to_string();
    for edit in sorted {
        result.replace_range(edit.span.start..edit.span.end, &edit.replacement);
    }

    Ok(result)
}
