use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::fix::EditError;

/// Result alias for errors emitted by the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured error type for the analysis engine.
///
/// Only structural-input problems are hard failures; rule faults, fix
/// conflicts and non-convergence are surfaced as diagnostics instead (they
/// are recoverable outcomes, not errors).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input tree violates the span invariants the engine relies on.
    #[error("malformed tree: {detail}")]
    MalformedTree { detail: String },

    /// A registry operation referenced a rule id that is not registered.
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// The external tree-rebuild collaborator failed on fixed text.
    #[error("tree rebuild failed: {0}")]
    Rebuild(#[source] AnyhowError),

    /// Accepted edits could not be spliced into the source text.
    #[error("fix application failed: {0}")]
    FixApplication(#[from] EditError),
}

impl EngineError {
    pub fn malformed_tree(detail: impl Into<String>) -> Self {
        Self::MalformedTree {
            detail: detail.into(),
        }
    }
}
