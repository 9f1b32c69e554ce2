//! Rule-based style analysis and autofix engine.
//!
//! The crate consumes an already-built language-agnostic [`tree::Node`]
//! tree (the concrete grammar is an external collaborator), matches a
//! registry of style rules against it, applies non-conflicting fixes where
//! rules ship mechanical rewrites, and re-analyzes to a fixed point.

pub mod applier;
pub mod diagnostics;
pub mod error;
pub mod fix;
pub mod level;
pub mod rule;
pub mod rules;
pub mod telemetry;
pub mod tree;
pub mod walker;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use itertools::Itertools;

use crate::applier::{AppliedFix, SkippedFix, apply_fixes};
use crate::diagnostics::{Diagnostic, DiagnosticRecord};
use crate::error::{EngineError, EngineResult};
use crate::level::Severity;
use crate::rule::{RuleCategory, RuleDescriptor, RuleRegistry};
use crate::tree::{Node, validate_tree};

/// Terminal diagnostic: the fixed-point loop hit its iteration cap while
/// rules were still proposing fixes.
pub static FIX_DID_NOT_CONVERGE: RuleDescriptor = RuleDescriptor::reporting(
    "fix-did-not-converge",
    RuleCategory::Engine,
    Severity::Warning,
    "Fix application did not reach a fixed point within the iteration cap",
);

/// Terminal diagnostic: analysis was cancelled between iterations.
pub static ANALYSIS_CANCELLED: RuleDescriptor = RuleDescriptor::reporting(
    "analysis-cancelled",
    RuleCategory::Engine,
    Severity::Info,
    "Analysis stopped early on a cancellation signal or deadline",
);

/// Shareable cancellation signal checked between fixed-point iterations.
/// An in-flight iteration always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for the fixed-point driver.
#[derive(Debug, Clone)]
pub struct FixOptions {
    /// Maximum number of fix-applying passes before the loop gives up.
    pub iteration_cap: usize,
    pub cancel: Option<CancelFlag>,
    pub deadline: Option<Instant>,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            iteration_cap: 10,
            cancel: None,
            deadline: None,
        }
    }
}

/// Result of [`StyleEngine::analyze_and_fix`].
#[derive(Debug)]
pub struct FixReport {
    /// Text after the last applied pass (the input text when nothing fixed).
    pub final_text: String,
    /// Diagnostics of the final analysis pass, plus terminal markers.
    pub diagnostics: Vec<Diagnostic>,
    pub applied_fix_count: usize,
    /// Every fix applied across all passes, in application order.
    pub applied_fixes: Vec<AppliedFix>,
    /// Every fix proposed but withheld across all passes, with reasons.
    pub skipped_fixes: Vec<SkippedFix>,
    /// False when the iteration cap was hit or the run was cancelled.
    pub converged: bool,
    /// Number of passes that applied at least one fix.
    pub iterations: usize,
}

/// Orchestrates registry, walker and fix applier over one source unit.
pub struct StyleEngine {
    registry: RuleRegistry,
}

impl StyleEngine {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Mutable registry access for enable/disable and override calls.
    /// Borrowing rules serialize this against any in-flight analysis.
    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Run one detection pass over an externally built tree.
    ///
    /// Fails fast with [`EngineError::MalformedTree`] when the tree's span
    /// invariants do not hold; every downstream guarantee rests on them.
    pub fn analyze(&self, source: &str, root: &Node) -> EngineResult<Vec<Diagnostic>> {
        validate_tree(root, source.len()).map_err(EngineError::malformed_tree)?;
        Ok(walker::analyze_tree(source, root, &self.registry))
    }

    /// Detect, fix, and re-analyze to a fixed point with default options.
    ///
    /// `rebuild` is the external parse collaborator, invoked on the
    /// original text and again after every pass that changed it.
    pub fn analyze_and_fix(
        &self,
        source: &str,
        rebuild: impl Fn(&str) -> anyhow::Result<Node>,
    ) -> EngineResult<FixReport> {
        self.analyze_and_fix_with(source, rebuild, &FixOptions::default())
    }

    pub fn analyze_and_fix_with(
        &self,
        source: &str,
        rebuild: impl Fn(&str) -> anyhow::Result<Node>,
        options: &FixOptions,
    ) -> EngineResult<FixReport> {
        let mut text = source.to_string();
        let mut applied_fixes: Vec<AppliedFix> = Vec::new();
        let mut skipped_fixes: Vec<SkippedFix> = Vec::new();
        let mut iterations = 0usize;

        loop {
            let root = rebuild(&text).map_err(EngineError::Rebuild)?;
            let mut diagnostics = self.analyze(&text, &root)?;

            if interrupted(options) {
                diagnostics.push(Diagnostic::new(
                    &ANALYSIS_CANCELLED,
                    tree::ByteSpan::new(0, 0),
                    format!("analysis cancelled after {iterations} fix iterations"),
                ));
                return Ok(FixReport {
                    final_text: text,
                    diagnostics,
                    applied_fix_count: applied_fixes.len(),
                    applied_fixes,
                    skipped_fixes,
                    converged: false,
                    iterations,
                });
            }

            if iterations >= options.iteration_cap {
                let pending: Vec<&str> = diagnostics
                    .iter()
                    .filter(|d| d.fix.is_some())
                    .map(|d| d.rule.name)
                    .unique()
                    .sorted()
                    .collect();

                let converged = pending.is_empty();
                if !converged {
                    diagnostics.push(Diagnostic::new(
                        &FIX_DID_NOT_CONVERGE,
                        tree::ByteSpan::new(0, 0),
                        format!(
                            "fixes still proposed after {} iterations by: {}",
                            iterations,
                            pending.iter().join(", ")
                        ),
                    ));
                }
                return Ok(FixReport {
                    final_text: text,
                    diagnostics,
                    applied_fix_count: applied_fixes.len(),
                    applied_fixes,
                    skipped_fixes,
                    converged,
                    iterations,
                });
            }

            let outcome = apply_fixes(&text, &diagnostics)?;
            for skip in &outcome.skipped {
                tracing::trace!(rule = skip.rule, reason = skip.reason.as_str(), "fix withheld");
            }
            skipped_fixes.extend(outcome.skipped);

            if outcome.applied.is_empty() {
                return Ok(FixReport {
                    final_text: text,
                    diagnostics,
                    applied_fix_count: applied_fixes.len(),
                    applied_fixes,
                    skipped_fixes,
                    converged: true,
                    iterations,
                });
            }

            tracing::debug!(
                iteration = iterations + 1,
                applied = outcome.applied.len(),
                "fixed-point pass applied fixes"
            );

            applied_fixes.extend(outcome.applied);
            text = outcome.text;
            iterations += 1;
        }
    }
}

fn interrupted(options: &FixOptions) -> bool {
    if let Some(flag) = &options.cancel {
        if flag.is_cancelled() {
            return true;
        }
    }
    if let Some(deadline) = options.deadline {
        if Instant::now() >= deadline {
            return true;
        }
    }
    false
}

/// Render diagnostics in the external output shape, marking the ones whose
/// fix was applied in the given pass.
pub fn diagnostic_records(
    source: &str,
    diagnostics: &[Diagnostic],
    applied: &[AppliedFix],
) -> Vec<DiagnosticRecord> {
    diagnostics
        .iter()
        .map(|diag| {
            let fixed = diag.fix.as_ref().is_some_and(|fix| {
                applied
                    .iter()
                    .any(|a| a.rule == diag.rule.name && a.span == fix.envelope())
            });
            DiagnosticRecord::from_diagnostic(diag, source, fixed)
        })
        .collect()
}

/// Construct a [`StyleEngine`] with the whole built-in catalog enabled.
pub fn create_default_engine() -> StyleEngine {
    StyleEngine::new(RuleRegistry::default_rules())
}
