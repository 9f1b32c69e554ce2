//! Error-handling rules.

use crate::diagnostics::Diagnostic;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{Node, NodeKind};

// ============================================================================
// IgnoredCatchRule
// ============================================================================

pub struct IgnoredCatchRule;

static IGNORED_CATCH: RuleDescriptor = RuleDescriptor::reporting(
    "errors.ignored-catch",
    RuleCategory::ErrorHandling,
    Severity::Error,
    "A caught error must be handled, logged, or rethrown, never swallowed",
);

impl Rule for IgnoredCatchRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &IGNORED_CATCH
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Catch]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let body = node.children().last()?;
        if body.kind() != NodeKind::Block {
            return None;
        }
        let swallows = body
            .children()
            .iter()
            .all(|c| c.kind() == NodeKind::Comment);
        if !swallows {
            return None;
        }

        Some(Diagnostic::new(
            &IGNORED_CATCH,
            node.span(),
            "caught error is silently dropped; handle it or rethrow",
        ))
    }
}

// ============================================================================
// ThrowLiteralRule
// ============================================================================

pub struct ThrowLiteralRule;

static THROW_LITERAL: RuleDescriptor = RuleDescriptor::reporting(
    "errors.throw-literal",
    RuleCategory::ErrorHandling,
    Severity::Warning,
    "Thrown values should be error objects carrying a stack, not bare literals",
);

impl Rule for ThrowLiteralRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &THROW_LITERAL
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Throw]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let thrown = node.child(0)?;
        if thrown.kind() != NodeKind::Literal {
            return None;
        }

        Some(Diagnostic::new(
            &THROW_LITERAL,
            node.span(),
            "bare literal thrown; wrap it in an error object",
        ))
    }
}
