//! Variable declaration rules.

use crate::diagnostics::{Diagnostic, Fix};
use crate::fix::TextEdit;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{ByteSpan, Node, NodeKind};

use super::util::{identifiers_named, is_reassigned};

// ============================================================================
// PreferConstRule
// ============================================================================

pub struct PreferConstRule;

static PREFER_CONST: RuleDescriptor = RuleDescriptor::fixing(
    "variables.prefer-const",
    RuleCategory::Variables,
    Severity::Warning,
    60,
    "Bindings that are never reassigned should be `const`",
    "Replace the declaration keyword with `const`",
);

impl Rule for PreferConstRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &PREFER_CONST
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::VarDecl]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let keyword = node.attr_str("keyword")?;
        if keyword == "const" {
            return None;
        }
        // Loop headers reassign their counter; only statement declarations
        // qualify.
        let parent = ctx.parent()?;
        if !matches!(parent.kind(), NodeKind::Block | NodeKind::Unit) {
            return None;
        }
        // `let x;` without an initializer cannot become const.
        if node.children().is_empty() {
            return None;
        }

        let name = node.name()?;
        let scope = ctx.enclosing_function().unwrap_or_else(|| ctx.root());
        if is_reassigned(scope, name) {
            return None;
        }

        let keyword_span = ByteSpan::new(node.span().start, node.span().start + keyword.len());

        Some(
            Diagnostic::new(
                &PREFER_CONST,
                node.span(),
                format!("`{name}` is never reassigned; declare it with `const`"),
            )
            .with_fix(Fix::single(TextEdit::new(keyword_span, "const"))),
        )
    }
}

// ============================================================================
// NoVarRule
// ============================================================================

pub struct NoVarRule;

static NO_VAR: RuleDescriptor = RuleDescriptor::fixing(
    "variables.no-var",
    RuleCategory::Variables,
    Severity::Warning,
    65,
    "`var` hoists across blocks; block-scoped declarations are easier to reason about",
    "Replace `var` with `let`",
);

impl Rule for NoVarRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &NO_VAR
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::VarDecl]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        if node.attr_str("keyword") != Some("var") {
            return None;
        }
        let name = node.name()?;
        let keyword_span = ByteSpan::new(node.span().start, node.span().start + 3);

        // Runs after prefer-const on the same keyword span, so unreassigned
        // `var` bindings land on `const` and only the reassigned ones on `let`.
        Some(
            Diagnostic::new(
                &NO_VAR,
                node.span(),
                format!("`{name}` is declared with `var`; use a block-scoped declaration"),
            )
            .with_fix(Fix::single(TextEdit::new(keyword_span, "let"))),
        )
    }
}

// ============================================================================
// UnusedDeclarationRule
// ============================================================================

pub struct UnusedDeclarationRule;

static UNUSED_DECLARATION: RuleDescriptor = RuleDescriptor::reporting(
    "variables.unused-declaration",
    RuleCategory::Variables,
    Severity::Warning,
    "Bindings that are never read are dead weight",
);

impl Rule for UnusedDeclarationRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &UNUSED_DECLARATION
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::VarDecl]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let parent = ctx.parent()?;
        if !matches!(parent.kind(), NodeKind::Block | NodeKind::Unit) {
            return None;
        }

        let name = node.name()?;
        let scope = ctx.enclosing_function().unwrap_or_else(|| ctx.root());
        let read = identifiers_named(scope, name)
            .iter()
            .any(|id| !node.span().contains(id.span()));
        if read {
            return None;
        }

        // No fix: deleting the declaration would also delete whatever side
        // effects its initializer has.
        Some(Diagnostic::new(
            &UNUSED_DECLARATION,
            node.span(),
            format!("`{name}` is declared but never read"),
        ))
    }
}
