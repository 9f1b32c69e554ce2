//! Conditional-hygiene rules: negated predicates, condition complexity,
//! boolean comparisons, nesting depth.

use crate::diagnostics::{Diagnostic, Fix};
use crate::fix::TextEdit;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{ByteSpan, Node, NodeKind};

use super::util::{
    call_callee, calls_to, compact_ws, functions_named, identifiers_named, strip_negation,
};

// ============================================================================
// NegativePredicateRule
// ============================================================================

pub struct NegativePredicateRule;

static NEGATIVE_PREDICATE: RuleDescriptor = RuleDescriptor::fixing(
    "conditionals.negative-predicate",
    RuleCategory::Conditionals,
    Severity::Warning,
    45,
    "Negating a negatively-named predicate reads as a double negative",
    "Flip the predicate name to its positive form and drop the outer negation",
);

impl Rule for NegativePredicateRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &NEGATIVE_PREDICATE
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Unary]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        if node.attr_str("operator") != Some("!") {
            return None;
        }
        let operand = node.child(0)?;
        if operand.kind() != NodeKind::Call {
            return None;
        }
        let callee = call_callee(operand)?;
        if callee.kind() != NodeKind::Identifier {
            return None;
        }
        let negative = callee.name()?;
        let positive = strip_negation(negative)?;

        let mut diagnostic = Diagnostic::new(
            &NEGATIVE_PREDICATE,
            node.span(),
            format!("`!{negative}(...)` is a double negative; express it as `{positive}(...)`"),
        );

        if let Some(fix) = build_flip_fix(node, operand, callee, negative, &positive, ctx) {
            diagnostic = diagnostic.with_fix(fix);
        }

        Some(diagnostic)
    }
}

/// The flip rewrites the call site and the in-unit declaration together.
/// It is withheld unless the declaration is unique with a single-return
/// body, this call is the name's only use, and the positive name is free.
fn build_flip_fix(
    node: &Node,
    operand: &Node,
    callee: &Node,
    negative: &str,
    positive: &str,
    ctx: &RuleContext<'_>,
) -> Option<Fix> {
    let root = ctx.root();

    let decls = functions_named(root, negative);
    let calls = calls_to(root, negative);
    if decls.len() != 1 || calls.len() != 1 {
        return None;
    }
    if calls[0].span() != operand.span() {
        return None;
    }
    if !functions_named(root, positive).is_empty() || !identifiers_named(root, positive).is_empty()
    {
        return None;
    }

    let decl = decls[0];
    let decl_name = decl.child(0)?;
    if decl_name.kind() != NodeKind::Identifier {
        return None;
    }

    let body = decl.children().last()?;
    if body.kind() != NodeKind::Block {
        return None;
    }
    let stmts: Vec<&Node> = body
        .children()
        .iter()
        .filter(|c| c.kind() != NodeKind::Comment)
        .collect();
    if stmts.len() != 1 || stmts[0].kind() != NodeKind::Return {
        return None;
    }
    let returned = stmts[0].child(0)?;

    let flipped = if returned.kind() == NodeKind::Unary
        && returned.attr_str("operator") == Some("!")
    {
        ctx.slice(returned.child(0)?).to_string()
    } else {
        format!("!({})", ctx.slice(returned))
    };

    Some(Fix::new(vec![
        TextEdit::delete(ByteSpan::new(node.span().start, operand.span().start)),
        TextEdit::new(callee.span(), positive.to_string()),
        TextEdit::new(decl_name.span(), positive.to_string()),
        TextEdit::new(returned.span(), flipped),
    ]))
}

// ============================================================================
// EncapsulateConditionRule
// ============================================================================

pub struct EncapsulateConditionRule;

static ENCAPSULATE_CONDITION: RuleDescriptor = RuleDescriptor::reporting(
    "conditionals.encapsulate-condition",
    RuleCategory::Conditionals,
    Severity::Info,
    "Compound conditions deserve a name",
);

impl Rule for EncapsulateConditionRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &ENCAPSULATE_CONDITION
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::If]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let condition = node.child(0)?;

        let mut logical_ops = 0usize;
        condition.walk(&mut |n| {
            if n.kind() == NodeKind::Binary
                && matches!(n.attr_str("operator"), Some("&&") | Some("||"))
            {
                logical_ops += 1;
            }
        });

        if logical_ops < 2 {
            return None;
        }

        Some(Diagnostic::new(
            &ENCAPSULATE_CONDITION,
            condition.span(),
            "compound condition; extract it into a well-named predicate",
        ))
    }
}

// ============================================================================
// BooleanComparisonRule
// ============================================================================

pub struct BooleanComparisonRule;

static BOOLEAN_COMPARISON: RuleDescriptor = RuleDescriptor::fixing(
    "conditionals.boolean-comparison",
    RuleCategory::Conditionals,
    Severity::Warning,
    50,
    "Comparing against a boolean literal is redundant",
    "Use the expression directly, negated when compared to `false`",
);

impl Rule for BooleanComparisonRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &BOOLEAN_COMPARISON
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Binary]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let flip = match node.attr_str("operator")? {
            "==" | "===" => false,
            "!=" | "!==" => true,
            _ => return None,
        };

        let lhs = node.child(0)?;
        let rhs = node.child(1)?;
        let (literal, other) = if is_bool_literal(rhs) {
            (rhs, lhs)
        } else if is_bool_literal(lhs) {
            (lhs, rhs)
        } else {
            return None;
        };
        if is_bool_literal(other) {
            // `true == false` is a constant, not a style problem we rewrite.
            return None;
        }

        let truthy = literal.attr_str("value") == Some("true");
        let keep = truthy != flip;
        let other_text = ctx.slice(other);
        let replacement = if keep {
            other_text.to_string()
        } else if other.kind() == NodeKind::Identifier {
            format!("!{other_text}")
        } else {
            format!("!({other_text})")
        };

        Some(
            Diagnostic::new(
                &BOOLEAN_COMPARISON,
                node.span(),
                format!("`{}` compares against a boolean literal", ctx.slice(node)),
            )
            .with_fix(Fix::single(TextEdit::new(node.span(), replacement))),
        )
    }
}

fn is_bool_literal(node: &Node) -> bool {
    node.kind() == NodeKind::Literal && node.attr_str("kind") == Some("bool")
}

// ============================================================================
// MaxNestingRule
// ============================================================================

pub struct MaxNestingRule;

static MAX_NESTING: RuleDescriptor = RuleDescriptor::reporting(
    "conditionals.max-nesting",
    RuleCategory::Conditionals,
    Severity::Info,
    "Deeply nested control flow should be flattened or extracted",
);

/// Depth at which one more branch tips the function over.
const NESTING_LIMIT: usize = 3;

impl Rule for MaxNestingRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &MAX_NESTING
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::If, NodeKind::For, NodeKind::ForEach, NodeKind::While]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        // Fire exactly at the limit so one offending region reports once,
        // not once per extra level.
        if ctx.nesting_depth() != NESTING_LIMIT {
            return None;
        }

        Some(Diagnostic::new(
            &MAX_NESTING,
            node.span(),
            format!(
                "control flow nested {} levels deep; use guard clauses or extract a function",
                NESTING_LIMIT + 1
            ),
        ))
    }
}

// ============================================================================
// DuplicateBranchesRule
// ============================================================================

pub struct DuplicateBranchesRule;

static DUPLICATE_BRANCHES: RuleDescriptor = RuleDescriptor::reporting(
    "conditionals.duplicate-branches",
    RuleCategory::Conditionals,
    Severity::Warning,
    "A conditional whose branches do the same thing is not a conditional",
);

impl Rule for DuplicateBranchesRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DUPLICATE_BRANCHES
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::If]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let then_branch = node.child(1)?;
        let else_branch = node.child(2)?;
        // An `else if` chain has an If here, not a Block; those branches are
        // guarded by different conditions and stay out of scope.
        if then_branch.kind() != NodeKind::Block || else_branch.kind() != NodeKind::Block {
            return None;
        }

        if compact_ws(ctx.slice(then_branch)) != compact_ws(ctx.slice(else_branch)) {
            return None;
        }

        // No fix: collapsing the branches silently discards whatever side
        // effects the condition expression has.
        Some(Diagnostic::new(
            &DUPLICATE_BRANCHES,
            node.span(),
            "both branches are identical; drop the conditional or fix the copy-paste",
        ))
    }
}
