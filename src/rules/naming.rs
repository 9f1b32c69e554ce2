//! Naming rules: searchable constants, honest binding names, context
//! repetition, pronounceability.

use crate::diagnostics::{Diagnostic, Fix};
use crate::fix::TextEdit;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{Node, NodeKind};

use super::util::{
    const_literal_texts, identifiers_named, is_simple_ident, lowercase_first, singularize,
};

// ============================================================================
// SearchableLiteralRule
// ============================================================================

pub struct SearchableLiteralRule;

static SEARCHABLE_LITERAL: RuleDescriptor = RuleDescriptor::reporting(
    "naming.searchable-literal",
    RuleCategory::Naming,
    Severity::Info,
    "Magic literals used as arguments or in conditions should be named constants",
);

/// Values too conventional to be worth naming.
const UNREMARKABLE_NUMBERS: &[&str] = &["0", "1", "-1"];

impl Rule for SearchableLiteralRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &SEARCHABLE_LITERAL
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Literal]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let literal_kind = node.attr_str("kind")?;
        if literal_kind == "bool" {
            return None;
        }
        let value = node.attr_str("value")?;
        if literal_kind == "number" && UNREMARKABLE_NUMBERS.contains(&value) {
            return None;
        }
        if literal_kind == "string" && value.len() < 3 {
            return None;
        }

        let parent = ctx.parent()?;
        let used_as_argument = parent.kind() == NodeKind::Call && ctx.sibling_index() >= 1;
        let used_in_condition = parent.kind() == NodeKind::Binary
            && is_comparison(parent.attr_str("operator").unwrap_or(""))
            && inside_condition(ctx);

        if !used_as_argument && !used_in_condition {
            return None;
        }

        // A same-valued `const` anywhere in the unit means the author already
        // has a searchable name for this value.
        let text = node.text(ctx.source());
        if const_literal_texts(ctx.root(), ctx.source()).contains(text) {
            return None;
        }

        Some(Diagnostic::new(
            &SEARCHABLE_LITERAL,
            node.span(),
            format!("magic literal {text}; bind it to a named constant"),
        ))
    }
}

fn is_comparison(op: &str) -> bool {
    matches!(op, "==" | "===" | "!=" | "!==" | "<" | ">" | "<=" | ">=")
}

/// True when the nearest branching ancestor is reached without crossing a
/// block, i.e. the node sits in a condition rather than a branch body.
fn inside_condition(ctx: &RuleContext<'_>) -> bool {
    for ancestor in ctx.ancestors().iter().rev() {
        match ancestor.kind() {
            NodeKind::Block => return false,
            NodeKind::If | NodeKind::While => return true,
            _ => {}
        }
    }
    false
}

// ============================================================================
// AvoidMentalMappingRule
// ============================================================================

pub struct AvoidMentalMappingRule;

static AVOID_MENTAL_MAPPING: RuleDescriptor = RuleDescriptor::fixing(
    "naming.avoid-mental-mapping",
    RuleCategory::Naming,
    Severity::Warning,
    35,
    "Loop bindings of one or two characters force the reader to keep a mental mapping",
    "Rename the binding to the singularized collection name, including all references",
);

/// Conventional counters that readers translate without effort.
const COUNTER_NAMES: &[&str] = &["i", "j", "k"];

impl Rule for AvoidMentalMappingRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &AVOID_MENTAL_MAPPING
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::ForEach]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let binding = node.child(0)?;
        let iterable = node.child(1)?;
        let body = node.child(2)?;

        let short = binding.name()?;
        if short.chars().count() > 2 || COUNTER_NAMES.contains(&short) {
            return None;
        }

        let mut diagnostic = Diagnostic::new(
            &AVOID_MENTAL_MAPPING,
            binding.span(),
            format!("binding `{short}` says nothing; name the element"),
        );

        if let Some(renamed) = derive_element_name(iterable) {
            if is_simple_ident(&renamed)
                && renamed != short
                && identifiers_named(body, &renamed).is_empty()
            {
                let mut edits = vec![TextEdit::new(binding.span(), renamed.clone())];
                for reference in identifiers_named(body, short) {
                    edits.push(TextEdit::new(reference.span(), renamed.clone()));
                }
                diagnostic = diagnostic.with_fix(Fix::new(edits));
            }
        }

        Some(diagnostic)
    }
}

fn derive_element_name(iterable: &Node) -> Option<String> {
    if iterable.kind() != NodeKind::Identifier {
        return None;
    }
    singularize(iterable.name()?)
}

// ============================================================================
// RedundantContextRule
// ============================================================================

pub struct RedundantContextRule;

static REDUNDANT_CONTEXT: RuleDescriptor = RuleDescriptor::reporting(
    "naming.redundant-context",
    RuleCategory::Naming,
    Severity::Info,
    "Member names should not repeat the name of their class",
);

impl Rule for RedundantContextRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &REDUNDANT_CONTEXT
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Method]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let class = ctx.enclosing_class()?;
        let class_name = class.name()?;
        let method_name = node.name()?;

        let prefix = lowercase_first(class_name);
        let rest = method_name.strip_prefix(&prefix)?;
        if rest.is_empty() || !rest.starts_with(char::is_uppercase) {
            return None;
        }

        Some(Diagnostic::new(
            &REDUNDANT_CONTEXT,
            node.span(),
            format!("`{method_name}` repeats its class name `{class_name}`"),
        ))
    }
}

// ============================================================================
// UnpronounceableRule
// ============================================================================

pub struct UnpronounceableRule;

static UNPRONOUNCEABLE: RuleDescriptor = RuleDescriptor::reporting(
    "naming.unpronounceable",
    RuleCategory::Naming,
    Severity::Info,
    "Names should be pronounceable words, not abbreviation soup",
);

impl Rule for UnpronounceableRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &UNPRONOUNCEABLE
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::VarDecl, NodeKind::Function, NodeKind::Param]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let name = node.name()?;
        if !is_unpronounceable(name) {
            return None;
        }

        Some(Diagnostic::new(
            &UNPRONOUNCEABLE,
            node.span(),
            format!("`{name}` cannot be read aloud; spell out what it holds"),
        ))
    }
}

fn is_unpronounceable(name: &str) -> bool {
    let letters: Vec<char> = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.len() < 6 {
        return false;
    }
    !letters.iter().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
}
