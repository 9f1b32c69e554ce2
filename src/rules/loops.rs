//! Loop rules: indexed counting loops that should bind elements directly.

use crate::diagnostics::{Diagnostic, Fix};
use crate::fix::TextEdit;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{ByteSpan, Node, NodeKind};

use super::util::{identifiers_named, singularize};

// ============================================================================
// PreferForOfRule
// ============================================================================

pub struct PreferForOfRule;

static PREFER_FOR_OF: RuleDescriptor = RuleDescriptor::fixing(
    "loops.prefer-for-of",
    RuleCategory::Loops,
    Severity::Warning,
    30,
    "Counting loops that only read `collection[i]` should bind the element",
    "Rewrite to an element-binding loop and replace the indexed reads",
);

impl Rule for PreferForOfRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &PREFER_FOR_OF
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::For]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let init = node.child(0)?;
        let cond = node.child(1)?;
        let update = node.child(2)?;
        let body = node.child(3)?;

        // Header: `let i = 0; i < coll.length; i++` (or `i = i + 1`).
        let index = counting_init(init)?;
        let collection = length_bound(cond, index)?;
        if !is_increment(update, index) {
            return None;
        }

        let mut diagnostic = Diagnostic::new(
            &PREFER_FOR_OF,
            node.span(),
            format!("counting loop over `{collection}`; bind the element instead of indexing"),
        );

        // Every use of the index inside the body must be `collection[index]`,
        // otherwise the index is live beyond indexing and the rewrite is
        // withheld.
        let reads = indexed_reads(body, collection, index);
        let read_spans: Vec<ByteSpan> = reads
            .iter()
            .filter_map(|n| n.child(1).map(Node::span))
            .collect();
        let index_only = identifiers_named(body, index)
            .iter()
            .all(|ident| read_spans.contains(&ident.span()));

        if index_only {
            if let Some(element) = element_binding(body, collection, index) {
                let mut edits = vec![TextEdit::new(
                    ByteSpan::new(init.span().start, update.span().end),
                    format!("{element} of {collection}"),
                )];
                for read in &reads {
                    edits.push(TextEdit::new(read.span(), element.clone()));
                }
                diagnostic = diagnostic.with_fix(Fix::new(edits));
            }
        }

        Some(diagnostic)
    }
}

/// `let i = 0` / `var i = 0` in a for-init position.
fn counting_init(init: &Node) -> Option<&str> {
    if init.kind() != NodeKind::VarDecl {
        return None;
    }
    if !matches!(init.attr_str("keyword"), Some("let") | Some("var")) {
        return None;
    }
    let value = init.children().first()?;
    if value.kind() != NodeKind::Literal || value.attr_str("value") != Some("0") {
        return None;
    }
    init.name()
}

/// `index < collection.length`; returns the collection name.
fn length_bound<'a>(cond: &'a Node, index: &str) -> Option<&'a str> {
    if cond.kind() != NodeKind::Binary || cond.attr_str("operator") != Some("<") {
        return None;
    }
    let lhs = cond.child(0)?;
    if lhs.kind() != NodeKind::Identifier || lhs.name() != Some(index) {
        return None;
    }
    let bound = cond.child(1)?;
    if bound.kind() != NodeKind::Member {
        return None;
    }
    let object = bound.child(0)?;
    let property = bound.child(1)?;
    if object.kind() != NodeKind::Identifier || property.name() != Some("length") {
        return None;
    }
    object.name()
}

fn is_increment(update: &Node, index: &str) -> bool {
    match update.kind() {
        NodeKind::Update => {
            update.name() == Some(index) && update.attr_str("operator") == Some("++")
        }
        NodeKind::Assign => {
            let Some(target) = update.child(0) else {
                return false;
            };
            let Some(value) = update.child(1) else {
                return false;
            };
            if target.kind() != NodeKind::Identifier || target.name() != Some(index) {
                return false;
            }
            match update.attr_str("operator") {
                // i += 1
                Some("+=") => {
                    value.kind() == NodeKind::Literal && value.attr_str("value") == Some("1")
                }
                // i = i + 1
                Some("=") => {
                    value.kind() == NodeKind::Binary
                        && value.attr_str("operator") == Some("+")
                        && value.child(0).is_some_and(|l| {
                            l.kind() == NodeKind::Identifier && l.name() == Some(index)
                        })
                        && value.child(1).is_some_and(|r| {
                            r.kind() == NodeKind::Literal && r.attr_str("value") == Some("1")
                        })
                }
                _ => false,
            }
        }
        _ => false,
    }
}

/// All `collection[index]` nodes in the body.
fn indexed_reads<'a>(body: &'a Node, collection: &str, index: &str) -> Vec<&'a Node> {
    let mut reads = Vec::new();
    body.walk(&mut |n| {
        if n.kind() != NodeKind::Index {
            return;
        }
        let object_matches = n
            .child(0)
            .is_some_and(|o| o.kind() == NodeKind::Identifier && o.name() == Some(collection));
        let index_matches = n
            .child(1)
            .is_some_and(|i| i.kind() == NodeKind::Identifier && i.name() == Some(index));
        if object_matches && index_matches {
            reads.push(n);
        }
    });
    reads
}

/// Element name derived from the collection, unless it would collide with
/// something the body already mentions.
fn element_binding(body: &Node, collection: &str, index: &str) -> Option<String> {
    let element = singularize(collection).unwrap_or_else(|| "item".to_string());
    if element == collection || element == index {
        return None;
    }
    if !identifiers_named(body, &element).is_empty() {
        return None;
    }
    Some(element)
}
