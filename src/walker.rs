//! Depth-first traversal that drives rule invocation.
//!
//! One pre-order pass per analysis: at each node every enabled rule whose
//! kind filter matches is invoked with the node and a freshly built
//! context. Rule faults are isolated per invocation; the walk never
//! mutates the tree. Ordering of the returned diagnostics is a
//! post-condition restored by a final sort, not a property of traversal.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::diagnostics::Diagnostic;
use crate::level::Severity;
use crate::rule::{ActiveRule, RuleCategory, RuleContext, RuleDescriptor, RuleRegistry};
use crate::tree::Node;

/// Synthetic descriptor for a rule that panicked while checking a node.
pub static INTERNAL_ERROR: RuleDescriptor = RuleDescriptor::reporting(
    "internal-error",
    RuleCategory::Engine,
    Severity::Info,
    "A rule raised an internal fault and was isolated for the rest of the pass",
);

/// Run every enabled rule over the tree and return diagnostics sorted by
/// (span start, rule priority, rule id).
pub(crate) fn analyze_tree(source: &str, root: &Node, registry: &RuleRegistry) -> Vec<Diagnostic> {
    let active = registry.active_rules();
    let priorities = registry.priorities();

    let mut diagnostics = Vec::new();
    let mut ancestors: Vec<&Node> = Vec::new();
    visit(source, root, root, &mut ancestors, 0, &active, &mut diagnostics);

    sort_diagnostics(&mut diagnostics, &priorities);
    diagnostics
}

pub(crate) fn sort_diagnostics(
    diagnostics: &mut [Diagnostic],
    priorities: &HashMap<&'static str, i32>,
) {
    diagnostics.sort_by(|a, b| {
        let pa = priorities.get(a.rule.name).copied().unwrap_or(i32::MAX);
        let pb = priorities.get(b.rule.name).copied().unwrap_or(i32::MAX);
        a.span
            .start
            .cmp(&b.span.start)
            .then(pa.cmp(&pb))
            .then_with(|| a.rule.name.cmp(b.rule.name))
    });
}

fn visit<'a>(
    source: &str,
    root: &'a Node,
    node: &'a Node,
    ancestors: &mut Vec<&'a Node>,
    sibling_index: usize,
    rules: &[ActiveRule<'_>],
    out: &mut Vec<Diagnostic>,
) {
    {
        let ctx = RuleContext::new(source, root, ancestors.as_slice(), sibling_index);

        for active in rules {
            if !active.rule.kinds().contains(&node.kind()) {
                continue;
            }

            match catch_unwind(AssertUnwindSafe(|| active.rule.check(node, &ctx))) {
                Ok(Some(mut diag)) => {
                    diag.severity = active.severity;
                    out.push(diag);
                }
                Ok(None) => {}
                Err(payload) => {
                    let name = active.rule.descriptor().name;
                    let detail = panic_message(payload.as_ref());
                    tracing::trace!(rule = name, detail, "rule fault isolated");
                    out.push(Diagnostic::new(
                        &INTERNAL_ERROR,
                        node.span(),
                        format!(
                            "rule `{}` failed on a {} node: {}",
                            name,
                            node.kind().as_str(),
                            detail
                        ),
                    ));
                }
            }
        }
    }

    ancestors.push(node);
    for (index, child) in node.children().iter().enumerate() {
        visit(source, root, child, ancestors, index, rules, out);
    }
    ancestors.pop();
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
