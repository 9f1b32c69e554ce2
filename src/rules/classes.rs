//! Class-design rules.

use crate::diagnostics::Diagnostic;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{Node, NodeKind};

// ============================================================================
// ShallowHierarchyRule
// ============================================================================

pub struct ShallowHierarchyRule;

static SHALLOW_HIERARCHY: RuleDescriptor = RuleDescriptor::reporting(
    "classes.shallow-hierarchy",
    RuleCategory::Classes,
    Severity::Info,
    "Inheritance chains of three or more levels usually want composition",
);

impl Rule for ShallowHierarchyRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &SHALLOW_HIERARCHY
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Class]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let name = node.name()?;
        let base_name = node.attr_str("extends")?;
        let base = class_named(ctx.root(), base_name)?;
        let grandbase_name = base.attr_str("extends")?;

        Some(Diagnostic::new(
            &SHALLOW_HIERARCHY,
            node.span(),
            format!(
                "`{name}` sits three levels deep ({name} -> {base_name} -> {grandbase_name}); compose instead"
            ),
        ))
    }
}

fn class_named<'a>(root: &'a Node, name: &str) -> Option<&'a Node> {
    let mut found = None;
    root.walk(&mut |n| {
        if found.is_none() && n.kind() == NodeKind::Class && n.name() == Some(name) {
            found = Some(n);
        }
    });
    found
}
