//! Rule trait, static descriptors, per-node context, and the registry.

use std::collections::HashMap;

use crate::diagnostics::Diagnostic;
use crate::error::{EngineError, EngineResult};
use crate::level::Severity;
use crate::tree::{Node, NodeKind};

/// High-level categories grouping the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleCategory {
    Naming,
    Functions,
    Conditionals,
    Loops,
    Variables,
    Comments,
    ErrorHandling,
    Classes,
    /// Synthetic diagnostics owned by the engine itself.
    Engine,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Naming => "naming",
            RuleCategory::Functions => "functions",
            RuleCategory::Conditionals => "conditionals",
            RuleCategory::Loops => "loops",
            RuleCategory::Variables => "variables",
            RuleCategory::Comments => "comments",
            RuleCategory::ErrorHandling => "errors",
            RuleCategory::Classes => "classes",
            RuleCategory::Engine => "engine",
        }
    }
}

/// Whether a rule ships a mechanical rewrite, and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixAvailability {
    pub available: bool,
    pub description: &'static str,
}

impl FixAvailability {
    pub const fn some(description: &'static str) -> Self {
        Self {
            available: true,
            description,
        }
    }

    pub const fn none() -> Self {
        Self {
            available: false,
            description: "",
        }
    }
}

/// Static metadata describing one rule.
///
/// Priority orders fix application on conflict (lower wins first); it has
/// no effect on detection, which is exhaustive.
#[derive(Debug)]
pub struct RuleDescriptor {
    pub name: &'static str,
    pub category: RuleCategory,
    pub description: &'static str,
    pub severity: Severity,
    pub priority: i32,
    pub fix: FixAvailability,
}

impl RuleDescriptor {
    /// Detection-only rule; reports at the shared default priority.
    pub const fn reporting(
        name: &'static str,
        category: RuleCategory,
        severity: Severity,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            category,
            description,
            severity,
            priority: 100,
            fix: FixAvailability::none(),
        }
    }

    /// Rule with a mechanical rewrite and an explicit fix priority.
    pub const fn fixing(
        name: &'static str,
        category: RuleCategory,
        severity: Severity,
        priority: i32,
        description: &'static str,
        fix_description: &'static str,
    ) -> Self {
        Self {
            name,
            category,
            description,
            severity,
            priority,
            fix: FixAvailability::some(fix_description),
        }
    }
}

/// A single style rule.
///
/// `check` must be a pure function of `(node, ctx)`: no I/O, no
/// randomness, no retained state, so that repeated passes over the same
/// tree yield identical diagnostics. At most one diagnostic per invocation; a
/// rule that can fire on several constructs fires once per matching node.
pub trait Rule: Send + Sync {
    fn descriptor(&self) -> &'static RuleDescriptor;

    /// Node kinds this rule wants to see. The walker only invokes the rule
    /// at nodes of these kinds.
    fn kinds(&self) -> &'static [NodeKind];

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic>;
}

/// Read-only per-node facts supplied to rules by the walker.
///
/// Rebuilt every pass; rules must not cache anything across invocations.
pub struct RuleContext<'a> {
    source: &'a str,
    root: &'a Node,
    ancestors: &'a [&'a Node],
    sibling_index: usize,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        source: &'a str,
        root: &'a Node,
        ancestors: &'a [&'a Node],
        sibling_index: usize,
    ) -> Self {
        Self {
            source,
            root,
            ancestors,
            sibling_index,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Root of the unit under analysis, for unit-wide cross-reference
    /// checks (call-site counting, const tables).
    pub fn root(&self) -> &'a Node {
        self.root
    }

    /// Ancestor chain, outermost first. Empty at the root.
    pub fn ancestors(&self) -> &[&'a Node] {
        self.ancestors
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.ancestors.last().copied()
    }

    /// Index of the current node among its parent's children.
    pub fn sibling_index(&self) -> usize {
        self.sibling_index
    }

    /// Innermost enclosing function or method, if any.
    pub fn enclosing_function(&self) -> Option<&'a Node> {
        self.ancestors
            .iter()
            .rev()
            .copied()
            .find(|n| matches!(n.kind(), NodeKind::Function | NodeKind::Method))
    }

    /// Innermost enclosing class, if any.
    pub fn enclosing_class(&self) -> Option<&'a Node> {
        self.ancestors
            .iter()
            .rev()
            .copied()
            .find(|n| n.kind() == NodeKind::Class)
    }

    pub fn conditional_depth(&self) -> usize {
        self.ancestors
            .iter()
            .filter(|n| n.kind().is_conditional())
            .count()
    }

    pub fn loop_depth(&self) -> usize {
        self.ancestors.iter().filter(|n| n.kind().is_loop()).count()
    }

    /// Combined conditional + loop nesting depth at this node.
    pub fn nesting_depth(&self) -> usize {
        self.conditional_depth() + self.loop_depth()
    }

    pub fn slice(&self, node: &Node) -> &'a str {
        node.text(self.source)
    }
}

struct RegistryEntry {
    rule: Box<dyn Rule>,
    enabled: bool,
    priority: i32,
    severity: Severity,
}

/// A rule as the walker sees it: enabled, with effective priority and
/// severity after registry overrides.
pub(crate) struct ActiveRule<'a> {
    pub rule: &'a dyn Rule,
    pub priority: i32,
    pub severity: Severity,
}

/// Ordered, deduplicated rule collection with enable/disable state and
/// priority/severity overrides.
///
/// Mutation takes `&mut self`, so it cannot race an in-flight analysis
/// borrowing the registry; snapshot (clone into a fresh registry) before
/// sharing across concurrent analyses if overrides must diverge.
pub struct RuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a rule. Re-registering an id replaces the previous rule and
    /// resets its overrides; the collection stays deduplicated by id.
    pub fn register(&mut self, rule: impl Rule + 'static) {
        let desc = rule.descriptor();
        let entry = RegistryEntry {
            enabled: true,
            priority: desc.priority,
            severity: desc.severity,
            rule: Box::new(rule),
        };

        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.rule.descriptor().name == desc.name)
        {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.register(rule);
        self
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> EngineResult<()> {
        self.entry_mut(id)?.enabled = enabled;
        Ok(())
    }

    pub fn set_priority(&mut self, id: &str, priority: i32) -> EngineResult<()> {
        self.entry_mut(id)?.priority = priority;
        Ok(())
    }

    pub fn set_severity(&mut self, id: &str, severity: Severity) -> EngineResult<()> {
        self.entry_mut(id)?.severity = severity;
        Ok(())
    }

    fn entry_mut(&mut self, id: &str) -> EngineResult<&mut RegistryEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.rule.descriptor().name == id)
            .ok_or_else(|| EngineError::UnknownRule(id.to_string()))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static RuleDescriptor> + '_ {
        self.entries.iter().map(|e| e.rule.descriptor())
    }

    pub fn find_descriptor(&self, name: &str) -> Option<&'static RuleDescriptor> {
        self.descriptors().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enabled rules in the registry's total order: priority, then id.
    pub(crate) fn active_rules(&self) -> Vec<ActiveRule<'_>> {
        let mut active: Vec<ActiveRule<'_>> = self
            .entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| ActiveRule {
                rule: e.rule.as_ref(),
                priority: e.priority,
                severity: e.severity,
            })
            .collect();
        active.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.rule.descriptor().name.cmp(b.rule.descriptor().name))
        });
        active
    }

    /// Effective priorities by rule id, for the walker's deterministic sort.
    pub(crate) fn priorities(&self) -> HashMap<&'static str, i32> {
        self.entries
            .iter()
            .map(|e| (e.rule.descriptor().name, e.priority))
            .collect()
    }

    /// Registry preloaded with the built-in catalog.
    #[must_use = "registry should be used to create an engine"]
    pub fn default_rules() -> Self {
        crate::rules::default_rules()
    }
}
