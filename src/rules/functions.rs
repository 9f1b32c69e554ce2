//! Function-shape rules: parameter counts, defaults, abstraction levels,
//! flag arguments.

use crate::diagnostics::{Diagnostic, Fix};
use crate::fix::TextEdit;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{ByteSpan, Node, NodeKind};

use super::util::{bound_names, call_args, calls_to, expand_deletion_span, identifiers_named};

// ============================================================================
// MaxPositionalParamsRule
// ============================================================================

pub struct MaxPositionalParamsRule;

static MAX_POSITIONAL_PARAMS: RuleDescriptor = RuleDescriptor::fixing(
    "functions.max-positional-params",
    RuleCategory::Functions,
    Severity::Warning,
    40,
    "Functions should take at most two positional parameters",
    "Bundle the parameters into one structured parameter and rewrite every call site",
);

const MAX_POSITIONAL: usize = 2;

impl Rule for MaxPositionalParamsRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &MAX_POSITIONAL_PARAMS
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Function]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let params: Vec<&Node> = node
            .children()
            .iter()
            .filter(|c| c.kind() == NodeKind::Param)
            .collect();

        if params.len() <= MAX_POSITIONAL {
            return None;
        }
        // Rest and pattern parameters already bundle their arguments.
        if params
            .iter()
            .any(|p| p.attr_bool("rest") || p.attr_bool("pattern"))
        {
            return None;
        }

        let first = params.first()?;
        let last = params.last()?;
        let params_span = ByteSpan::new(first.span().start, last.span().end);
        let name = node.name()?;

        let mut diagnostic = Diagnostic::new(
            &MAX_POSITIONAL_PARAMS,
            params_span,
            format!(
                "`{name}` takes {} positional parameters; bundle them into one object",
                params.len()
            ),
        );

        if let Some(fix) = build_bundle_fix(ctx, &params, params_span, name) {
            diagnostic = diagnostic.with_fix(fix);
        }

        Some(diagnostic)
    }
}

/// Rewrites the declaration and every call site together, or not at all:
/// the fix is withheld when any call's arity disagrees with the signature
/// or a parameter carries a default.
fn build_bundle_fix(
    ctx: &RuleContext<'_>,
    params: &[&Node],
    params_span: ByteSpan,
    name: &str,
) -> Option<Fix> {
    if params.iter().any(|p| !p.children().is_empty()) {
        return None;
    }

    let param_names: Vec<&str> = params.iter().filter_map(|p| p.name()).collect();
    if param_names.len() != params.len() {
        return None;
    }

    let calls = calls_to(ctx.root(), name);
    if calls
        .iter()
        .any(|call| call_args(call).len() != params.len())
    {
        return None;
    }

    let mut edits = vec![TextEdit::new(
        params_span,
        format!("{{ {} }}", param_names.join(", ")),
    )];

    for call in calls {
        let args = call_args(call);
        let arg_span = ByteSpan::new(args[0].span().start, args[args.len() - 1].span().end);
        let fields: Vec<String> = param_names
            .iter()
            .zip(args.iter())
            .map(|(p, a)| format!("{}: {}", p, ctx.slice(a)))
            .collect();
        edits.push(TextEdit::new(arg_span, format!("{{ {} }}", fields.join(", "))));
    }

    Some(Fix::new(edits))
}

// ============================================================================
// DefaultViaOrRule
// ============================================================================

pub struct DefaultViaOrRule;

static DEFAULT_VIA_OR: RuleDescriptor = RuleDescriptor::fixing(
    "functions.default-via-or",
    RuleCategory::Functions,
    Severity::Warning,
    20,
    "Defaults belong in the parameter list, not in `param || literal` statements",
    "Move the literal into the parameter's default slot and delete the statement",
);

impl Rule for DefaultViaOrRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DEFAULT_VIA_OR
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Function, NodeKind::Method]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let body = node.children().last()?;
        if body.kind() != NodeKind::Block {
            return None;
        }
        let stmt = body.children().iter().find(|c| c.kind() != NodeKind::Comment)?;

        let (param_name, literal, orphaned_binding) = match stmt.kind() {
            // `const other = param || literal;`
            NodeKind::VarDecl => {
                let init = stmt.children().first()?;
                let (p, lit) = split_or_default(init)?;
                (p, lit, stmt.name())
            }
            // `param = param || literal;`
            NodeKind::Assign => {
                let target = stmt.child(0)?;
                if target.kind() != NodeKind::Identifier {
                    return None;
                }
                let (p, lit) = split_or_default(stmt.child(1)?)?;
                if target.name() != Some(p) {
                    return None;
                }
                (p, lit, None)
            }
            _ => return None,
        };

        let param = node
            .children()
            .iter()
            .find(|c| c.kind() == NodeKind::Param && c.name() == Some(param_name))?;
        if !param.children().is_empty() {
            // Already has a default.
            return None;
        }

        let mut diagnostic = Diagnostic::new(
            &DEFAULT_VIA_OR,
            stmt.span(),
            format!("`{param_name} || {}` hides a default; declare it in the signature", ctx.slice(literal)),
        );

        // Deleting a `const x = ...` statement orphans later references to
        // `x`; withhold the rewrite in that case and only report.
        let fixable = match orphaned_binding {
            Some(bound) => identifiers_named(body, bound).is_empty(),
            None => true,
        };

        if fixable {
            diagnostic = diagnostic.with_fix(Fix::new(vec![
                TextEdit::insert(param.span().end, format!(" = {}", ctx.slice(literal))),
                TextEdit::delete(expand_deletion_span(ctx.source(), stmt.span())),
            ]));
        }

        Some(diagnostic)
    }
}

/// Match `ident || literal` and return the identifier name and literal node.
fn split_or_default(expr: &Node) -> Option<(&str, &Node)> {
    if expr.kind() != NodeKind::Binary || expr.attr_str("operator") != Some("||") {
        return None;
    }
    let lhs = expr.child(0)?;
    let rhs = expr.child(1)?;
    if lhs.kind() != NodeKind::Identifier || rhs.kind() != NodeKind::Literal {
        return None;
    }
    Some((lhs.name()?, rhs))
}

// ============================================================================
// SingleLevelAbstractionRule
// ============================================================================

pub struct SingleLevelAbstractionRule;

static SINGLE_LEVEL_ABSTRACTION: RuleDescriptor = RuleDescriptor::reporting(
    "functions.single-level-abstraction",
    RuleCategory::Functions,
    Severity::Info,
    "A function body should stay at one level of abstraction",
);

impl Rule for SingleLevelAbstractionRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &SINGLE_LEVEL_ABSTRACTION
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Function, NodeKind::Method]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let body = node.children().last()?;
        if body.kind() != NodeKind::Block {
            return None;
        }

        let offender = find_nested_same_kind(body)?;
        Some(Diagnostic::new(
            &SINGLE_LEVEL_ABSTRACTION,
            offender.span(),
            format!(
                "nested {} inside another {}; extract the inner level into its own function",
                offender.kind().as_str(),
                offender.kind().as_str()
            ),
        ))
    }
}

/// First loop that contains another loop of the same kind beneath it.
fn find_nested_same_kind(body: &Node) -> Option<&Node> {
    let mut offender: Option<&Node> = None;
    body.walk(&mut |outer| {
        if offender.is_some() || !outer.kind().is_loop() {
            return;
        }
        let mut nested = false;
        for child in outer.children() {
            child.walk(&mut |inner| {
                if inner.kind() == outer.kind() {
                    nested = true;
                }
            });
        }
        if nested {
            offender = Some(outer);
        }
    });
    offender
}

// ============================================================================
// FlagArgumentRule
// ============================================================================

pub struct FlagArgumentRule;

static FLAG_ARGUMENT: RuleDescriptor = RuleDescriptor::reporting(
    "functions.flag-argument",
    RuleCategory::Functions,
    Severity::Info,
    "Boolean flag arguments mean the function does more than one thing",
);

impl Rule for FlagArgumentRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &FLAG_ARGUMENT
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Call]
    }

    fn check(&self, node: &Node, _ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let flag = call_args(node)
            .iter()
            .find(|a| a.kind() == NodeKind::Literal && a.attr_str("kind") == Some("bool"))?;

        Some(Diagnostic::new(
            &FLAG_ARGUMENT,
            flag.span(),
            "boolean flag argument; split the function instead of branching on it",
        ))
    }
}

// ============================================================================
// DeadCodeRule
// ============================================================================

pub struct DeadCodeRule;

static DEAD_CODE: RuleDescriptor = RuleDescriptor::reporting(
    "functions.dead-code",
    RuleCategory::Functions,
    Severity::Info,
    "Functions nobody calls are dead code; version control remembers them",
);

impl Rule for DeadCodeRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DEAD_CODE
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Function]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let name = node.name()?;

        // Any mention outside the declaration counts as a use: a call, or the
        // name passed around as a value. Recursive self-calls do not.
        let referenced = identifiers_named(ctx.root(), name)
            .iter()
            .any(|id| !node.span().contains(id.span()));
        if referenced {
            return None;
        }

        Some(Diagnostic::new(
            &DEAD_CODE,
            node.span(),
            format!("`{name}` is never called in this unit; delete it if it is truly unused"),
        ))
    }
}

// ============================================================================
// GlobalWriteRule
// ============================================================================

pub struct GlobalWriteRule;

static GLOBAL_WRITE: RuleDescriptor = RuleDescriptor::reporting(
    "functions.global-write",
    RuleCategory::Functions,
    Severity::Warning,
    "Functions should not assign to names they do not own",
);

impl Rule for GlobalWriteRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &GLOBAL_WRITE
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Assign]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let target = node.child(0)?;
        if target.kind() != NodeKind::Identifier {
            return None;
        }
        let name = target.name()?;

        // Only assignments inside a function can pollute an outer scope;
        // unit-level statements own the unit's namespace.
        let function = ctx.enclosing_function()?;

        let mut bound = bound_names(function);
        for top in ctx.root().children() {
            if matches!(
                top.kind(),
                NodeKind::VarDecl | NodeKind::Function | NodeKind::Class
            ) {
                if let Some(top_name) = top.name() {
                    bound.insert(top_name.to_string());
                }
            }
        }
        if bound.contains(name) {
            return None;
        }

        Some(Diagnostic::new(
            &GLOBAL_WRITE,
            target.span(),
            format!("`{name}` is not declared anywhere in scope; assigning to it pollutes the global namespace"),
        ))
    }
}
