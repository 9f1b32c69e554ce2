use std::collections::HashSet;

use crate::tree::{ByteSpan, Node, NodeKind};

/// Callee expression of a call node (first child).
pub(crate) fn call_callee(call: &Node) -> Option<&Node> {
    call.child(0)
}

/// Argument nodes of a call (everything after the callee).
pub(crate) fn call_args(call: &Node) -> &[Node] {
    let children = call.children();
    if children.is_empty() { &[] } else { &children[1..] }
}

/// Name of the callee when it is a plain identifier.
pub(crate) fn simple_callee_name(call: &Node) -> Option<&str> {
    let callee = call_callee(call)?;
    if callee.kind() == NodeKind::Identifier {
        callee.name()
    } else {
        None
    }
}

pub(crate) fn is_simple_ident(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return false;
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Singular form of a plural collection name, for deriving element
/// bindings (`cities` -> `city`). Returns `None` when no reasonable
/// singular exists.
pub(crate) fn singularize(name: &str) -> Option<String> {
    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return Some(format!("{stem}y"));
        }
    }
    if name.ends_with("ss") || name.len() < 3 {
        return None;
    }
    name.strip_suffix('s').map(str::to_string)
}

/// Strip a negation token from a predicate name: `isNotActive` ->
/// `isActive`, `notReady` -> `ready`, `userNotFound` -> `userFound`.
pub(crate) fn strip_negation(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("isNot") {
        if rest.starts_with(char::is_uppercase) {
            return Some(format!("is{rest}"));
        }
    }
    if let Some(rest) = name.strip_prefix("not") {
        if rest.starts_with(char::is_uppercase) {
            return Some(lowercase_first(rest));
        }
    }
    if let Some(pos) = name.find("Not") {
        // Mid-name token: drop it, keeping the tail's capitalization.
        let tail = &name[pos + 3..];
        if pos > 0 && tail.starts_with(char::is_uppercase) {
            return Some(format!("{}{}", &name[..pos], tail));
        }
    }
    None
}

pub(crate) fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extend a deletion span over surrounding whitespace so removing a
/// statement or comment does not leave a hole: leading blanks are always
/// consumed, and when the construct started its own line the trailing
/// newline goes with it.
pub(crate) fn expand_deletion_span(source: &str, span: ByteSpan) -> ByteSpan {
    let bytes = source.as_bytes();

    let mut start = span.start.min(bytes.len());
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    let at_line_start = start == 0 || bytes[start - 1] == b'\n';

    let mut end = span.end.min(bytes.len());
    if at_line_start {
        while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'\n' {
            end += 1;
        }
    }

    ByteSpan::new(start, end)
}

/// Collapse whitespace runs to single spaces, for comparing code fragments
/// structurally rather than byte-for-byte.
pub(crate) fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All names bound under `scope`: parameters, declarations, nested
/// function/class names, loop bindings and catch parameters.
pub(crate) fn bound_names(scope: &Node) -> HashSet<String> {
    let mut names = HashSet::new();
    scope.walk(&mut |n| match n.kind() {
        NodeKind::Param | NodeKind::VarDecl | NodeKind::Function | NodeKind::Class => {
            if let Some(name) = n.name() {
                names.insert(name.to_string());
            }
        }
        NodeKind::ForEach => {
            if let Some(binding) = n.attr_str("binding") {
                names.insert(binding.to_string());
            }
        }
        NodeKind::Catch => {
            if let Some(param) = n.attr_str("param") {
                names.insert(param.to_string());
            }
        }
        _ => {}
    });
    names
}

/// All identifier nodes named `name` under `scope`, in source order.
pub(crate) fn identifiers_named<'a>(scope: &'a Node, name: &str) -> Vec<&'a Node> {
    let mut found = Vec::new();
    scope.walk(&mut |n| {
        if n.kind() == NodeKind::Identifier && n.name() == Some(name) {
            found.push(n);
        }
    });
    found.sort_by_key(|n| n.span().start);
    found
}

/// True if `name` is written to anywhere under `scope` (assignment or
/// increment/decrement).
pub(crate) fn is_reassigned(scope: &Node, name: &str) -> bool {
    let mut reassigned = false;
    scope.walk(&mut |n| match n.kind() {
        NodeKind::Assign => {
            if let Some(target) = n.child(0) {
                if target.kind() == NodeKind::Identifier && target.name() == Some(name) {
                    reassigned = true;
                }
            }
        }
        NodeKind::Update => {
            if n.name() == Some(name) {
                reassigned = true;
            }
        }
        _ => {}
    });
    reassigned
}

/// All call nodes under `scope` whose callee is the plain identifier
/// `callee`.
pub(crate) fn calls_to<'a>(scope: &'a Node, callee: &str) -> Vec<&'a Node> {
    let mut found = Vec::new();
    scope.walk(&mut |n| {
        if n.kind() == NodeKind::Call && simple_callee_name(n) == Some(callee) {
            found.push(n);
        }
    });
    found
}

/// Raw texts of literals bound to `const` declarations anywhere in the
/// unit. Used to decide whether a magic literal already has a searchable
/// name in scope.
pub(crate) fn const_literal_texts(root: &Node, source: &str) -> HashSet<String> {
    let mut texts = HashSet::new();
    root.walk(&mut |n| {
        if n.kind() == NodeKind::VarDecl && n.attr_str("keyword") == Some("const") {
            if let Some(init) = n.children().first() {
                if init.kind() == NodeKind::Literal {
                    texts.insert(init.text(source).to_string());
                }
            }
        }
    });
    texts
}

/// Function declarations named `name` under `scope`.
pub(crate) fn functions_named<'a>(scope: &'a Node, name: &str) -> Vec<&'a Node> {
    let mut found = Vec::new();
    scope.walk(&mut |n| {
        if n.kind() == NodeKind::Function && n.name() == Some(name) {
            found.push(n);
        }
    });
    found
}
