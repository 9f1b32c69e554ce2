//! Comment-hygiene rules: journal entries, positional markers, dead code.

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::{Diagnostic, Fix};
use crate::fix::TextEdit;
use crate::level::Severity;
use crate::rule::{Rule, RuleCategory, RuleContext, RuleDescriptor};
use crate::tree::{Node, NodeKind};

use super::util::expand_deletion_span;

/// A line starting with a date token, as version control history pasted
/// into a comment tends to. The leading class eats block-comment asterisk
/// gutters.
static DATED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[\s*]*(\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}/\d{1,2}/\d{2,4})\b")
        .expect("valid journal date pattern")
});

// ============================================================================
// JournalCommentRule
// ============================================================================

pub struct JournalCommentRule;

static JOURNAL_COMMENT: RuleDescriptor = RuleDescriptor::fixing(
    "comments.journal-comment",
    RuleCategory::Comments,
    Severity::Warning,
    10,
    "Version control remembers who changed what; journal comments only rot",
    "Delete the journal comment",
);

impl Rule for JournalCommentRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &JOURNAL_COMMENT
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Comment]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let content = node.attr_str("text")?;
        if !DATED_LINE.is_match(content) {
            return None;
        }
        if !precedes_declaration(node, ctx) {
            return None;
        }

        Some(
            Diagnostic::new(
                &JOURNAL_COMMENT,
                node.span(),
                "journal comment; version control already keeps this history",
            )
            .with_fix(Fix::single(TextEdit::delete(expand_deletion_span(
                ctx.source(),
                node.span(),
            )))),
        )
    }
}

/// True when the next non-comment sibling is a declaration.
fn precedes_declaration(node: &Node, ctx: &RuleContext<'_>) -> bool {
    let Some(parent) = ctx.parent() else {
        return false;
    };
    parent
        .children()
        .iter()
        .skip(ctx.sibling_index() + 1)
        .find(|sibling| sibling.kind() != NodeKind::Comment)
        .is_some_and(|sibling| {
            matches!(
                sibling.kind(),
                NodeKind::Function | NodeKind::Class | NodeKind::Method | NodeKind::VarDecl
            )
        })
}

// ============================================================================
// PositionalMarkerRule
// ============================================================================

pub struct PositionalMarkerRule;

static POSITIONAL_MARKER: RuleDescriptor = RuleDescriptor::fixing(
    "comments.positional-marker",
    RuleCategory::Comments,
    Severity::Warning,
    11,
    "Separator-only comment lines add noise, not structure",
    "Delete the marker line",
);

impl Rule for PositionalMarkerRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &POSITIONAL_MARKER
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Comment]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let content = node.attr_str("text")?.trim();
        if content.len() < 3 || !content.chars().all(is_separator_char) {
            return None;
        }

        Some(
            Diagnostic::new(
                &POSITIONAL_MARKER,
                node.span(),
                "separator-only comment; let formatting and naming provide structure",
            )
            .with_fix(Fix::single(TextEdit::delete(expand_deletion_span(
                ctx.source(),
                node.span(),
            )))),
        )
    }
}

fn is_separator_char(c: char) -> bool {
    matches!(c, '-' | '=' | '*' | '#' | '_' | '~' | '/' | '<' | '>' | '|' | '+' | ' ')
}

// ============================================================================
// CommentedOutCodeRule
// ============================================================================

pub struct CommentedOutCodeRule;

static COMMENTED_OUT_CODE: RuleDescriptor = RuleDescriptor::fixing(
    "comments.commented-out-code",
    RuleCategory::Comments,
    Severity::Warning,
    12,
    "Commented-out code belongs to version control, not the working tree",
    "Delete the dead-code comment",
);

const CODE_PREFIXES: &[&str] = &[
    "var ", "let ", "const ", "function ", "return ", "return;", "if (", "if(", "for (", "for(",
    "while (", "while(", "throw ",
];

impl Rule for CommentedOutCodeRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &COMMENTED_OUT_CODE
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Comment]
    }

    fn check(&self, node: &Node, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let content = node.attr_str("text")?.trim();
        if content.is_empty() || !looks_like_code(content) {
            return None;
        }

        Some(
            Diagnostic::new(
                &COMMENTED_OUT_CODE,
                node.span(),
                "commented-out code; delete it and let history keep the old version",
            )
            .with_fix(Fix::single(TextEdit::delete(expand_deletion_span(
                ctx.source(),
                node.span(),
            )))),
        )
    }
}

fn looks_like_code(content: &str) -> bool {
    if CODE_PREFIXES.iter().any(|p| content.starts_with(p)) {
        return true;
    }
    // Prose rarely ends in a semicolon; statements always do.
    content.ends_with(';') && !content.chars().all(is_separator_char)
}
