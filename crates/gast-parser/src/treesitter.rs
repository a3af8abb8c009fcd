//! Tree-sitter integration: parse source text and lower it into an owned
//! [`NativeTree`].

use crate::languages::Language;
use crate::native::{NativeNode, NativeTree, ParseFailure};

/// Nesting bound for lowered trees. Anything deeper is rejected rather than
/// risking stack exhaustion in the recursive passes that follow.
pub const MAX_DEPTH: usize = 4096;

/// Parse source with a fresh tree-sitter parser and return the raw tree.
pub fn parse_tree(language: Language, source: &str) -> Result<tree_sitter::Tree, ParseFailure> {
    let grammar = language.ts_language();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&grammar)
        .map_err(|e| ParseFailure::Grammar {
            language: language.name(),
            reason: e.to_string(),
        })?;
    parser
        .parse(source.as_bytes(), None)
        .ok_or(ParseFailure::NoTree {
            language: language.name(),
        })
}

/// Parse and lower. Any `ERROR` or `MISSING` node fails the whole file.
pub fn parse_native(language: Language, source: &str) -> Result<NativeTree, ParseFailure> {
    let tree = parse_tree(language, source)?;
    let root = tree.root_node();

    if root.has_error()
        && let Some(bad) = first_error(root)
    {
        return Err(syntax_failure(bad, source));
    }

    let mut cursor = tree.walk();
    let lowered = lower(&mut cursor, 0)?;
    Ok(NativeTree {
        language,
        source: source.to_string(),
        root: lowered,
    })
}

fn lower(cursor: &mut tree_sitter::TreeCursor<'_>, depth: usize) -> Result<NativeNode, ParseFailure> {
    if depth > MAX_DEPTH {
        return Err(ParseFailure::TooDeep { limit: MAX_DEPTH });
    }
    let node = cursor.node();
    let mut children = Vec::with_capacity(node.child_count());

    if cursor.goto_first_child() {
        loop {
            let field = cursor.field_name();
            let mut child = lower(cursor, depth + 1)?;
            child.field = field;
            children.push(child);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    Ok(NativeNode {
        kind: node.kind(),
        field: None,
        named: node.is_named(),
        extra: node.is_extra(),
        span: node.byte_range(),
        children,
    })
}

fn first_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if (child.has_error() || child.is_missing())
            && let Some(found) = first_error(child)
        {
            return Some(found);
        }
    }
    None
}

fn syntax_failure(node: tree_sitter::Node<'_>, source: &str) -> ParseFailure {
    let pos = node.start_position();
    let detail = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = source
            .get(node.byte_range())
            .unwrap_or("")
            .chars()
            .take(24)
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        format!("unexpected `{}`", snippet.trim())
    };
    ParseFailure::Syntax {
        line: pos.row + 1,
        column: pos.column + 1,
        detail,
    }
}
