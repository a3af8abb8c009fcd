//! Optional language-specific pruning of a native tree before normalization.

use crate::native::{NativeNode, NativeTree};

/// What the simplification pass removes for one language.
#[derive(Debug)]
pub struct SimplifyRules {
    /// Named kinds removed together with their subtree.
    pub drop: &'static [&'static str],
    /// Wrapper kinds replaced by their single named child.
    pub unwrap: &'static [&'static str],
    /// Parent kinds whose body (field `body`, or the node itself when it is the
    /// root) loses a leading string-only statement.
    pub docstring_owners: &'static [&'static str],
}

/// Prune `tree` in place.
pub fn simplify(tree: &mut NativeTree, rules: &SimplifyRules) {
    let root = &mut tree.root;
    if rules.docstring_owners.contains(&root.kind) {
        strip_docstring(root);
    }
    prune(root, rules);
}

fn prune(node: &mut NativeNode, rules: &SimplifyRules) {
    node.children
        .retain(|c| !(c.named && rules.drop.contains(&c.kind)));

    for child in &mut node.children {
        while rules.unwrap.contains(&child.kind) {
            let only = {
                let mut inner = child.significant_children();
                match (inner.next(), inner.next()) {
                    (Some(only), None) => only.clone(),
                    _ => break,
                }
            };
            let field = child.field;
            *child = NativeNode { field, ..only };
        }
    }

    if rules.docstring_owners.contains(&node.kind)
        && let Some(body) = node.children.iter_mut().find(|c| c.field == Some("body"))
    {
        strip_docstring(body);
    }

    for child in &mut node.children {
        prune(child, rules);
    }
}

/// Remove the first statement of `body` when it is a bare string.
fn strip_docstring(body: &mut NativeNode) {
    let Some(pos) = body.children.iter().position(|c| c.named && !c.extra) else {
        return;
    };
    let is_docstring = {
        let first = &body.children[pos];
        let mut inner = first.significant_children();
        first.kind == "expression_statement"
            && matches!((inner.next(), inner.next()), (Some(s), None) if s.kind == "string")
    };
    if is_docstring {
        body.children.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::Language;

    fn kinds(node: &NativeNode, out: &mut Vec<&'static str>) {
        if node.named {
            out.push(node.kind);
        }
        for c in &node.children {
            kinds(c, out);
        }
    }

    #[test]
    fn test_python_docstrings_comments_and_parens() {
        let adapter = Language::Python.adapter();
        let mut tree = adapter
            .parse("\"\"\"module doc\"\"\"\n# note\ndef f(a):\n    \"\"\"doc\"\"\"\n    pass\n    return ((a))\n")
            .unwrap();
        simplify(&mut tree, adapter.simplify_rules());

        let mut seen = Vec::new();
        kinds(&tree.root, &mut seen);
        assert!(!seen.contains(&"comment"));
        assert!(!seen.contains(&"string"));
        assert!(!seen.contains(&"pass_statement"));
        assert!(!seen.contains(&"parenthesized_expression"));
        assert!(seen.contains(&"return_statement"));
    }

    #[test]
    fn test_unwrapped_child_keeps_parent_field() {
        let adapter = Language::C.adapter();
        let mut tree = adapter.parse("int f(int a) { if (a) return 1; return 0; }\n").unwrap();
        simplify(&mut tree, adapter.simplify_rules());

        let func = &tree.root.children[0];
        let body = func.child_by_field("body").unwrap();
        let if_stmt = body.children_of_kind("if_statement").next().unwrap();
        let cond = if_stmt.child_by_field("condition").unwrap();
        assert_eq!(cond.kind, "identifier");
    }
}
