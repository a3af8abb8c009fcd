//! Owned native syntax trees and the per-language adapter boundary.

use crate::languages::Language;
use crate::policy::{Granularity, RuleTable};
use crate::simplify::SimplifyRules;
use std::ops::Range;

/// Why a native parser rejected a source file. Always terminal for that file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("failed to load {language} grammar: {reason}")]
    Grammar {
        language: &'static str,
        reason: String,
    },
    #[error("{language} parser produced no tree")]
    NoTree { language: &'static str },
    #[error("syntax error at line {line}:{column}: {detail}")]
    Syntax {
        line: usize,
        column: usize,
        detail: String,
    },
    #[error("syntax tree nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// One node of a native tree, detached from the parser that produced it.
///
/// Anonymous tokens are kept so operator symbols can be read off the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNode {
    pub kind: &'static str,
    /// Field name this node occupies in its parent, if any.
    pub field: Option<&'static str>,
    pub named: bool,
    pub extra: bool,
    pub span: Range<usize>,
    pub children: Vec<NativeNode>,
}

impl NativeNode {
    pub fn named_children(&self) -> impl Iterator<Item = &NativeNode> {
        self.children.iter().filter(|c| c.named)
    }

    /// Named children that are not extras (comments and the like).
    pub fn significant_children(&self) -> impl Iterator<Item = &NativeNode> {
        self.named_children().filter(|c| !c.extra)
    }

    pub fn has_named_children(&self) -> bool {
        self.children.iter().any(|c| c.named)
    }

    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a NativeNode> {
        self.named_children().filter(move |c| c.field == Some(field))
    }

    pub fn child_by_field(&self, field: &str) -> Option<&NativeNode> {
        self.named_children().find(|c| c.field == Some(field))
    }

    pub fn children_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a NativeNode> {
        self.named_children().filter(move |c| c.kind == kind)
    }

    /// The operator token of an operator expression: the first anonymous
    /// child in an `operator`/`operators` field, else the first anonymous
    /// child at all.
    pub fn operator(&self) -> Option<&NativeNode> {
        self.children
            .iter()
            .find(|c| !c.named && matches!(c.field, Some("operator" | "operators")))
            .or_else(|| self.children.iter().find(|c| !c.named))
    }

    /// The next link of a declarator chain: the `declarator` field, or the
    /// wrapped declarator of a fieldless wrapper such as `(*fp)`.
    pub fn next_declarator(&self) -> Option<&NativeNode> {
        self.child_by_field("declarator").or_else(|| match self.kind {
            "parenthesized_declarator" | "attributed_declarator" => self
                .significant_children()
                .find(|c| c.kind != "attribute_declaration"),
            _ => None,
        })
    }

    /// Follow the declarator chain to its innermost node.
    pub fn innermost_declarator(&self) -> &NativeNode {
        let mut current = self;
        while let Some(next) = current.next_declarator() {
            current = next;
        }
        current
    }

    /// Walk the declarator chain and return the first node carrying `field`.
    pub fn declarator_with_field(&self, field: &str) -> Option<&NativeNode> {
        let mut current = self;
        loop {
            if current.child_by_field(field).is_some() {
                return Some(current);
            }
            current = current.next_declarator()?;
        }
    }

    /// Children in `field` of every node of the same kind along the
    /// declarator chain, innermost first (`a[3][4]` yields 3, then 4).
    pub fn chained_field(&self, field: &str) -> Vec<&NativeNode> {
        let mut links = vec![self];
        let mut current = self;
        while let Some(next) = current.next_declarator()
            && next.kind == self.kind
        {
            links.push(next);
            current = next;
        }
        links
            .into_iter()
            .rev()
            .flat_map(|link| link.named_children().filter(move |c| c.field == Some(field)))
            .collect()
    }

    /// Count of nodes in this subtree, anonymous tokens included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(NativeNode::size).sum::<usize>()
    }
}

/// A parsed source file: the root node plus the text its spans index into.
#[derive(Debug, Clone)]
pub struct NativeTree {
    pub language: Language,
    pub source: String,
    pub root: NativeNode,
}

impl NativeTree {
    pub fn text(&self, node: &NativeNode) -> &str {
        self.source.get(node.span.clone()).unwrap_or("")
    }
}

/// Per-language boundary around an external parser.
///
/// Implementations hold no mutable state: every `parse` call builds its own
/// parser, so one adapter is shared by all workers.
pub trait NativeAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Parse source text into an owned native tree.
    fn parse(&self, source: &str) -> Result<NativeTree, ParseFailure> {
        crate::treesitter::parse_native(self.language(), source)
    }

    /// Rule table for a granularity. `None` means verbatim (native kinds, 1:1).
    fn rules(&self, granularity: Granularity) -> Option<&'static RuleTable>;

    /// Prefix applied to native kind names under the verbatim policy.
    fn verbatim_prefix(&self) -> &'static str;

    /// Block- and list-like kinds whose children are spliced into synthetic
    /// grouping nodes.
    fn containers(&self) -> &'static [&'static str];

    /// Wrapper kinds (`else`, `finally`, ...) that grouping sees through.
    fn clauses(&self) -> &'static [&'static str];

    fn simplify_rules(&self) -> &'static SimplifyRules;
}
