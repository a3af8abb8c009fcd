//! The tree builder: one recursive walk over a native tree under a policy.
//!
//! Every node is allocated before its children are visited, so ids grow
//! along a preorder walk and every child id is greater than its parent's.

use crate::native::{NativeNode, NativeTree};
use crate::policy::{
    Access, Children, Disposition, GapRule, Policy, Rule, Select, Shape, Slot, TypeRule,
    ValueRule, binary_symbol, compound_symbol, unary_symbol, unquote,
};
use gast_core::node::{NodeId, NodeTable, NodeValue, ROOT_KIND};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

/// Type given to an unwrapped wrapper that selected several children.
const FALLBACK_KIND: &str = "expression";

/// A finished node table plus the native kinds the policy had no rule for.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: NodeTable,
    pub gaps: BTreeMap<&'static str, usize>,
}

impl Normalized {
    /// Total number of nodes that hit a normalization gap.
    pub fn gap_count(&self) -> usize {
        self.gaps.values().sum()
    }
}

/// Normalize a whole native tree. The table root is always `root`.
pub fn generate(tree: &NativeTree, policy: &Policy) -> Normalized {
    TreeBuilder::new(tree, policy).build()
}

pub struct TreeBuilder<'a> {
    tree: &'a NativeTree,
    policy: &'a Policy,
    table: NodeTable,
    gaps: BTreeMap<&'static str, usize>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tree: &'a NativeTree, policy: &'a Policy) -> Self {
        Self {
            tree,
            policy,
            table: NodeTable::new(),
            gaps: BTreeMap::new(),
        }
    }

    pub fn build(mut self) -> Normalized {
        let tree = self.tree;
        let root = self.table.alloc(ROOT_KIND, None);
        for child in tree.root.named_children() {
            self.attach(root, child, Access::Load);
        }

        if !self.gaps.is_empty() {
            debug!(
                language = %self.policy.language(),
                granularity = %self.policy.granularity(),
                gaps = ?self.gaps,
                "normalization gaps"
            );
        }
        Normalized {
            table: self.table,
            gaps: self.gaps,
        }
    }

    /// Normalize one native node, returning the id standing for it (if any).
    ///
    /// `tail` carries trailing alternatives (elif chains) that belong to this
    /// node's alternate slot.
    pub fn normalize(
        &mut self,
        node: &'a NativeNode,
        access: Access,
        tail: &[&'a NativeNode],
    ) -> Option<NodeId> {
        if !node.named {
            return None;
        }
        let Some(disposition) = self.policy.disposition(node.kind) else {
            return self.gap(node, access);
        };
        match disposition {
            Disposition::Skip => None,
            Disposition::Unwrap(select) => {
                let selected = self.select(node, select);
                match selected.as_slice() {
                    [] => None,
                    [only] => self.normalize(*only, access, tail),
                    many => {
                        let id = self.table.alloc(FALLBACK_KIND, None);
                        for &child in many {
                            self.attach(id, child, access);
                        }
                        Some(id)
                    }
                }
            }
            Disposition::Emit(rule) => Some(self.emit(node, rule, access, tail)),
        }
    }

    fn emit(
        &mut self,
        node: &'a NativeNode,
        Rule(ty, value, children): Rule,
        access: Access,
        tail: &[&'a NativeNode],
    ) -> NodeId {
        let kind = self.type_name(node, ty, access);
        let value = self.value(node, value);
        let id = self.table.alloc(kind, value);

        match children {
            Children::Childless => {}
            Children::All(ctx) => {
                let access = ctx.resolve(access);
                for child in node.named_children() {
                    self.attach(id, child, access);
                }
            }
            Children::Slots(slots) => {
                let mut tail = tail;
                for slot in slots {
                    if self.fill(id, node, *slot, access, tail) {
                        tail = &[];
                    }
                }
            }
        }
        id
    }

    /// Fill one slot of `parent`. Returns true if the slot consumed `tail`.
    fn fill(
        &mut self,
        parent: NodeId,
        node: &'a NativeNode,
        Slot(select, shape, ctx): Slot,
        access: Access,
        tail: &[&'a NativeNode],
    ) -> bool {
        let access = ctx.resolve(access);
        match shape {
            Shape::Direct => {
                for child in self.select(node, select) {
                    self.attach(parent, child, access);
                }
            }
            Shape::Inline => {
                for child in self.select(node, select) {
                    for item in self.splice(child) {
                        self.attach(parent, item, access);
                    }
                }
            }
            Shape::Group(kind) => {
                let group = self.synthetic(parent, kind);
                for child in self.select(node, select) {
                    for item in self.splice(child) {
                        self.attach(group, item, access);
                    }
                }
            }
            Shape::Placeholder(kind) => {
                self.synthetic(parent, kind);
            }
            Shape::Alternate(kind) => {
                let mut selected = self.select(node, select);
                selected.extend_from_slice(tail);
                let Some((&first, rest)) = selected.split_first() else {
                    return true;
                };
                let group = self.synthetic(parent, kind);
                if self.policy.is_clause(first.kind) || self.policy.is_container(first.kind) {
                    for &child in &selected {
                        for item in self.splice(child) {
                            self.attach(group, item, access);
                        }
                    }
                } else if let Some(id) = self.normalize(first, access, rest) {
                    self.table.push_child(group, id);
                }
                return true;
            }
        }
        false
    }

    fn attach(&mut self, parent: NodeId, child: &'a NativeNode, access: Access) {
        if let Some(id) = self.normalize(child, access, &[]) {
            self.table.push_child(parent, id);
        }
    }

    fn synthetic(&mut self, parent: NodeId, kind: &'static str) -> NodeId {
        let id = self.table.alloc(kind, None);
        self.table.push_child(parent, id);
        id
    }

    fn gap(&mut self, node: &'a NativeNode, access: Access) -> Option<NodeId> {
        *self.gaps.entry(node.kind).or_default() += 1;
        match self.policy.gap_rule() {
            GapRule::Drop => None,
            GapRule::Recurse => {
                let id = self.table.alloc(node.kind, None);
                for child in node.named_children() {
                    self.attach(id, child, access);
                }
                Some(id)
            }
        }
    }

    /// Items a grouping slot attaches for `node`: a clause contributes its
    /// children (containers flattened), a container its named children,
    /// anything else itself.
    fn splice(&self, node: &'a NativeNode) -> Vec<&'a NativeNode> {
        if self.policy.is_clause(node.kind) {
            node.named_children()
                .flat_map(|child| {
                    if self.policy.is_container(child.kind) {
                        child.named_children().collect::<Vec<_>>()
                    } else {
                        vec![child]
                    }
                })
                .collect()
        } else if self.policy.is_container(node.kind) {
            node.named_children().collect()
        } else {
            vec![node]
        }
    }

    fn select(&self, node: &'a NativeNode, select: Select) -> Vec<&'a NativeNode> {
        match select {
            Select::Named => node.named_children().collect(),
            Select::Field(field) => node.children_by_field(field).collect(),
            Select::Kind(kind) => node.children_of_kind(kind).collect(),
            Select::Nth(n) => node.significant_children().nth(n).into_iter().collect(),
            Select::Declarator(field) => node
                .child_by_field("declarator")
                .and_then(|d| d.declarator_with_field(field))
                .map(|d| d.children_by_field(field).collect())
                .unwrap_or_default(),
            Select::Chain(field) => node.chained_field(field),
        }
    }

    fn type_name(&self, node: &NativeNode, ty: TypeRule, access: Access) -> Cow<'static, str> {
        match ty {
            TypeRule::Fixed(kind) => Cow::Borrowed(kind),
            TypeRule::Native => {
                let prefix = self.policy.prefix();
                if prefix.is_empty() {
                    Cow::Borrowed(node.kind)
                } else {
                    Cow::Owned(format!("{prefix}{}", node.kind))
                }
            }
            TypeRule::Binary => {
                Cow::Borrowed(node.operator().map_or("", |op| binary_symbol(op.kind)))
            }
            TypeRule::Unary => {
                Cow::Borrowed(node.operator().map_or("", |op| unary_symbol(op.kind)))
            }
            TypeRule::Context { load, store, param } => Cow::Borrowed(match access {
                Access::Load => load,
                Access::Store => store,
                Access::Param => param,
            }),
            TypeRule::Tagged {
                field,
                tags,
                default,
            } => {
                let inner = node.child_by_field(field).map(|c| c.kind);
                let tag = tags
                    .iter()
                    .find(|&&(kind, _)| Some(kind) == inner)
                    .map_or(default, |&(_, tag)| tag);
                Cow::Borrowed(tag)
            }
        }
    }

    fn value(&self, node: &NativeNode, rule: ValueRule) -> Option<NodeValue> {
        let text = |n: &NativeNode| self.tree.text(n).to_string();
        match rule {
            ValueRule::Absent => None,
            ValueRule::Literal => Some(NodeValue::coerce(self.tree.text(node))),
            ValueRule::Unquoted => Some(NodeValue::Str(unquote(self.tree.text(node)).to_string())),
            ValueRule::Text => Some(NodeValue::Str(text(node))),
            ValueRule::FieldText(field) => {
                node.child_by_field(field).map(|c| NodeValue::Str(text(c)))
            }
            ValueRule::KindText(kind) => node
                .children_of_kind(kind)
                .next()
                .map(|c| NodeValue::Str(text(c))),
            ValueRule::DeclName => {
                let inner = node.innermost_declarator();
                if std::ptr::eq(inner, node) && node.has_named_children() {
                    None
                } else {
                    Some(NodeValue::Str(text(inner)))
                }
            }
            ValueRule::Compound => node
                .operator()
                .and_then(|op| compound_symbol(op.kind))
                .map(NodeValue::from),
            ValueRule::Constant(value) => Some(NodeValue::from(value)),
            ValueRule::LeafText => {
                (!node.has_named_children()).then(|| NodeValue::coerce(self.tree.text(node)))
            }
        }
    }
}
