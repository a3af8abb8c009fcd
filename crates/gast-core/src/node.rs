//! The generic node table: one flat, preorder-allocated array per source file.
//!
//! Children are referenced by table index rather than by pointer. Every node is
//! allocated before any of its descendants, so a consumer can rebuild the tree
//! in one forward scan.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Index of a node inside its [`NodeTable`].
pub type NodeId = usize;

/// Canonical type of the table root.
pub const ROOT_KIND: &str = "root";

/// Scalar payload carried by identifiers, literals and declared names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl NodeValue {
    /// Coerce literal source text: integer first, then float, else the text
    /// unchanged. `"3"` and `"3.0"` therefore land in different variants.
    ///
    /// Non-finite floats (`nan`, `inf`) stay strings since JSON cannot carry
    /// them.
    pub fn coerce(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(f) = trimmed.parse::<f64>()
            && f.is_finite()
        {
            return Self::Float(f);
        }
        Self::Str(text.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for NodeValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for NodeValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// One entry of the generic tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<NodeValue>,
    /// Omitted from JSON when empty; absent and empty mean the same thing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
}

impl GenericNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The generic tree for one source file.
///
/// Serializes as a bare JSON array of [`GenericNode`] objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTable {
    nodes: Vec<GenericNode>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id (its position in the table).
    pub fn alloc(&mut self, kind: impl Into<Cow<'static, str>>, value: Option<NodeValue>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(GenericNode {
            id,
            kind: kind.into(),
            value,
            children: Vec::new(),
        });
        id
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// Unknown parents are ignored; the builder only passes ids it allocated.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&GenericNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&GenericNode> {
        self.nodes.first()
    }

    pub fn nodes(&self) -> &[GenericNode] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenericNode> {
        self.nodes.iter()
    }

    /// Resolve the children of `id` to nodes, skipping dangling references.
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &GenericNode> + '_ {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|&c| self.nodes.get(c))
    }

    /// Serialize as one JSON Lines record (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl<'a> IntoIterator for &'a NodeTable {
    type Item = &'a GenericNode;
    type IntoIter = std::slice::Iter<'a, GenericNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl From<Vec<GenericNode>> for NodeTable {
    fn from(nodes: Vec<GenericNode>) -> Self {
        Self { nodes }
    }
}
