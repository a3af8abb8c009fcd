//! Structural checks for node tables.
//!
//! A well-formed table has its root at id 0 typed `root`, ids equal to their
//! positions, children that always point forward, and every non-root node
//! referenced by exactly one parent.

use crate::node::{NodeId, NodeTable, ROOT_KIND};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("table is empty")]
    Empty,
    #[error("root node has type `{0}`, expected `root`")]
    RootType(String),
    #[error("node at position {position} carries id {id}")]
    IdMismatch { position: usize, id: NodeId },
    #[error("node {parent} references child {child} which does not come after it")]
    BackReference { parent: NodeId, child: NodeId },
    #[error("node {parent} references child {child} outside the table (len {len})")]
    OutOfRange {
        parent: NodeId,
        child: NodeId,
        len: usize,
    },
    #[error("node {child} has two parents: {first} and {second}")]
    SharedChild {
        child: NodeId,
        first: NodeId,
        second: NodeId,
    },
    #[error("node {0} is not reachable from the root")]
    Orphan(NodeId),
}

/// Check every table invariant, returning the first violation found.
pub fn validate(table: &NodeTable) -> Result<(), TableError> {
    let root = table.root().ok_or(TableError::Empty)?;
    if root.kind != ROOT_KIND {
        return Err(TableError::RootType(root.kind.to_string()));
    }

    let len = table.len();
    let mut parent_of: Vec<Option<NodeId>> = vec![None; len];

    for (position, node) in table.iter().enumerate() {
        if node.id != position {
            return Err(TableError::IdMismatch {
                position,
                id: node.id,
            });
        }
        for &child in &node.children {
            if child >= len {
                return Err(TableError::OutOfRange {
                    parent: node.id,
                    child,
                    len,
                });
            }
            if child <= node.id {
                return Err(TableError::BackReference {
                    parent: node.id,
                    child,
                });
            }
            if let Some(first) = parent_of[child] {
                return Err(TableError::SharedChild {
                    child,
                    first,
                    second: node.id,
                });
            }
            parent_of[child] = Some(node.id);
        }
    }

    // Forward-only edges rule out cycles, so one parent each means a tree.
    if let Some(orphan) = (1..len).find(|&id| parent_of[id].is_none()) {
        return Err(TableError::Orphan(orphan));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GenericNode;
    use std::borrow::Cow;

    fn node(id: NodeId, kind: &'static str, children: Vec<NodeId>) -> GenericNode {
        GenericNode {
            id,
            kind: Cow::Borrowed(kind),
            value: None,
            children,
        }
    }

    #[test]
    fn test_valid_table() {
        let table = NodeTable::from(vec![
            node(0, "root", vec![1, 3]),
            node(1, "call", vec![2]),
            node(2, "identifier", vec![]),
            node(3, "pass", vec![]),
        ]);
        assert_eq!(validate(&table), Ok(()));
    }

    #[test]
    fn test_empty_and_root_type() {
        assert_eq!(validate(&NodeTable::new()), Err(TableError::Empty));
        let table = NodeTable::from(vec![node(0, "module", vec![])]);
        assert_eq!(
            validate(&table),
            Err(TableError::RootType("module".into()))
        );
    }

    #[test]
    fn test_back_reference_rejected() {
        let table = NodeTable::from(vec![
            node(0, "root", vec![1]),
            node(1, "block", vec![1]),
        ]);
        assert_eq!(
            validate(&table),
            Err(TableError::BackReference {
                parent: 1,
                child: 1
            })
        );
    }

    #[test]
    fn test_id_mismatch_rejected() {
        let table = NodeTable::from(vec![node(0, "root", vec![]), node(2, "x", vec![])]);
        assert_eq!(
            validate(&table),
            Err(TableError::IdMismatch { position: 1, id: 2 })
        );
    }

    #[test]
    fn test_shared_child_and_orphan() {
        let shared = NodeTable::from(vec![
            node(0, "root", vec![1, 2]),
            node(1, "a", vec![2]),
            node(2, "b", vec![]),
        ]);
        assert_eq!(
            validate(&shared),
            Err(TableError::SharedChild {
                child: 2,
                first: 0,
                second: 1
            })
        );

        let orphan = NodeTable::from(vec![node(0, "root", vec![]), node(1, "a", vec![])]);
        assert_eq!(validate(&orphan), Err(TableError::Orphan(1)));
    }
}
