// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use super::ids::NodeId;
use super::node::Node;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("duplicate node id {node_id}")]
    DuplicateId { node_id: NodeId },
    #[error("parent {parent_id} of node {node_id} is not in the tree")]
    UnknownParent { node_id: NodeId, parent_id: NodeId },
}

/// The outline: every node keyed by id plus the pre-order traversal of the whole tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    top: Vec<NodeId>,
    order: Vec<NodeId>,
}

impl Tree {
    pub fn builder() -> TreeBuilder {
        TreeBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Direct children of the implicit root.
    pub fn top_level(&self) -> &[NodeId] {
        &self.top
    }

    /// Every node id in pre-order (the root's `children_d`).
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id.as_str()))
    }

    pub fn set_opened(&mut self, id: &str, opened: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.state().opened != opened => {
                node.state_mut().opened = opened;
                true
            }
            _ => false,
        }
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.state_mut().selected = selected;
        }
    }

    /// Checked nodes in pre-order.
    pub fn checked(&self) -> impl Iterator<Item = &Node> + '_ {
        self.iter().filter(|node| node.state().checked)
    }
}

/// Accumulates nodes parent-first and derives the structural fields.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: HashMap<NodeId, Node>,
    top: Vec<NodeId>,
}

impl TreeBuilder {
    /// Adds `node` under `parent` (or at top level). Parents must be inserted first; sibling
    /// order is insertion order.
    pub fn insert(&mut self, parent: Option<&NodeId>, mut node: Node) -> Result<(), TreeError> {
        let node_id = node.id().clone();
        if self.nodes.contains_key(&node_id) {
            return Err(TreeError::DuplicateId { node_id });
        }

        match parent {
            None => self.top.push(node_id.clone()),
            Some(parent_id) => {
                let Some(parent_node) = self.nodes.get_mut(parent_id) else {
                    return Err(TreeError::UnknownParent {
                        node_id,
                        parent_id: parent_id.clone(),
                    });
                };
                parent_node.children_mut().push(node_id.clone());
                let mut parents = Vec::with_capacity(parent_node.parents().len() + 1);
                parents.push(parent_id.clone());
                parents.extend(parent_node.parents().iter().cloned());
                node.set_parents(parents);
            }
        }

        self.nodes.insert(node_id, node);
        Ok(())
    }

    pub fn finish(mut self) -> Tree {
        let mut order = Vec::with_capacity(self.nodes.len());
        for top_id in &self.top {
            collect_preorder(&mut self.nodes, top_id, &mut order);
        }
        Tree { nodes: self.nodes, top: self.top, order }
    }
}

fn collect_preorder(nodes: &mut HashMap<NodeId, Node>, id: &NodeId, order: &mut Vec<NodeId>) {
    order.push(id.clone());
    let start = order.len();
    let children = nodes
        .get(id)
        .map(|node| node.children().to_vec())
        .unwrap_or_default();
    for child in &children {
        collect_preorder(nodes, child, order);
    }
    if let Some(node) = nodes.get_mut(id) {
        node.set_children_d(order[start..].to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::{Tree, TreeError};
    use crate::model::{LabelState, Node, NodeId, NodeKind, Payload};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn node(id: &str) -> Node {
        Node::new(nid(id), NodeKind::Default, LabelState::new(id), Payload::default())
    }

    #[test]
    fn builder_derives_parents_and_descendants() {
        let mut builder = Tree::builder();
        builder.insert(None, node("f")).expect("f");
        builder.insert(Some(&nid("f")), node("s")).expect("s");
        builder.insert(Some(&nid("s")), node("l1")).expect("l1");
        builder.insert(Some(&nid("s")), node("l2")).expect("l2");
        let tree = builder.finish();

        let l1 = tree.get("l1").expect("l1");
        assert_eq!(l1.parents(), &[nid("s"), nid("f")]);
        let f = tree.get("f").expect("f");
        assert_eq!(f.children_d(), &[nid("s"), nid("l1"), nid("l2")]);
        assert_eq!(tree.order(), &[nid("f"), nid("s"), nid("l1"), nid("l2")]);
    }

    #[test]
    fn builder_rejects_unknown_parent_and_duplicates() {
        let mut builder = Tree::builder();
        builder.insert(None, node("a")).expect("a");
        assert_eq!(
            builder.insert(None, node("a")),
            Err(TreeError::DuplicateId { node_id: nid("a") })
        );
        assert!(matches!(
            builder.insert(Some(&nid("zz")), node("b")),
            Err(TreeError::UnknownParent { .. })
        ));
    }
}
