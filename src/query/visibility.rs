// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Node, NodeId, Tree};

/// True iff every ancestor of `node` is opened.
pub fn is_visible(tree: &Tree, node: &Node) -> bool {
    node.parents().iter().all(|parent_id| {
        tree.get(parent_id.as_str())
            .map_or(true, |parent| parent.state().opened)
    })
}

/// One row of the flattened, currently visible outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub depth: usize,
}

/// Visible nodes in pre-order, skipping the subtrees of closed nodes.
pub fn visible_rows(tree: &Tree) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(&NodeId, usize)> = tree.top_level().iter().rev().map(|id| (id, 0)).collect();

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id.as_str()) else {
            continue;
        };
        rows.push(VisibleRow { id: id.clone(), depth });
        if node.state().opened {
            stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{is_visible, visible_rows};
    use crate::model::{LabelState, Node, NodeId, NodeKind, NodeState, Payload, Tree};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn node(id: &str, opened: bool) -> Node {
        Node::new(nid(id), NodeKind::Default, LabelState::new(id), Payload::default())
            .with_state(NodeState { opened, ..NodeState::default() })
    }

    fn chain() -> Tree {
        let mut builder = Tree::builder();
        builder.insert(None, node("r", true)).expect("r");
        builder.insert(Some(&nid("r")), node("a", false)).expect("a");
        builder.insert(Some(&nid("a")), node("b", false)).expect("b");
        builder.finish()
    }

    #[test]
    fn opening_ancestor_reveals_descendant() {
        let mut tree = chain();
        let before = tree.clone();
        assert!(!is_visible(&tree, tree.get("b").expect("b")));

        assert!(tree.set_opened("a", true));
        assert!(is_visible(&tree, tree.get("b").expect("b")));

        let changed = tree
            .order()
            .iter()
            .filter(|id| tree.get(id.as_str()) != before.get(id.as_str()))
            .map(NodeId::as_str)
            .collect::<Vec<_>>();
        assert_eq!(changed, ["a"]);
    }

    #[test]
    fn closing_any_ancestor_hides_all_descendants() {
        let mut tree = chain();
        tree.set_opened("a", true);
        tree.set_opened("r", false);
        assert!(!is_visible(&tree, tree.get("a").expect("a")));
        assert!(!is_visible(&tree, tree.get("b").expect("b")));
        assert!(is_visible(&tree, tree.get("r").expect("r")));
    }

    #[test]
    fn visible_rows_skip_closed_subtrees() {
        let mut tree = chain();
        let ids = |tree: &Tree| {
            visible_rows(tree)
                .into_iter()
                .map(|row| (row.id.into_string(), row.depth))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&tree), [("r".to_owned(), 0), ("a".to_owned(), 1)]);
        tree.set_opened("a", true);
        assert_eq!(ids(&tree).len(), 3);
    }
}
