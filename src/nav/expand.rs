// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bulk expand/collapse.

use crate::model::Tree;

/// Expanding more descendants than this asks for confirmation first.
pub const EXPAND_CONFIRM_THRESHOLD: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandPlan {
    /// Leaf or unknown node.
    Nothing,
    Run,
    Confirm { descendants: usize },
}

/// Payload flag selecting which loops `expand_loops` reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopFlag {
    Target,
    Relevant,
}

pub fn plan_expand_all(tree: &Tree, id: &str) -> ExpandPlan {
    match tree.get(id).map(|node| node.children_d().len()) {
        None | Some(0) => ExpandPlan::Nothing,
        Some(descendants) if descendants > EXPAND_CONFIRM_THRESHOLD => {
            ExpandPlan::Confirm { descendants }
        }
        Some(_) => ExpandPlan::Run,
    }
}

/// Opens `id` and all its descendants. Returns how many nodes changed.
pub fn expand_all(tree: &mut Tree, id: &str) -> usize {
    set_subtree_opened(tree, id, true)
}

/// Closes `id` and all its descendants.
pub fn collapse_all(tree: &mut Tree, id: &str) -> usize {
    set_subtree_opened(tree, id, false)
}

fn set_subtree_opened(tree: &mut Tree, id: &str, opened: bool) -> usize {
    let Some(node) = tree.get(id) else {
        return 0;
    };
    let mut ids = Vec::with_capacity(node.children_d().len() + 1);
    ids.push(node.id().clone());
    ids.extend(node.children_d().iter().cloned());
    ids.iter()
        .filter(|id| tree.set_opened(id.as_str(), opened))
        .count()
}

/// Reveals every flagged descendant of `id` and fully expands it. Returns changed nodes.
pub fn expand_loops(tree: &mut Tree, id: &str, flag: LoopFlag) -> usize {
    let Some(node) = tree.get(id) else {
        return 0;
    };
    let flagged = node
        .children_d()
        .iter()
        .filter_map(|child| tree.get(child.as_str()))
        .filter(|child| match flag {
            LoopFlag::Target => child.payload().target,
            LoopFlag::Relevant => child.payload().relevant,
        })
        .map(|child| (child.id().clone(), child.parents().to_vec()))
        .collect::<Vec<_>>();

    let mut changed = 0;
    for (loop_id, parents) in flagged {
        changed += parents
            .iter()
            .filter(|parent| tree.set_opened(parent.as_str(), true))
            .count();
        changed += expand_all(tree, loop_id.as_str());
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::{
        collapse_all, expand_all, expand_loops, plan_expand_all, ExpandPlan, LoopFlag,
        EXPAND_CONFIRM_THRESHOLD,
    };
    use crate::model::fixtures::{demo_session, wide_session};
    use crate::query::is_visible;

    #[test]
    fn plan_requires_confirmation_above_threshold() {
        let session = wide_session(1, EXPAND_CONFIRM_THRESHOLD + 1);
        assert_eq!(
            plan_expand_all(session.tree(), "f0"),
            ExpandPlan::Confirm { descendants: EXPAND_CONFIRM_THRESHOLD + 1 }
        );
        let session = wide_session(1, EXPAND_CONFIRM_THRESHOLD);
        assert_eq!(plan_expand_all(session.tree(), "f0"), ExpandPlan::Run);
        assert_eq!(plan_expand_all(session.tree(), "f0l511"), ExpandPlan::Nothing);
    }

    #[test]
    fn expand_then_collapse_whole_subtree() {
        let mut session = demo_session().expect("demo");
        let tree = session.tree_mut();
        assert!(expand_all(tree, "f2") > 0);
        assert!(tree
            .iter()
            .filter(|node| node.parents().iter().any(|parent| parent.as_str() == "f2"))
            .all(|node| is_visible(tree, node)));

        collapse_all(tree, "f2");
        assert!(!tree.get("f2").expect("f2").state().opened);
        assert!(!is_visible(tree, tree.get("s1").expect("s1")));
    }

    #[test]
    fn expand_target_loops_reveals_flagged_descendants() {
        let mut session = demo_session().expect("demo");
        let tree = session.tree_mut();
        assert!(!is_visible(tree, tree.get("l3b").expect("l3b")));
        expand_loops(tree, "f2", LoopFlag::Target);
        assert!(is_visible(tree, tree.get("l3b").expect("l3b")));
        assert!(!tree.get("b1").expect("b1").state().opened);

        expand_loops(tree, "f2", LoopFlag::Relevant);
        assert!(tree.get("b1").expect("b1").state().opened);
        assert_eq!(expand_loops(tree, "l4", LoopFlag::Relevant), 0);
    }
}
