// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation that reuses the search result set: callees, targets, comments, history.

use tracing::{debug, info};

use super::search::{clear_search, collect_parents, finalize, Finalized};
use crate::model::{NodeId, Session};
use crate::query::sort_by_lns;

/// What a double-click style "activate" on a node should offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalleeChoice {
    /// Leaf with resolvable callee: ask the user to jump or open the source.
    Ask { callee: String, candidates: Vec<NodeId> },
    /// Everything else goes straight to the source.
    OpenSource,
}

/// Resolves the callee of a leaf node. Clears the active result for leaves, like a jump.
pub fn callee_choice(session: &mut Session, node_id: &str) -> CalleeChoice {
    let Some(node) = session.tree().get(node_id) else {
        return CalleeChoice::OpenSource;
    };
    if !node.is_leaf() {
        return CalleeChoice::OpenSource;
    }
    let callee = node.payload().callee.clone();
    clear_search(session);

    let Some(callee) = callee else {
        return CalleeChoice::OpenSource;
    };
    match session.tables().callees(&callee) {
        Some(candidates) => {
            debug!(node_id, callee = %callee, candidates = candidates.len(), "callee resolved");
            CalleeChoice::Ask { candidates: candidates.to_vec(), callee }
        }
        None => CalleeChoice::OpenSource,
    }
}

/// Jumps from a leaf call to its callee candidates. `None` for inner nodes or unresolvable
/// callees.
pub fn jump_to_callee(session: &mut Session, node_id: &str) -> Option<Finalized> {
    match callee_choice(session, node_id) {
        CalleeChoice::Ask { candidates, .. } => Some(confirm_callee_jump(session, node_id, candidates)),
        CalleeChoice::OpenSource => None,
    }
}

/// Completes a jump once the candidates are known (e.g. after the user picked "jump").
pub fn confirm_callee_jump(
    session: &mut Session,
    node_id: &str,
    candidates: Vec<NodeId>,
) -> Finalized {
    if let Some(node) = session.tree().get(node_id) {
        let id = node.id().clone();
        session.history_mut().push(id);
    }
    let parents = collect_parents(session.tree(), &candidates);
    finalize(session, "", parents, candidates)
}

/// Sorts the backend target list by line key. Targets missing from the tree are dropped.
pub fn setup_targets(session: &mut Session) {
    let tree = session.tree();
    let mut order = session
        .tables()
        .targets()
        .iter()
        .filter(|id| tree.contains(id.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    sort_by_lns(tree, &mut order);
    session.set_target_order(order);
}

/// Presents every target node as the active result.
pub fn jump_to_targets(session: &mut Session) -> Option<Finalized> {
    if session.target_order().is_empty() {
        return None;
    }
    clear_search(session);
    let targets = session.target_order().to_vec();
    let parents = collect_parents(session.tree(), &targets);
    Some(finalize(session, "", parents, targets))
}

/// Presents the picked commented nodes as the active result.
pub fn jump_to_comments(session: &mut Session, ids: &[NodeId]) -> Option<Finalized> {
    if ids.is_empty() {
        return None;
    }
    clear_search(session);
    let parents = collect_parents(session.tree(), ids);
    Some(finalize(session, "", parents, ids.to_vec()))
}

/// Most recent history entry.
pub fn back(session: &Session) -> Option<&NodeId> {
    session.history().latest()
}

/// Tree-ready hook: orders targets and restores the last viewed node.
///
/// Returns the node the view should scroll to.
pub fn on_ready(session: &mut Session) -> Option<NodeId> {
    setup_targets(session);
    let last = session.tables().last_nid().cloned();
    if let Some(id) = &last {
        session.history_mut().push(id.clone());
    }
    info!(
        nodes = session.tree().len(),
        targets = session.target_order().len(),
        last_nid = last.as_ref().map(|id| id.as_str()),
        "outline ready"
    );
    last
}
