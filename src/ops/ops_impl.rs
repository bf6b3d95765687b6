// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Nodes a judgment applies to: the invoking node (plus the other checked relevant nodes when
/// it is itself checked), each followed by its same-line siblings. No duplicates.
fn judgment_targets(session: &Session, node_id: &NodeId) -> Vec<NodeId> {
    let tree = session.tree();
    let Some(node) = tree.get(node_id.as_str()) else {
        return Vec::new();
    };

    let mut base = Vec::new();
    if node.state().checked {
        base.extend(
            tree.checked()
                .filter(|other| other.payload().relevant && other.id() != node_id)
                .map(|other| other.id().clone()),
        );
    }
    base.push(node_id.clone());

    let mut seen = std::collections::HashSet::with_capacity(base.len());
    let mut affected = Vec::with_capacity(base.len());
    for id in base {
        let siblings = tree
            .get(id.as_str())
            .and_then(|base_node| {
                let payload = base_node.payload();
                Some(session.tables().same_line(payload.loc.as_deref()?, payload.sl?))
            })
            .unwrap_or_default();

        if seen.insert(id.clone()) {
            affected.push(id);
        }
        for sibling in siblings {
            if tree.contains(sibling.as_str()) && seen.insert(sibling.clone()) {
                affected.push(sibling.clone());
            }
        }
    }
    affected
}

fn apply_judgment(session: &mut Session, node_id: &NodeId, judgment: &Judgment) -> Vec<NodeId> {
    let affected = judgment_targets(session, node_id);
    let tree = session.tree_mut();
    for id in &affected {
        if let Some(node) = tree.get_mut(id.as_str()) {
            node.label_mut().apply_judgment(judgment);
        }
    }
    tracing::debug!(
        node_id = node_id.as_str(),
        judgment = judgment.as_str(),
        affected = affected.len(),
        "judgment applied"
    );
    affected
}

fn apply_estimation(
    session: &mut Session,
    node_id: &NodeId,
    level: u8,
) -> Result<Vec<NodeId>, EditError> {
    let node = session
        .tree_mut()
        .get_mut(node_id.as_str())
        .ok_or_else(|| EditError::NotFound { node_id: node_id.clone() })?;
    let Some(scheme) = node.label_mut().estimation_mut() else {
        return Err(EditError::NoEstimationScheme { node_id: node_id.clone() });
    };
    if !scheme.contains(level) {
        return Err(EditError::LevelOutOfRange {
            node_id: node_id.clone(),
            level,
            levels: scheme.levels(),
        });
    }
    let prev = scheme.set_level(level);
    tracing::debug!(node_id = node_id.as_str(), prev, level, "estimation level changed");
    Ok(vec![node_id.clone()])
}

fn apply_comment(session: &mut Session, node_id: &NodeId, comment: &str) -> Vec<NodeId> {
    if let Some(node) = session.tree_mut().get_mut(node_id.as_str()) {
        node.label_mut().set_comment(comment.to_owned());
    }
    vec![node_id.clone()]
}
