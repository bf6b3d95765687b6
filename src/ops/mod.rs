// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing operations on a session: judgments, estimation levels, comments, check and
//! expansion toggles.
//!
//! Every op returns the full set of nodes it touched plus the subset that is currently
//! visible. Callers redraw the visible subset and report the full set to the log endpoint.

use thiserror::Error;

use crate::model::{Judgment, NodeId, Session};
use crate::query::is_visible;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    SetJudgment { node_id: NodeId, judgment: Judgment },
    SetEstimationLevel { node_id: NodeId, level: u8 },
    SetComment { node_id: NodeId, comment: String },
    SetChecked { node_id: NodeId, checked: bool },
    SetOpened { node_id: NodeId, opened: bool },
}

impl EditOp {
    pub fn node_id(&self) -> &NodeId {
        match self {
            Self::SetJudgment { node_id, .. }
            | Self::SetEstimationLevel { node_id, .. }
            | Self::SetComment { node_id, .. }
            | Self::SetChecked { node_id, .. }
            | Self::SetOpened { node_id, .. } => node_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    /// Every node whose state changed, invoking node included.
    pub affected: Vec<NodeId>,
    /// The part of `affected` whose ancestors are all opened.
    pub visible: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("node not found (id={node_id})")]
    NotFound { node_id: NodeId },
    #[error("node {node_id} has no estimation scheme")]
    NoEstimationScheme { node_id: NodeId },
    #[error("estimation level {level} out of range for node {node_id} ({levels} levels)")]
    LevelOutOfRange { node_id: NodeId, level: u8, levels: u8 },
}

pub fn apply_edit(session: &mut Session, op: &EditOp) -> Result<EditResult, EditError> {
    if !session.tree().contains(op.node_id().as_str()) {
        return Err(EditError::NotFound { node_id: op.node_id().clone() });
    }

    let affected = match op {
        EditOp::SetJudgment { node_id, judgment } => apply_judgment(session, node_id, judgment),
        EditOp::SetEstimationLevel { node_id, level } => {
            apply_estimation(session, node_id, *level)?
        }
        EditOp::SetComment { node_id, comment } => apply_comment(session, node_id, comment),
        EditOp::SetChecked { node_id, checked } => {
            if let Some(node) = session.tree_mut().get_mut(node_id.as_str()) {
                node.state_mut().checked = *checked;
            }
            vec![node_id.clone()]
        }
        EditOp::SetOpened { node_id, opened } => {
            session.tree_mut().set_opened(node_id.as_str(), *opened);
            vec![node_id.clone()]
        }
    };

    let tree = session.tree();
    let visible = affected
        .iter()
        .filter(|id| tree.get(id.as_str()).is_some_and(|node| is_visible(tree, node)))
        .cloned()
        .collect();
    Ok(EditResult { affected, visible })
}

// Per-op implementations; kept separate so this module stays focused on the op types.
include!("ops_impl.rs");
