// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;

use super::ids::NodeId;

pub const HISTORY_SIZE: usize = 3;

/// Most-recent-first list of visited node ids used by "back".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<NodeId>,
}

impl History {
    pub fn push(&mut self, id: NodeId) {
        self.entries.push_front(id);
        self.entries.truncate(HISTORY_SIZE);
    }

    pub fn latest(&self) -> Option<&NodeId> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::History;
    use crate::model::NodeId;

    #[test]
    fn history_keeps_three_most_recent_first() {
        let mut history = History::default();
        for id in ["1", "2", "3", "4"] {
            history.push(NodeId::new(id).expect("node id"));
        }
        let ids = history.iter().map(NodeId::as_str).collect::<Vec<_>>();
        assert_eq!(ids, ["4", "3", "2"]);
        assert_eq!(history.latest().map(NodeId::as_str), Some("4"));
    }
}
