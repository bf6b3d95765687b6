// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;

/// The single active result set shared by search, target and callee navigation.
///
/// Navigation-built results carry an empty keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    keyword: String,
    nodes: Vec<NodeId>,
    cursor: usize,
}

impl SearchResult {
    pub fn new(keyword: impl Into<String>, nodes: Vec<NodeId>) -> Self {
        Self { keyword: keyword.into(), nodes, cursor: 0 }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.nodes.get(self.cursor)
    }

    /// Moves the cursor forward, wrapping to the first entry.
    pub fn advance(&mut self) -> Option<&NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.nodes.len();
        self.current()
    }

    /// Moves the cursor back, wrapping to the last entry.
    pub fn retreat(&mut self) -> Option<&NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        self.cursor = self.cursor.checked_sub(1).unwrap_or(self.nodes.len() - 1);
        self.current()
    }
}
