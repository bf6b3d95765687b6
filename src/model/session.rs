// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::history::History;
use super::ids::NodeId;
use super::search_result::SearchResult;
use super::tables::SideTables;
use super::tree::Tree;

/// Context object every navigation and editing operation runs against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    tree: Tree,
    tables: SideTables,
    search: SearchResult,
    history: History,
    target_order: Vec<NodeId>,
    scan_count: u64,
}

impl Session {
    pub fn new(tree: Tree, tables: SideTables) -> Self {
        Self {
            tree,
            tables,
            search: SearchResult::default(),
            history: History::default(),
            target_order: Vec::new(),
            scan_count: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn tables(&self) -> &SideTables {
        &self.tables
    }

    pub fn search(&self) -> &SearchResult {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchResult {
        &mut self.search
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Target ids sorted by nested-scope line key. Empty until the session is readied.
    pub fn target_order(&self) -> &[NodeId] {
        &self.target_order
    }

    pub(crate) fn set_target_order(&mut self, order: Vec<NodeId>) {
        self.target_order = order;
    }

    /// Number of full keyword scans run so far.
    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    pub(crate) fn record_scan(&mut self) {
        self.scan_count += 1;
    }

    /// Splits the borrow so callers can read the side tables while mutating the tree.
    pub(crate) fn tree_and_tables_mut(&mut self) -> (&mut Tree, &SideTables) {
        (&mut self.tree, &self.tables)
    }
}
