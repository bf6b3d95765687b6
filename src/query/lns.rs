// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Nested-scope line keys.
//!
//! A node's key is its own start line, prefixed by the start line of every ancestor where the
//! `(path, program unit)` signature changes. Sorting by key orders results by enclosing scope
//! first and line second.

use std::cmp::Ordering;

use smallvec::{smallvec, SmallVec};

use crate::model::{Node, NodeId, Tree};

pub type LineKey = SmallVec<[u32; 8]>;

pub fn get_lns(tree: &Tree, node: &Node) -> LineKey {
    let payload = node.payload();
    let mut lns: LineKey = smallvec![payload.sl.unwrap_or(0)];
    let mut current = (payload.loc.as_deref(), payload.pu.as_deref());

    for parent_id in node.parents() {
        let Some(parent) = tree.get(parent_id.as_str()) else {
            continue;
        };
        let info = (parent.payload().loc.as_deref(), parent.payload().pu.as_deref());
        if info != current {
            current = info;
            lns.insert(0, parent.payload().sl.unwrap_or(0));
        }
    }
    lns
}

/// Lexicographic order; a key that is a strict prefix of another sorts first.
pub fn cmp_lns(a: &[u32], b: &[u32]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Stable sort of `ids` by line key. Ids missing from the tree sort last.
pub fn sort_by_lns(tree: &Tree, ids: &mut [NodeId]) {
    ids.sort_by_cached_key(|id| {
        tree.get(id.as_str())
            .map(|node| (false, get_lns(tree, node)))
            .unwrap_or((true, LineKey::new()))
    });
}
