// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use smol_str::SmolStr;

use super::ids::NodeId;

/// Repository-wide lookup tables shipped with the first top-level node.
///
/// Read once at load time; a session only ever hands out shared references. Missing tables
/// are simply empty, which turns the dependent actions into no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideTables {
    node_tbl: HashMap<SmolStr, HashMap<u32, Vec<NodeId>>>,
    callees_tbl: HashMap<String, Vec<NodeId>>,
    targets: Vec<NodeId>,
    last_nid: Option<NodeId>,
}

impl SideTables {
    pub fn new(
        node_tbl: HashMap<SmolStr, HashMap<u32, Vec<NodeId>>>,
        callees_tbl: HashMap<String, Vec<NodeId>>,
        targets: Vec<NodeId>,
        last_nid: Option<NodeId>,
    ) -> Self {
        Self { node_tbl, callees_tbl, targets, last_nid }
    }

    /// Node ids registered for the same source path and start line.
    pub fn same_line(&self, loc: &str, line: u32) -> &[NodeId] {
        self.node_tbl
            .get(loc)
            .and_then(|lines| lines.get(&line))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Candidate callee nodes; `None` when the name is unknown or maps to nothing.
    pub fn callees(&self, callee: &str) -> Option<&[NodeId]> {
        self.callees_tbl
            .get(callee)
            .filter(|ids| !ids.is_empty())
            .map(Vec::as_slice)
    }

    pub fn has_callees(&self) -> bool {
        !self.callees_tbl.is_empty()
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn last_nid(&self) -> Option<&NodeId> {
        self.last_nid.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::SideTables;
    use crate::model::NodeId;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn lookups_fall_back_to_empty() {
        let tables = SideTables::default();
        assert!(tables.same_line("a.f90", 3).is_empty());
        assert_eq!(tables.callees("foo"), None);
        assert!(!tables.has_callees());
    }

    #[test]
    fn empty_callee_list_is_unresolvable() {
        let callees = HashMap::from([
            ("foo".to_owned(), vec![nid("7")]),
            ("bar".to_owned(), Vec::new()),
        ]);
        let tables = SideTables::new(HashMap::new(), callees, Vec::new(), None);
        assert_eq!(tables.callees("foo"), Some(&[nid("7")][..]));
        assert_eq!(tables.callees("bar"), None);
    }
}
