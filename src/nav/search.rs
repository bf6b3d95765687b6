// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keyword search and the shared result-set finalizer.
//!
//! Search, target, callee and comment navigation all funnel their hits through
//! [`finalize`], which opens the hit ancestors, marks the hits selected, orders them by
//! nested-scope line key and installs them as the session's single active result.

use std::collections::HashSet;
use std::time::Duration;

use memchr::memmem;
use tracing::{debug, info};

use crate::model::{NodeId, SearchResult, Session, Tree};
use crate::query::sort_by_lns;

/// Quiet period after the last keystroke before a scan runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Which node text a keyword is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DataSource {
    #[default]
    All,
    Code,
    Comment,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Code => "Code",
            Self::Comment => "Comment",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Code,
            Self::Code => Self::Comment,
            Self::Comment => Self::All,
        }
    }

    pub fn searches_code(self) -> bool {
        matches!(self, Self::All | Self::Code)
    }

    pub fn searches_comment(self) -> bool {
        matches!(self, Self::All | Self::Comment)
    }
}

/// What `finalize` did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finalized {
    /// Hit count, shown by the match indicator even when zero.
    pub count: usize,
    /// Ancestors that had to be opened.
    pub opened: Vec<NodeId>,
    /// First hit in key order; the view scrolls here.
    pub first: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty keyword: the previous result was dropped.
    Cleared { deselected: Vec<NodeId> },
    /// Same keyword as the active result: the cursor moved without rescanning.
    Advanced { cursor: usize, node: NodeId },
    /// A fresh scan ran; callers log it.
    Scanned {
        keyword: String,
        source: DataSource,
        result: Finalized,
    },
}

/// Runs a (debounced) search request against the session.
pub fn search(session: &mut Session, keyword: &str, source: DataSource) -> SearchOutcome {
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return SearchOutcome::Cleared {
            deselected: clear_search(session),
        };
    }

    if keyword == session.search().keyword() {
        let result = session.search_mut();
        if let Some(node) = result.advance().cloned() {
            return SearchOutcome::Advanced { cursor: result.cursor(), node };
        }
    }

    clear_search(session);
    let hits = scan(session, &keyword, source);
    let parents = collect_parents(session.tree(), &hits);
    let result = finalize(session, &keyword, parents, hits);
    SearchOutcome::Scanned { keyword, source, result }
}

/// Clears and re-runs the search after the data source changed. No-op for an empty keyword.
pub fn change_data_source(
    session: &mut Session,
    keyword: &str,
    source: DataSource,
) -> Option<SearchOutcome> {
    if keyword.is_empty() {
        return None;
    }
    clear_search(session);
    Some(search(session, keyword, source))
}

/// Full pass over the tree; `keyword` must already be lowercase.
pub fn scan(session: &mut Session, keyword: &str, source: DataSource) -> Vec<NodeId> {
    session.record_scan();
    let finder = memmem::Finder::new(keyword.as_bytes());
    let matches = |text: Option<&str>| {
        text.is_some_and(|text| finder.find(text.to_lowercase().as_bytes()).is_some())
    };

    let tree = session.tree();
    let hits = tree
        .iter()
        .filter(|node| {
            (source.searches_code() && matches(node.payload().code.as_deref()))
                || (source.searches_comment() && matches(node.label().comment()))
        })
        .map(|node| node.id().clone())
        .collect::<Vec<_>>();

    debug!(keyword, source = source.as_str(), hits = hits.len(), "scan finished");
    hits
}

/// Concatenated ancestor chains of `ids`, duplicates included.
pub fn collect_parents(tree: &Tree, ids: &[NodeId]) -> Vec<NodeId> {
    ids.iter()
        .filter_map(|id| tree.get(id.as_str()))
        .flat_map(|node| node.parents().iter().cloned())
        .collect()
}

/// Installs `hits` as the active result. Zero hits leave the result empty.
pub fn finalize(
    session: &mut Session,
    keyword: &str,
    parents: Vec<NodeId>,
    hits: Vec<NodeId>,
) -> Finalized {
    let tree = session.tree_mut();
    let mut hits = hits
        .into_iter()
        .filter(|id| tree.contains(id.as_str()))
        .collect::<Vec<_>>();
    if hits.is_empty() {
        debug!(keyword, "no hits");
        return Finalized::default();
    }

    let mut seen = HashSet::with_capacity(parents.len());
    let mut opened = Vec::new();
    for parent in parents {
        if seen.insert(parent.clone()) && tree.set_opened(parent.as_str(), true) {
            opened.push(parent);
        }
    }
    for id in &hits {
        tree.set_selected(id.as_str(), true);
    }

    sort_by_lns(session.tree(), &mut hits);
    let first = hits.first().cloned();
    let count = hits.len();
    *session.search_mut() = SearchResult::new(keyword, hits);

    info!(keyword, hits = count, opened = opened.len(), "result set ready");
    Finalized { count, opened, first }
}

/// Deselects every node of the active result and resets it. Returns the deselected ids.
pub fn clear_search(session: &mut Session) -> Vec<NodeId> {
    let previous = std::mem::take(session.search_mut());
    let tree = session.tree_mut();
    for id in previous.nodes() {
        tree.set_selected(id.as_str(), false);
    }
    previous.nodes().to_vec()
}

/// Moves the cursor to the next hit, wrapping. `None` when there is no result.
pub fn jump_next(session: &mut Session) -> Option<(usize, NodeId)> {
    let result = session.search_mut();
    let node = result.advance()?.clone();
    Some((result.cursor(), node))
}

/// Moves the cursor to the previous hit, wrapping.
pub fn jump_prev(session: &mut Session) -> Option<(usize, NodeId)> {
    let result = session.search_mut();
    let node = result.retreat()?.clone();
    Some((result.cursor(), node))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{change_data_source, jump_next, jump_prev, search, DataSource, SearchOutcome};
    use crate::model::fixtures::demo_session;
    use crate::model::NodeId;

    fn ids(nodes: &[NodeId]) -> Vec<&str> {
        nodes.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn fresh_keyword_scans_sorts_and_opens_ancestors() {
        let mut session = demo_session().expect("demo");
        assert!(!session.tree().get("l1").expect("l1").state().opened);

        let outcome = search(&mut session, "DO K =", DataSource::Code);
        let SearchOutcome::Scanned { keyword, result, .. } = outcome else {
            panic!("expected scan, got {outcome:?}");
        };
        assert_eq!(keyword, "do k =");
        assert_eq!(result.count, 2);
        assert_eq!(ids(session.search().nodes()), ["l3", "l4"]);
        assert_eq!(session.search().cursor(), 0);
        assert_eq!(result.first.as_ref().map(NodeId::as_str), Some("l3"));
        assert!(session.tree().get("l4").expect("l4").state().selected);
        assert!(session.tree().get("b1").expect("b1").state().opened);
        assert_eq!(ids(&result.opened), ["s1", "b1"]);
    }

    #[test]
    fn same_keyword_advances_without_rescanning() {
        let mut session = demo_session().expect("demo");
        search(&mut session, "do", DataSource::Code);
        let scans = session.scan_count();
        let total = session.search().nodes().len();
        assert!(total > 1);

        let outcome = search(&mut session, "do", DataSource::Code);
        assert!(matches!(outcome, SearchOutcome::Advanced { cursor: 1, .. }));
        for _ in 1..total {
            search(&mut session, "DO", DataSource::Code);
        }
        assert_eq!(session.search().cursor(), 0);
        assert_eq!(session.scan_count(), scans);
    }

    #[rstest]
    #[case(DataSource::Code, 0)]
    #[case(DataSource::Comment, 1)]
    #[case(DataSource::All, 1)]
    fn data_source_selects_matched_text(#[case] source: DataSource, #[case] expected: usize) {
        let mut session = demo_session().expect("demo");
        let outcome = search(&mut session, "vectorize", source);
        let SearchOutcome::Scanned { result, .. } = outcome else {
            panic!("expected scan");
        };
        assert_eq!(result.count, expected);
    }

    #[test]
    fn zero_hits_store_no_result() {
        let mut session = demo_session().expect("demo");
        search(&mut session, "do i", DataSource::Code);
        let outcome = search(&mut session, "no-such-text", DataSource::All);
        let SearchOutcome::Scanned { result, .. } = outcome else {
            panic!("expected scan");
        };
        assert_eq!(result.count, 0);
        assert!(session.search().is_empty());
        assert!(session.tree().iter().all(|node| !node.state().selected));
    }

    #[test]
    fn empty_keyword_clears_selection() {
        let mut session = demo_session().expect("demo");
        search(&mut session, "call", DataSource::Code);
        let outcome = search(&mut session, "", DataSource::Code);
        let SearchOutcome::Cleared { deselected } = outcome else {
            panic!("expected clear");
        };
        assert_eq!(deselected.len(), 2);
        assert!(session.search().is_empty());
        assert!(session.tree().iter().all(|node| !node.state().selected));
    }

    #[test]
    fn prev_next_wrap_and_ignore_empty_results() {
        let mut session = demo_session().expect("demo");
        assert_eq!(jump_next(&mut session), None);

        search(&mut session, "call", DataSource::Code);
        let (cursor, _) = jump_prev(&mut session).expect("prev");
        assert_eq!(cursor, 1);
        let (cursor, _) = jump_next(&mut session).expect("next");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn changing_data_source_rescans() {
        let mut session = demo_session().expect("demo");
        search(&mut session, "vectorize", DataSource::All);
        let scans = session.scan_count();
        let outcome = change_data_source(&mut session, "vectorize", DataSource::Code);
        assert!(matches!(outcome, Some(SearchOutcome::Scanned { .. })));
        assert_eq!(session.scan_count(), scans + 1);
        assert!(session.search().is_empty());
        assert_eq!(change_data_source(&mut session, "", DataSource::All), None);
    }
}
