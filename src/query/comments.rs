// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{NodeId, Tree};

/// Rows shown at once by the comment list.
pub const MAX_COMMENT_LIST_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub id: NodeId,
    pub comment: String,
}

/// Every commented node, last in traversal order first.
pub fn list_comments(tree: &Tree) -> Vec<CommentEntry> {
    let mut entries = tree
        .iter()
        .filter_map(|node| {
            node.label().comment().map(|comment| CommentEntry {
                id: node.id().clone(),
                comment: comment.to_owned(),
            })
        })
        .collect::<Vec<_>>();
    entries.reverse();
    entries
}

#[cfg(test)]
mod tests {
    use super::list_comments;
    use crate::model::fixtures::demo_session;

    #[test]
    fn lists_comments_most_recent_first() {
        let mut session = demo_session().expect("demo");
        session
            .tree_mut()
            .get_mut("l4")
            .expect("l4")
            .label_mut()
            .set_comment("later".to_owned());

        let entries = list_comments(session.tree());
        let ids = entries.iter().map(|entry| entry.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["l4", "l3"]);
        assert_eq!(entries[1].comment, "vectorize this?");
    }
}
