// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Indented plain-text rendering of the whole outline.

use crate::model::{Node, Tree};

const INDENT: &str = "  ";

/// One line per node in pre-order, regardless of expansion state.
///
/// Lines look like `  [loop] do i = 1, n  (src/main.f90:10-20)`.
pub fn render_text_tree(tree: &Tree) -> String {
    let mut out = String::with_capacity(tree.len() * 48);
    let mut buf = itoa::Buffer::new();
    for node in tree.iter() {
        for _ in 0..node.depth() {
            out.push_str(INDENT);
        }
        out.push('[');
        out.push_str(node.kind().type_name());
        out.push_str("] ");
        out.push_str(node.label().text());
        push_location(&mut out, &mut buf, node);
        if let Some(judgment) = node.label().judgment().filter(|j| j.is_completed()) {
            out.push_str(" <");
            out.push_str(judgment.as_str());
            out.push('>');
        }
        out.push('\n');
    }
    out
}

fn push_location(out: &mut String, buf: &mut itoa::Buffer, node: &Node) {
    let payload = node.payload();
    let Some(loc) = payload.loc.as_deref() else {
        return;
    };
    let Some(sl) = payload.sl else {
        return;
    };
    out.push_str("  (");
    out.push_str(loc);
    out.push(':');
    out.push_str(buf.format(sl));
    if let Some(el) = payload.el.filter(|el| *el != sl) {
        out.push('-');
        out.push_str(buf.format(el));
    }
    out.push(')');
}

/// `texttree?<query>` for the query string of the tree data URL.
pub fn texttree_url(data_url: &str) -> String {
    let query = data_url.split_once('?').map_or("", |(_, query)| query);
    format!("texttree?{query}")
}
