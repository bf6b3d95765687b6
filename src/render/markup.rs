// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Label markup in the backend's HTML dialect.
//!
//! Labels are kept as structured [`LabelState`](crate::model::LabelState); this renderer
//! produces the markup the web tree widget expects, so exported labels keep the class tokens
//! and `selected` markers other tools match on.
//!
//! Library API only: the terminal UI draws labels from the structured state directly.

use std::fmt::Write as _;

use crate::model::Node;

/// Rendered label: inner markup plus the link title (the comment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMarkup {
    pub html: String,
    pub title: Option<String>,
}

pub fn comment_icon_id(node_id: &str) -> String {
    format!("c_{node_id}")
}

pub fn level_id(node_id: &str, level: u8) -> String {
    format!("{node_id}lv{level}")
}

/// Renders `node`'s label. `judgments` lists the selectable judgment values in display order.
pub fn render_label(node: &Node, judgments: &[String]) -> LabelMarkup {
    let label = node.label();
    let id = node.id().as_str();
    let mut html = String::with_capacity(label.text().len() + 128);

    let _ = write!(
        html,
        r#"<span class="{}">{}</span>"#,
        label.mark().css_class(),
        escape(label.text())
    );

    if let Some(current) = label.judgment() {
        let _ = write!(html, r#"<select class="judgment" id="j_{id}">"#);
        for value in judgments {
            push_option(&mut html, value, value == current.as_str());
        }
        if !judgments.iter().any(|value| value == current.as_str()) {
            push_option(&mut html, current.as_str(), true);
        }
        html.push_str("</select>");
    }

    if let Some(scheme) = label.estimation() {
        let current = scheme.level();
        let _ = write!(html, r#"<span class="estimation" prev="{current}">"#);
        let _ = write!(html, r#"<select class="level" id="e_{id}">"#);
        for level in 0..scheme.levels() {
            push_option(&mut html, &level.to_string(), level == current);
        }
        html.push_str("</select>");
        let metrics = node.payload().metrics.as_ref();
        for level in 0..scheme.levels() {
            let value = metrics.and_then(|metrics| metrics.level(level)).unwrap_or(0.0);
            let style = if level == current { r#" style="display:inline;""# } else { "" };
            let _ = write!(
                html,
                r#"<span class="on_level {}"{style}>{value}</span>"#,
                level_id(id, level)
            );
        }
        html.push_str("</span>");
    }

    if label.has_comment() {
        let _ = write!(
            html,
            r#"<i class="jstree-icon comment-icon" id="{}" role="presentation"></i>"#,
            comment_icon_id(id)
        );
    }

    LabelMarkup { html, title: label.comment().map(str::to_owned) }
}

fn push_option(html: &mut String, value: &str, selected: bool) {
    let value = escape(value);
    let marker = if selected { " selected" } else { "" };
    let _ = write!(html, r#"<option value="{value}"{marker}>{value}</option>"#);
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render_label;
    use crate::model::fixtures::demo_session;
    use crate::model::{Judgment, NodeId};
    use crate::ops::{apply_edit, EditOp};

    fn judgments() -> Vec<String> {
        ["NotYet", "Kernel", "NotKernel"].map(String::from).to_vec()
    }

    #[test]
    fn target_label_carries_selected_judgment_and_level() {
        let session = demo_session().expect("demo");
        let markup = render_label(session.tree().get("l1").expect("l1"), &judgments());

        assert!(markup.html.starts_with(r#"<span class="target_node">do i = 1, n</span>"#));
        assert!(markup.html.contains(r#"<option value="NotYet" selected>"#));
        assert_eq!(markup.html.matches(" selected").count(), 2);
        assert!(markup.html.contains(r#"prev="0""#));
        assert!(markup.html.contains(r#"class="on_level l1lv0" style="display:inline;""#));
        assert!(markup.html.contains(r#"<span class="on_level l1lv1">2.5</span>"#));
        assert_eq!(markup.title, None);
    }

    #[test]
    fn edits_move_markers_and_comment_icon() {
        let mut session = demo_session().expect("demo");
        let l1 = NodeId::new("l1").expect("id");
        for op in [
            EditOp::SetJudgment { node_id: l1.clone(), judgment: Judgment::from_value("Kernel") },
            EditOp::SetEstimationLevel { node_id: l1.clone(), level: 2 },
            EditOp::SetComment { node_id: l1.clone(), comment: "check <bounds>".to_owned() },
        ] {
            apply_edit(&mut session, &op).expect("edit");
        }

        let markup = render_label(session.tree().get("l1").expect("l1"), &judgments());
        assert!(markup.html.contains(r#"class="target_node_completed""#));
        assert!(markup.html.contains(r#"<option value="Kernel" selected>"#));
        assert!(markup.html.contains(r#"prev="2""#));
        assert!(markup.html.contains(r#"<span class="on_level l1lv0">"#));
        assert!(markup.html.contains(r#"class="on_level l1lv2" style="display:inline;""#));
        assert_eq!(markup.html.matches("comment-icon").count(), 1);
        assert!(markup.html.contains(r#"id="c_l1""#));
        assert_eq!(markup.title.as_deref(), Some("check <bounds>"));
    }

    #[test]
    fn plain_node_has_no_controls() {
        let session = demo_session().expect("demo");
        let markup = render_label(session.tree().get("b1").expect("b1"), &judgments());
        assert_eq!(markup.html, r#"<span class="node">if (a(i) &gt; 0) then</span>"#);
    }
}
