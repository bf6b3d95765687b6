// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Source code viewer model: fetched text plus the highlighted node range and the
//! annotation marks derived from the node's `aref_ranges`.

use std::ops::Range;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::link::{LinkContext, SourceLocator};
use crate::model::{Node, NodeId};

/// Share of the terminal height taken by the source pane.
pub const SOURCE_PANE_HEIGHT_PERCENT: u16 = 85;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("node {node_id} has no source location")]
    MissingLocation { node_id: NodeId },
    #[error("malformed annotation ranges: {0}")]
    Ranges(#[from] serde_json::Error),
}

/// 1-based position as delivered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub ch: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Definition {
    pub line: u32,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArefRange {
    pub start: Pos,
    pub end: Pos,
    #[serde(default)]
    pub def: Option<Definition>,
}

pub fn parse_ranges(json: &str) -> Result<Vec<ArefRange>, ViewerError> {
    Ok(serde_json::from_str(json)?)
}

/// Type guessed for an undefined name from its first letter (`i`..`n` are integers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeGuess {
    Int,
    Real,
}

impl TypeGuess {
    pub fn of(name: &str) -> Self {
        match name.chars().next() {
            Some('i'..='n') => Self::Int,
            _ => Self::Real,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Int => "int?",
            Self::Real => "real?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkAction {
    /// Definition in another file. `href` is empty when no locator is known.
    DefinitionLink { href: String, title: String },
    /// Definition in this file; activating the mark scrolls to `line` (0-based).
    ScrollToLine { line: usize, title: String },
    TypeGuess(TypeGuess),
}

impl MarkAction {
    pub fn title(&self) -> &str {
        match self {
            Self::DefinitionLink { title, .. } | Self::ScrollToLine { title, .. } => title,
            Self::TypeGuess(guess) => guess.title(),
        }
    }
}

/// An annotated span, 0-based and half-open: `(line, ch)` from `from` up to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMark {
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub text: String,
    pub action: MarkAction,
}

/// Everything needed to open the viewer for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub path: String,
    /// Source URL relative to the backend root.
    pub src_url: String,
    /// `openviewer?` link for the node.
    pub link: String,
    pub start_line: u32,
    pub end_line: u32,
    pub ranges: Option<String>,
    pub locator: Option<SourceLocator>,
}

impl SourceRequest {
    pub fn for_node(node: &Node, ctx: &LinkContext) -> Result<Self, ViewerError> {
        let payload = node.payload();
        let path = payload
            .loc
            .as_deref()
            .ok_or_else(|| ViewerError::MissingLocation { node_id: node.id().clone() })?;
        Ok(Self {
            path: path.to_owned(),
            src_url: ctx.source_url(payload),
            link: ctx.get_link(payload),
            start_line: payload.sl.unwrap_or(0),
            end_line: payload.el.unwrap_or(0),
            ranges: payload.aref_ranges.clone(),
            locator: Some(ctx.locator()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceView {
    pub path: String,
    pub lines: Vec<String>,
    /// Highlighted node lines, 0-based.
    pub highlight: Option<Range<usize>>,
    /// Initial top line, 0-based.
    pub scroll_to: Option<usize>,
    pub marks: Vec<RangeMark>,
}

impl SourceView {
    pub fn build(text: &str, request: &SourceRequest) -> Result<Self, ViewerError> {
        let lines = text.lines().map(str::to_owned).collect::<Vec<_>>();
        let start = usize::try_from(request.start_line).unwrap_or(usize::MAX);
        let end = usize::try_from(request.end_line).unwrap_or(usize::MAX);
        let highlight = (start > 0 && end >= start).then(|| start - 1..end.min(lines.len()));
        let scroll_to = (start > 0).then(|| start - 1);

        let ranges = match request.ranges.as_deref() {
            Some(json) if !json.trim().is_empty() => parse_ranges(json)?,
            _ => Vec::new(),
        };
        let locator = request
            .locator
            .clone()
            .or_else(|| SourceLocator::sniff(&request.src_url));
        let marks = ranges
            .iter()
            .map(|range| mark_for(&lines, range, locator.as_ref()))
            .collect::<Vec<_>>();

        debug!(
            path = request.path.as_str(),
            lines = lines.len(),
            marks = marks.len(),
            "source view built"
        );
        Ok(Self { path: request.path.clone(), lines, highlight, scroll_to, marks })
    }

    /// Marks overlapping 0-based `line`.
    pub fn marks_on(&self, line: usize) -> impl Iterator<Item = &RangeMark> + '_ {
        self.marks.iter().filter(move |mark| mark.from.0 <= line && line <= mark.to.0)
    }
}

fn mark_for(lines: &[String], range: &ArefRange, locator: Option<&SourceLocator>) -> RangeMark {
    let from = zero_based(range.start, 0);
    let to = zero_based(range.end, 1);
    let text = text_between(lines, from, to);

    let action = match &range.def {
        Some(Definition { line, path: Some(path), code }) => MarkAction::DefinitionLink {
            href: locator
                .map(|locator| locator.definition_link(path, *line))
                .unwrap_or_default(),
            title: format!("{} [{line}:{path}]", code.as_deref().unwrap_or("???")),
        },
        Some(Definition { line, path: None, .. }) => {
            let target = usize::try_from(*line).unwrap_or(0).saturating_sub(1);
            let code = lines.get(target).map_or("", |line| line.trim());
            MarkAction::ScrollToLine { line: target, title: format!("{code} [{line}]") }
        }
        None => MarkAction::TypeGuess(TypeGuess::of(&text)),
    };
    RangeMark { from, to, text, action }
}

fn zero_based(pos: Pos, ch_offset: usize) -> (usize, usize) {
    let line = usize::try_from(pos.line).unwrap_or(0).saturating_sub(1);
    let ch = usize::try_from(pos.ch).unwrap_or(0) + ch_offset;
    (line, ch)
}

fn text_between(lines: &[String], from: (usize, usize), to: (usize, usize)) -> String {
    let slice = |line: usize, start: usize, end: Option<usize>| -> String {
        let Some(text) = lines.get(line) else {
            return String::new();
        };
        let chars = text.chars().skip(start);
        match end {
            Some(end) => chars.take(end.saturating_sub(start)).collect(),
            None => chars.collect(),
        }
    };

    if from.0 == to.0 {
        return slice(from.0, from.1, Some(to.1));
    }
    let mut out = slice(from.0, from.1, None);
    for line in from.0 + 1..to.0 {
        out.push('\n');
        out.push_str(&slice(line, 0, None));
    }
    out.push('\n');
    out.push_str(&slice(to.0, 0, Some(to.1)));
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{MarkAction, SourceRequest, SourceView, TypeGuess, ViewerError};
    use crate::model::fixtures::{demo_session, demo_source};
    use crate::viewer::link::{LinkContext, ViewKind};

    fn context() -> LinkContext {
        LinkContext {
            proj: "demo".to_owned(),
            ver: "v1".to_owned(),
            view_kind: ViewKind::Release,
            view_id: "v1".to_owned(),
            ..LinkContext::default()
        }
    }

    #[test]
    fn call_node_view_resolves_all_mark_kinds() {
        let session = demo_session().expect("demo");
        let node = session.tree().get("c1").expect("c1");
        let request = SourceRequest::for_node(node, &context()).expect("request");
        assert_eq!(request.src_url, "projects/demo/v1/src/main.f90");

        let text = demo_source(&request.path).expect("source");
        let view = SourceView::build(text, &request).expect("view");
        assert_eq!(view.highlight, Some(11..12));
        assert_eq!(view.scroll_to, Some(11));
        assert_eq!(view.marks.len(), 3);

        let call = &view.marks[0];
        assert_eq!(call.text, "compute");
        assert_eq!(
            call.action,
            MarkAction::DefinitionLink {
                href: "openviewer?path=src%2Fkernel.f90&src=projects%2Fdemo%2Fv1%2Fsrc%2Fkernel.f90\
                       &ver=v1&startl=1&endl=1"
                    .to_owned(),
                title: "subroutine compute(a, i, j) [1:src/kernel.f90]".to_owned(),
            }
        );

        let local = &view.marks[1];
        assert_eq!(local.text, "a");
        assert_eq!(
            local.action,
            MarkAction::ScrollToLine { line: 3, title: "real :: a(n) [4]".to_owned() }
        );

        let guessed = &view.marks[2];
        assert_eq!(guessed.text, "i");
        assert_eq!(guessed.action, MarkAction::TypeGuess(TypeGuess::Int));
        assert_eq!(view.marks_on(11).count(), 3);
    }

    #[rstest]
    #[case("idx", TypeGuess::Int)]
    #[case("n", TypeGuess::Int)]
    #[case("h", TypeGuess::Real)]
    #[case("o", TypeGuess::Real)]
    #[case("", TypeGuess::Real)]
    fn type_guess_uses_first_letter(#[case] name: &str, #[case] expected: TypeGuess) {
        assert_eq!(TypeGuess::of(name), expected);
    }

    #[test]
    fn file_nodes_without_lines_skip_highlight() {
        let session = demo_session().expect("demo");
        let node = session.tree().get("f2").expect("f2");
        let request = SourceRequest::for_node(node, &context()).expect("request");
        let view = SourceView::build("a\nb\n", &request).expect("view");
        assert_eq!(view.highlight, None);
        assert_eq!(view.scroll_to, None);
        assert!(view.marks.is_empty());
    }

    #[test]
    fn malformed_ranges_are_reported() {
        let session = demo_session().expect("demo");
        let node = session.tree().get("c1").expect("c1");
        let mut request = SourceRequest::for_node(node, &context()).expect("request");
        request.ranges = Some("{not json".to_owned());
        assert!(matches!(SourceView::build("", &request), Err(ViewerError::Ranges(_))));
    }
}
