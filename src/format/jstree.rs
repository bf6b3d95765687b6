// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Backend tree records (nested jsTree JSON) to [`Tree`] + [`SideTables`].
//!
//! Ids, paths and line numbers arrive as either strings or numbers depending on the backend
//! version, so every scalar goes through [`RawScalar`]. Only the first top-level record is
//! consulted for the side tables.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use smol_str::SmolStr;
use tracing::{debug, info};

use crate::model::{
    EstimationScheme, IdError, Judgment, LabelState, LevelMetrics, Mark, Node, NodeId, NodeKind,
    NodeState, Payload, Session, SideTables, Tree, TreeBuilder, TreeError,
};
use crate::timer::Timer;

/// Number of estimation levels carried by nodes with branch-factor metrics.
pub const ESTIMATION_LEVELS: u8 = 3;

#[derive(Debug, thiserror::Error)]
pub enum TreeLoadError {
    #[error("malformed tree JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid node id '{value}': {source}")]
    InvalidId {
        value: String,
        #[source]
        source: IdError,
    },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl RawScalar {
    fn into_string(self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Str(value) => value,
        }
    }

    fn as_line(&self) -> Option<u32> {
        match self {
            Self::Int(value) => u32::try_from(*value).ok(),
            Self::Float(value) if *value >= 0.0 => Some(*value as u32),
            Self::Float(_) => None,
            Self::Str(value) => leading_int(value),
        }
    }
}

/// Integer prefix of `value`, ignoring surrounding whitespace.
fn leading_int(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let end = trimmed
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Many(Vec<RawNode>),
    One(Box<RawNode>),
}

#[derive(Debug, Default, Deserialize)]
struct RawState {
    #[serde(default)]
    opened: bool,
    #[serde(default)]
    selected: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawAttr {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: RawScalar,
    #[serde(default)]
    text: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,
    #[serde(default)]
    state: RawState,
    #[serde(default)]
    a_attr: RawAttr,

    #[serde(default)]
    loc: Option<RawScalar>,
    #[serde(default)]
    sl: Option<RawScalar>,
    #[serde(default)]
    el: Option<RawScalar>,
    #[serde(default)]
    idx: Option<u64>,
    #[serde(default)]
    lmi: Option<u64>,
    #[serde(default)]
    relevant: bool,
    #[serde(default)]
    target: bool,
    #[serde(default)]
    callee: Option<String>,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    pu: Option<RawScalar>,
    #[serde(default)]
    fid: Option<RawScalar>,
    #[serde(default)]
    aref_ranges: Option<serde_json::Value>,
    #[serde(default)]
    nlinks: Option<u32>,
    #[serde(default)]
    bf0: Option<f64>,
    #[serde(default)]
    bf1: Option<f64>,
    #[serde(default)]
    bf2: Option<f64>,
    #[serde(default)]
    other_metrics: Option<BTreeMap<String, f64>>,

    #[serde(default)]
    judgment: Option<String>,
    #[serde(default)]
    estimation_scheme: Option<RawScalar>,
    #[serde(default)]
    comment: Option<String>,

    #[serde(default)]
    node_tbl: Option<HashMap<String, HashMap<String, Vec<RawScalar>>>>,
    #[serde(default)]
    callees_tbl: Option<HashMap<String, Vec<RawScalar>>>,
    #[serde(default)]
    targets: Option<Vec<RawScalar>>,
    #[serde(default)]
    last_nid: Option<RawScalar>,
}

/// Parses the backend tree document into a tree and its side tables.
pub fn parse_outline(json: &str) -> Result<(Tree, SideTables), TreeLoadError> {
    let timer = Timer::start();
    let document: RawDocument = serde_json::from_str(json)?;
    let mut records = match document {
        RawDocument::Many(records) => records,
        RawDocument::One(record) => vec![*record],
    };

    let tables = match records.first_mut() {
        Some(first) => take_side_tables(first)?,
        None => SideTables::default(),
    };

    let mut builder = Tree::builder();
    for record in records {
        insert_record(&mut builder, None, record)?;
    }
    let tree = builder.finish();

    info!(
        nodes = tree.len(),
        targets = tables.targets().len(),
        elapsed_ms = timer.elapsed_ms(),
        "outline parsed"
    );
    Ok((tree, tables))
}

/// Parses the document and wraps it into a fresh session.
pub fn load_session(json: &str) -> Result<Session, TreeLoadError> {
    let (tree, tables) = parse_outline(json)?;
    Ok(Session::new(tree, tables))
}

fn node_id(raw: RawScalar) -> Result<NodeId, TreeLoadError> {
    let value = raw.into_string();
    NodeId::new(value.clone()).map_err(|source| TreeLoadError::InvalidId { value, source })
}

fn node_ids(raw: Vec<RawScalar>) -> Result<Vec<NodeId>, TreeLoadError> {
    raw.into_iter().map(node_id).collect()
}

fn take_side_tables(first: &mut RawNode) -> Result<SideTables, TreeLoadError> {
    let mut node_tbl = HashMap::new();
    for (loc, lines) in first.node_tbl.take().unwrap_or_default() {
        let mut by_line = HashMap::with_capacity(lines.len());
        for (line, ids) in lines {
            let Some(line) = leading_int(&line) else {
                debug!(loc = %loc, line = %line, "skipping non-numeric node_tbl line");
                continue;
            };
            by_line.insert(line, node_ids(ids)?);
        }
        node_tbl.insert(SmolStr::new(loc), by_line);
    }

    let mut callees_tbl = HashMap::new();
    for (callee, ids) in first.callees_tbl.take().unwrap_or_default() {
        callees_tbl.insert(callee, node_ids(ids)?);
    }

    let targets = node_ids(first.targets.take().unwrap_or_default())?;
    let last_nid = first.last_nid.take().map(node_id).transpose()?;

    Ok(SideTables::new(node_tbl, callees_tbl, targets, last_nid))
}

fn insert_record(
    builder: &mut TreeBuilder,
    parent: Option<&NodeId>,
    mut record: RawNode,
) -> Result<(), TreeLoadError> {
    let children = std::mem::take(&mut record.children);
    let node = build_node(record)?;
    let id = node.id().clone();
    builder.insert(parent, node)?;
    for child in children {
        insert_record(builder, Some(&id), child)?;
    }
    Ok(())
}

fn build_node(record: RawNode) -> Result<Node, TreeLoadError> {
    let id = node_id(record.id)?;
    let kind = record
        .kind
        .as_deref()
        .map(NodeKind::from_type_name)
        .unwrap_or_default();

    let metrics = record.bf0.map(|bf0| LevelMetrics {
        bf: [bf0, record.bf1.unwrap_or(0.0), record.bf2.unwrap_or(0.0)],
        other: record
            .other_metrics
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (SmolStr::new(name), value))
            .collect(),
    });

    let judgment = record.judgment.as_deref().map(Judgment::from_value);
    let mut label = LabelState::new(record.text);
    if record.relevant || judgment.is_some() {
        label = label.with_judgment(judgment.clone().unwrap_or_default());
    }
    if metrics.is_some() {
        let level = record
            .estimation_scheme
            .as_ref()
            .and_then(RawScalar::as_line)
            .and_then(|level| u8::try_from(level).ok())
            .unwrap_or(0);
        if let Some(scheme) = EstimationScheme::new(level, ESTIMATION_LEVELS)
            .or_else(|| EstimationScheme::new(0, ESTIMATION_LEVELS))
        {
            label = label.with_estimation(scheme);
        }
    }
    if let Some(comment) = record.comment.or(record.a_attr.title) {
        label = label.with_comment(comment);
    }
    if record.target {
        let completed = judgment.as_ref().is_some_and(Judgment::is_completed);
        label = label.with_mark(if completed { Mark::TargetCompleted } else { Mark::Target });
    }

    let aref_ranges = match record.aref_ranges {
        Some(serde_json::Value::String(raw)) => Some(raw),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    let payload = Payload {
        loc: record.loc.map(|loc| SmolStr::new(loc.into_string())),
        sl: record.sl.as_ref().and_then(RawScalar::as_line),
        el: record.el.as_ref().and_then(RawScalar::as_line),
        idx: record.idx,
        lmi: record.lmi,
        relevant: record.relevant,
        target: record.target,
        callee: record.callee,
        code: record.code,
        pu: record.pu.map(|pu| SmolStr::new(pu.into_string())),
        fid: record.fid.map(|fid| SmolStr::new(fid.into_string())),
        aref_ranges,
        nlinks: record.nlinks,
        metrics,
    };

    let state = NodeState {
        opened: record.state.opened,
        selected: record.state.selected,
        checked: record.checked,
    };

    Ok(Node::new(id, kind, label, payload).with_state(state))
}

#[cfg(test)]
mod tests {
    use super::{parse_outline, TreeLoadError};
    use crate::model::{Judgment, Mark, NodeKind};

    const SAMPLE: &str = r#"[
      {"id": 1, "text": "a.f90", "type": "file", "loc": "a.f90", "state": {"opened": true},
       "node_tbl": {"a.f90": {"10": ["3", 4]}},
       "callees_tbl": {"foo": [2]},
       "targets": ["3"], "last_nid": 3,
       "children": [
         {"id": 2, "text": "subroutine foo", "type": "subroutine", "loc": "a.f90", "sl": "1",
          "children": [
            {"id": 3, "text": "do i", "type": "loop", "loc": "a.f90", "sl": 10, "el": 20,
             "relevant": true, "target": true, "checked": true, "judgment": "Kernel",
             "bf0": 1.5, "bf1": 2, "estimation_scheme": "1",
             "a_attr": {"title": "hot"}, "aref_ranges": "[]", "children": []},
            {"id": 4, "text": "do j", "type": "loop", "loc": "a.f90", "sl": 10, "children": []}
          ]}
       ]}
    ]"#;

    #[test]
    fn parses_nested_records_and_side_tables() {
        let (tree, tables) = parse_outline(SAMPLE).expect("parse");
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.top_level().len(), 1);

        let loop_node = tree.get("3").expect("node 3");
        assert_eq!(loop_node.kind(), NodeKind::Loop);
        assert_eq!(loop_node.parents().len(), 2);
        assert!(loop_node.state().checked);
        assert_eq!(loop_node.payload().sl, Some(10));
        assert_eq!(loop_node.label().judgment(), Some(&Judgment::from_value("Kernel")));
        assert_eq!(loop_node.label().mark(), Mark::TargetCompleted);
        assert_eq!(loop_node.label().comment(), Some("hot"));
        assert_eq!(loop_node.label().estimation().map(|es| es.level()), Some(1));

        let sub = tree.get("2").expect("node 2");
        assert_eq!(sub.payload().sl, Some(1));
        assert_eq!(sub.label().judgment(), None);

        assert_eq!(tables.same_line("a.f90", 10).len(), 2);
        assert_eq!(tables.callees("foo").map(<[_]>::len), Some(1));
        assert_eq!(tables.last_nid().map(|id| id.as_str()), Some("3"));
    }

    #[test]
    fn missing_side_tables_are_empty() {
        let (_, tables) =
            parse_outline(r#"[{"id": "x", "text": "x", "children": []}]"#).expect("parse");
        assert!(tables.targets().is_empty());
        assert!(!tables.has_callees());
        assert!(tables.last_nid().is_none());
    }

    #[test]
    fn rejects_reserved_root_id() {
        let err = parse_outline(r##"[{"id": "#", "text": "root"}]"##).expect_err("reserved");
        assert!(matches!(err, TreeLoadError::InvalidId { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(parse_outline("[{"), Err(TreeLoadError::Json(_))));
    }
}
