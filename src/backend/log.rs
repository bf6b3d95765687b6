// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Activity log records posted to the backend `log` endpoint, and its response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Node;
use crate::nav::DataSource;
use crate::ops::EditOp;

/// Per-node entry of the `node_data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    pub nid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lmi: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub lnum: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub relevant: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub target: bool,
}

impl NodeData {
    pub fn from_node(node: &Node) -> Self {
        let payload = node.payload();
        Self {
            nid: node.id().to_string(),
            idx: payload.idx,
            lmi: payload.lmi,
            path: payload.loc.as_ref().map(ToString::to_string),
            lnum: payload.sl.unwrap_or(0),
            relevant: payload.relevant,
            target: payload.target,
        }
    }
}

/// Who is surveying what.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogIdentity {
    pub user: String,
    pub proj: String,
    pub ver: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogAction {
    Opened(bool),
    Checked(bool),
    Judgment(String),
    EstimationScheme(u8),
    Comment(String),
    ExpandAll,
    CollapseAll,
    ExpandTargetLoops,
    ExpandRelevantLoops,
    OpenSource,
    Search { keyword: String, source: DataSource },
}

impl LogAction {
    /// Action-specific form fields.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let flag = |name: &'static str| vec![(name, "true".to_owned())];
        match self {
            Self::Opened(opened) => vec![("opened", opened.to_string())],
            Self::Checked(checked) => vec![("checked", checked.to_string())],
            Self::Judgment(value) => vec![("judgment", value.clone())],
            Self::EstimationScheme(level) => vec![("estimation_scheme", level.to_string())],
            Self::Comment(comment) => vec![
                ("comment", comment.clone()),
                ("has_comment", (!comment.is_empty()).to_string()),
            ],
            Self::ExpandAll => flag("expand_all"),
            Self::CollapseAll => flag("collapse_all"),
            Self::ExpandTargetLoops => flag("expand_target_loops"),
            Self::ExpandRelevantLoops => flag("expand_relevant_loops"),
            Self::OpenSource => flag("open_source"),
            Self::Search { keyword, source } => vec![
                ("search", keyword.clone()),
                ("datasrc", source.as_str().to_owned()),
            ],
        }
    }
}

impl From<&EditOp> for LogAction {
    fn from(op: &EditOp) -> Self {
        match op {
            EditOp::SetJudgment { judgment, .. } => Self::Judgment(judgment.as_str().to_owned()),
            EditOp::SetEstimationLevel { level, .. } => Self::EstimationScheme(*level),
            EditOp::SetComment { comment, .. } => Self::Comment(comment.clone()),
            EditOp::SetChecked { checked, .. } => Self::Checked(*checked),
            EditOp::SetOpened { opened, .. } => Self::Opened(*opened),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub identity: LogIdentity,
    pub node_data: Vec<NodeData>,
    pub action: LogAction,
}

impl LogRecord {
    pub fn new<'a>(
        identity: &LogIdentity,
        nodes: impl IntoIterator<Item = &'a Node>,
        action: LogAction,
    ) -> Self {
        Self {
            identity: identity.clone(),
            node_data: nodes.into_iter().map(NodeData::from_node).collect(),
            action,
        }
    }

    /// URL-encoded form body. `node_data` is a JSON string and omitted when empty.
    pub fn form(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut form = vec![
            ("user", self.identity.user.clone()),
            ("proj", self.identity.proj.clone()),
            ("ver", self.identity.ver.clone()),
        ];
        if !self.node_data.is_empty() {
            form.push(("node_data", serde_json::to_string(&self.node_data)?));
        }
        form.extend(self.action.fields());
        Ok(form)
    }
}

/// Reply of the `log` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogResponse {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub log: Vec<Value>,
    #[serde(default)]
    pub failure: BTreeMap<String, Value>,
}

impl LogResponse {
    /// `field:reason, …` for the alert dialog; `None` when nothing failed.
    pub fn failure_message(&self) -> Option<String> {
        if self.failure.is_empty() {
            return None;
        }
        let parts = self
            .failure
            .iter()
            .map(|(field, reason)| match reason {
                Value::String(reason) => format!("{field}:{reason}"),
                other => format!("{field}:{other}"),
            })
            .collect::<Vec<_>>();
        Some(parts.join(", "))
    }
}
