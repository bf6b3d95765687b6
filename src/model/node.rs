// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::ids::NodeId;
use super::label::LabelState;

/// Icon type of an outline node, as named by the backend's `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    #[default]
    Default,
    File,
    Part,
    Block,
    Loop,
    Branch,
    Call,
    Main,
    Subroutine,
    Function,
    Mpi,
    Omp,
    Acc,
    Ocl,
    Dec,
    Xlf,
    Pp,
    /// A call whose callee could not be resolved (`call*`).
    CallNull,
}

impl NodeKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "file" => Self::File,
            "part" => Self::Part,
            "block" => Self::Block,
            "loop" => Self::Loop,
            "branch" => Self::Branch,
            "call" => Self::Call,
            "main" => Self::Main,
            "subroutine" => Self::Subroutine,
            "function" => Self::Function,
            "mpi" => Self::Mpi,
            "omp" => Self::Omp,
            "acc" => Self::Acc,
            "ocl" => Self::Ocl,
            "dec" => Self::Dec,
            "xlf" => Self::Xlf,
            "pp" => Self::Pp,
            "call*" => Self::CallNull,
            _ => Self::Default,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::File => "file",
            Self::Part => "part",
            Self::Block => "block",
            Self::Loop => "loop",
            Self::Branch => "branch",
            Self::Call => "call",
            Self::Main => "main",
            Self::Subroutine => "subroutine",
            Self::Function => "function",
            Self::Mpi => "mpi",
            Self::Omp => "omp",
            Self::Acc => "acc",
            Self::Ocl => "ocl",
            Self::Dec => "dec",
            Self::Xlf => "xlf",
            Self::Pp => "pp",
            Self::CallNull => "call*",
        }
    }

    /// Short glyph used in the terminal tree and the text tree.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Default => "·",
            Self::File => "F",
            Self::Part => "P",
            Self::Block => "B",
            Self::Loop => "D",
            Self::Branch => "?",
            Self::Call => "C",
            Self::Main => "M",
            Self::Subroutine => "S",
            Self::Function => "f",
            Self::Mpi => "m",
            Self::Omp => "o",
            Self::Acc => "a",
            Self::Ocl => "!",
            Self::Dec => "i",
            Self::Xlf => "x",
            Self::Pp => "#",
            Self::CallNull => "c",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    pub opened: bool,
    pub selected: bool,
    pub checked: bool,
}

/// Per-level branch-factor metrics (`bf0`..`bf2`) plus the named extras.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelMetrics {
    pub bf: [f64; 3],
    pub other: Vec<(SmolStr, f64)>,
}

impl LevelMetrics {
    pub fn level(&self, level: u8) -> Option<f64> {
        self.bf.get(usize::from(level)).copied()
    }
}

/// Domain attributes delivered with each node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub loc: Option<SmolStr>,
    pub sl: Option<u32>,
    pub el: Option<u32>,
    pub idx: Option<u64>,
    pub lmi: Option<u64>,
    pub relevant: bool,
    pub target: bool,
    pub callee: Option<String>,
    pub code: Option<String>,
    pub pu: Option<SmolStr>,
    pub fid: Option<SmolStr>,
    /// Raw JSON list of annotation ranges for the source viewer.
    pub aref_ranges: Option<String>,
    pub nlinks: Option<u32>,
    pub metrics: Option<LevelMetrics>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
    children_d: Vec<NodeId>,
    state: NodeState,
    label: LabelState,
    payload: Payload,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, label: LabelState, payload: Payload) -> Self {
        Self {
            id,
            kind,
            parents: Vec::new(),
            children: Vec::new(),
            children_d: Vec::new(),
            state: NodeState::default(),
            label,
            payload,
        }
    }

    pub fn with_state(mut self, state: NodeState) -> Self {
        self.state = state;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Ancestor chain, nearest first. The implicit root is not listed.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// All descendants in pre-order.
    pub fn children_d(&self) -> &[NodeId] {
        &self.children_d
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    pub fn label(&self) -> &LabelState {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut LabelState {
        &mut self.label
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn set_parents(&mut self, parents: Vec<NodeId>) {
        self.parents = parents;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    pub(crate) fn set_children_d(&mut self, children_d: Vec<NodeId>) {
        self.children_d = children_d;
    }
}
