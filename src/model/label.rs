// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structured label state for outline nodes.
//!
//! Labels used to be pre-rendered markup that was patched in place. Here the state is kept as
//! plain data and `render::markup` produces the markup on demand.

use smol_str::SmolStr;

/// A user-assigned classification. `NotYet` means "not judged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Judgment {
    #[default]
    NotYet,
    Judged(SmolStr),
}

impl Judgment {
    pub const NOT_YET: &'static str = "NotYet";

    pub fn from_value(value: &str) -> Self {
        if value.is_empty() || value == Self::NOT_YET {
            Self::NotYet
        } else {
            Self::Judged(SmolStr::new(value))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotYet => Self::NOT_YET,
            Self::Judged(value) => value.as_str(),
        }
    }

    pub fn is_completed(&self) -> bool {
        !matches!(self, Self::NotYet)
    }
}

/// Visual mark carried by the node's leading span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mark {
    #[default]
    Plain,
    Target,
    TargetCompleted,
}

impl Mark {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Plain => "node",
            Self::Target => "target_node",
            Self::TargetCompleted => "target_node_completed",
        }
    }

    /// Only target marks carry a completion state; plain nodes stay plain.
    pub fn completed(self) -> Self {
        match self {
            Self::Target => Self::TargetCompleted,
            other => other,
        }
    }

    pub fn uncompleted(self) -> Self {
        match self {
            Self::TargetCompleted => Self::Target,
            other => other,
        }
    }
}

/// Selected level of a node's estimation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EstimationScheme {
    level: u8,
    levels: u8,
}

impl EstimationScheme {
    /// Returns `None` when `levels` is zero or `level` is out of range.
    pub fn new(level: u8, levels: u8) -> Option<Self> {
        (level < levels).then_some(Self { level, levels })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn levels(&self) -> u8 {
        self.levels
    }

    pub fn contains(&self, level: u8) -> bool {
        level < self.levels
    }

    pub(crate) fn set_level(&mut self, level: u8) -> u8 {
        std::mem::replace(&mut self.level, level)
    }

    pub fn next_level(&self) -> u8 {
        (self.level + 1) % self.levels
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelState {
    text: String,
    judgment: Option<Judgment>,
    estimation: Option<EstimationScheme>,
    comment: Option<String>,
    mark: Mark,
}

impl LabelState {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_judgment(mut self, judgment: Judgment) -> Self {
        self.judgment = Some(judgment);
        self
    }

    pub fn with_estimation(mut self, estimation: EstimationScheme) -> Self {
        self.estimation = Some(estimation);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.set_comment(comment.into());
        self
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.mark = mark;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `None` when the node has no judgment selector.
    pub fn judgment(&self) -> Option<&Judgment> {
        self.judgment.as_ref()
    }

    pub fn estimation(&self) -> Option<&EstimationScheme> {
        self.estimation.as_ref()
    }

    pub fn estimation_mut(&mut self) -> Option<&mut EstimationScheme> {
        self.estimation.as_mut()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn has_comment(&self) -> bool {
        self.comment.is_some()
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Selects `judgment` if the label has a selector, and moves the completion mark.
    pub fn apply_judgment(&mut self, judgment: &Judgment) {
        if let Some(current) = self.judgment.as_mut() {
            *current = judgment.clone();
        }
        self.mark = if judgment.is_completed() {
            self.mark.completed()
        } else {
            self.mark.uncompleted()
        };
    }

    /// Empty text removes the comment.
    pub fn set_comment(&mut self, comment: String) {
        self.comment = (!comment.is_empty()).then_some(comment);
    }
}
