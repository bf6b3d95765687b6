// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Judgment, Session};

/// Judged targets over all targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub judged: usize,
    pub total: usize,
}

impl Progress {
    /// Rounded up, like the survey progress bar.
    pub fn percent(&self) -> Option<usize> {
        (self.total > 0).then(|| (self.judged * 100).div_ceil(self.total))
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.judged == self.total
    }
}

pub fn progress(session: &Session) -> Progress {
    let tree = session.tree();
    let targets = session.tables().targets();
    let judged = targets
        .iter()
        .filter_map(|id| tree.get(id.as_str()))
        .filter(|node| node.label().judgment().is_some_and(Judgment::is_completed))
        .count();
    Progress { judged, total: targets.len() }
}
