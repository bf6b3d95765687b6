// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the outline tree.
//!
//! Queries provide derived views (visibility, ordering keys, comment listings, progress) that
//! power navigation and the UI.

pub mod comments;
pub mod lns;
pub mod progress;
pub mod visibility;

pub use comments::{list_comments, CommentEntry, MAX_COMMENT_LIST_SIZE};
pub use lns::{cmp_lns, get_lns, sort_by_lns, LineKey};
pub use progress::{progress, Progress};
pub use visibility::{is_visible, visible_rows, VisibleRow};
