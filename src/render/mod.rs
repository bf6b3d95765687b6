// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text renderings of the outline: label markup and the plain-text tree.

pub mod markup;
pub mod text;
pub mod text_tree;

pub use markup::{comment_icon_id, level_id, render_label, LabelMarkup};
pub use text::{text_len, truncate_with_ellipsis};
pub use text_tree::{render_text_tree, texttree_url};
