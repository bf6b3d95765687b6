// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Source code viewer and open-viewer links.

pub mod link;
pub mod source;

pub use link::{LinkContext, SourceLocator, ViewKind};
pub use source::{
    parse_ranges, ArefRange, Definition, MarkAction, Pos, RangeMark, SourceRequest, SourceView,
    TypeGuess, ViewerError, SOURCE_PANE_HEIGHT_PERCENT,
};
