// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire formats.
//!
//! The backend ships the outline as nested jsTree records.

pub mod jstree;

pub use jstree::{load_session, parse_outline, TreeLoadError};
