// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! ebt-outline: terminal outline viewer for CCA/EBT loop surveys.
//!
//! The outline tree is loaded from the survey backend's jsTree-style JSON (`format`) into a
//! [`model::Session`]. Navigation (`nav`) and edits (`ops`) work on the session and report what
//! changed; the TUI (`tui`) turns every user action into one backend log record (`backend`).

pub mod backend;
pub mod config;
pub mod format;
pub mod logging;
pub mod model;
pub mod nav;
pub mod ops;
pub mod query;
pub mod render;
pub mod timer;
pub mod tui;
pub mod viewer;
