// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A session owns the outline tree, the backend side tables and the navigation state
//! (active search result and history).

pub mod fixtures;
pub mod history;
pub mod ids;
pub mod label;
pub mod node;
pub mod search_result;
pub mod session;
pub mod tables;
pub mod tree;

pub use history::{History, HISTORY_SIZE};
pub use ids::{Id, IdError, NodeId, ROOT_ID};
pub use label::{EstimationScheme, Judgment, LabelState, Mark};
pub use node::{LevelMetrics, Node, NodeKind, NodeState, Payload};
pub use search_result::SearchResult;
pub use session::Session;
pub use tables::SideTables;
pub use tree::{Tree, TreeBuilder, TreeError};
