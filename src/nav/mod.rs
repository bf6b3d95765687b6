// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Search and navigation over a [`crate::model::Session`].

pub mod debounce;
pub mod expand;
pub mod jump;
pub mod search;

pub use debounce::Debouncer;
pub use expand::{
    collapse_all, expand_all, expand_loops, plan_expand_all, ExpandPlan, LoopFlag,
    EXPAND_CONFIRM_THRESHOLD,
};
pub use jump::{
    back, callee_choice, confirm_callee_jump, jump_to_callee, jump_to_comments, jump_to_targets,
    on_ready, setup_targets, CalleeChoice,
};
pub use search::{
    change_data_source, clear_search, collect_parents, finalize, jump_next, jump_prev, scan,
    search, DataSource, Finalized, SearchOutcome, SEARCH_DEBOUNCE,
};
