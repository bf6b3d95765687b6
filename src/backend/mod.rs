// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Outline backend: tree/source fetches and the activity log.

pub mod client;
pub mod log;
pub mod service;

pub use client::{BackendClient, BackendError, LOG_PATH};
pub use log::{LogAction, LogIdentity, LogRecord, LogResponse, NodeData};
pub use service::{Backend, BackendEvent, HttpBackend, OfflineBackend};
