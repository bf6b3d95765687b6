// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagnostic log: `tracing` events go to a file so they never collide with the terminal UI.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `ebt_outline=debug`.
pub const LOG_ENV: &str = "EBT_OUTLINE_LOG";

const DEFAULT_LOG_FILE: &str = "ebt-outline.log";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Defaults to `ebt-outline.log` in the system temp dir.
    pub path: Option<PathBuf>,
    /// Used when `EBT_OUTLINE_LOG` is unset or invalid.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true, path: None, filter: "info".to_owned() }
    }
}

impl LoggingConfig {
    pub fn log_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Installs the global subscriber. Returns the log file path, or `None` when logging is
/// disabled. Calling it again after a subscriber is installed is a no-op.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>, LoggingError> {
    if !config.enabled {
        return Ok(None);
    }
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::Open { path: path.clone(), source })?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    Ok(Some(path))
}
