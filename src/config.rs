// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Viewer configuration.
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment, command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::backend::LogIdentity;
use crate::logging::LoggingConfig;
use crate::model::Judgment;
use crate::viewer::{LinkContext, ViewKind};

pub const ENV_USER: &str = "EBT_OUTLINE_USER";
pub const ENV_BASE_URL: &str = "EBT_OUTLINE_BASE_URL";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("judgment list must not be empty")]
    NoJudgments,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub user: String,
    pub proj: String,
    pub ver: String,
    /// Outline page directory on the backend, e.g. `http://host/outline/`.
    pub base_url: Option<String>,
    /// Tree JSON: relative to `base_url`, absolute, or a local file.
    pub data_url: Option<String>,
    pub view_kind: ViewKind,
    /// Revision or version directory; falls back to `ver`.
    pub view_id: Option<String>,
    pub algo: String,
    pub meth: String,
    pub log_enabled: bool,
    pub request_timeout_ms: u64,
    /// Selectable judgment values in cycling order.
    pub judgments: Vec<String>,
    pub logging: LoggingConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            user: "anonymous".to_owned(),
            proj: String::new(),
            ver: String::new(),
            base_url: None,
            data_url: None,
            view_kind: ViewKind::default(),
            view_id: None,
            algo: String::new(),
            meth: String::new(),
            log_enabled: true,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            judgments: ["NotYet", "Kernel", "NotKernel", "Unsure"].map(String::from).to_vec(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Command-line overrides; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub user: Option<String>,
    pub proj: Option<String>,
    pub ver: Option<String>,
    pub base_url: Option<String>,
    pub data_url: Option<String>,
    pub view_kind: Option<ViewKind>,
    pub view_id: Option<String>,
    pub no_log: bool,
}

impl ViewerConfig {
    /// `$XDG_CONFIG_HOME/ebt-outline/config.toml` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ebt-outline").join("config.toml"))
    }

    /// Reads `path`, or the default location when it exists. Missing default file means
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|path| path.is_file()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        Self::from_toml(&text, &path)
    }

    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: origin.to_path_buf(), source })?;
        if config.judgments.is_empty() {
            return Err(ConfigError::NoJudgments);
        }
        Ok(config)
    }

    /// Applies `EBT_OUTLINE_USER` / `EBT_OUTLINE_BASE_URL` as returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(user) = lookup(ENV_USER).filter(|value| !value.is_empty()) {
            self.user = user;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.is_empty()) {
            self.base_url = Some(base_url);
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides { user, proj, ver, base_url, data_url, view_kind, view_id, no_log } =
            overrides;
        if let Some(user) = user {
            self.user = user;
        }
        if let Some(proj) = proj {
            self.proj = proj;
        }
        if let Some(ver) = ver {
            self.ver = ver;
        }
        if base_url.is_some() {
            self.base_url = base_url;
        }
        if data_url.is_some() {
            self.data_url = data_url;
        }
        if let Some(view_kind) = view_kind {
            self.view_kind = view_kind;
        }
        if view_id.is_some() {
            self.view_id = view_id;
        }
        if no_log {
            self.log_enabled = false;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn link_context(&self) -> LinkContext {
        LinkContext {
            proj: self.proj.clone(),
            ver: self.ver.clone(),
            view_kind: self.view_kind,
            view_id: self.view_id.clone().unwrap_or_else(|| self.ver.clone()),
            algo: self.algo.clone(),
            meth: self.meth.clone(),
        }
    }

    pub fn log_identity(&self) -> LogIdentity {
        LogIdentity { user: self.user.clone(), proj: self.proj.clone(), ver: self.ver.clone() }
    }

    pub fn judgment_values(&self) -> Vec<Judgment> {
        self.judgments.iter().map(|value| Judgment::from_value(value)).collect()
    }
}
