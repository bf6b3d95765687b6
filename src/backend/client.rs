// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP access to the outline backend.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;
use tracing::debug;

use super::log::{LogRecord, LogResponse};

/// Log endpoint, relative to the outline page.
pub const LOG_PATH: &str = "../cgi-bin/log";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed log record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    /// `base_url` is the outline page directory, e.g. `http://host/outline/`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base = Url::parse(base_url).map_err(|err| BackendError::InvalidUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a backend-relative reference (`projects/…`, `/gitweb/…`, `../cgi-bin/log`).
    pub fn resolve(&self, reference: &str) -> Result<Url, BackendError> {
        self.base.join(reference).map_err(|err| BackendError::InvalidUrl {
            url: reference.to_owned(),
            reason: err.to_string(),
        })
    }

    async fn get_text(&self, reference: &str) -> Result<String, BackendError> {
        let url = self.resolve(reference)?;
        debug!(url = %url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// Outline JSON from the tree data endpoint.
    pub async fn fetch_tree(&self, data_url: &str) -> Result<String, BackendError> {
        self.get_text(data_url).await
    }

    /// Raw source text.
    pub async fn fetch_source(&self, src_url: &str) -> Result<String, BackendError> {
        self.get_text(src_url).await
    }

    pub async fn post_log(&self, record: &LogRecord) -> Result<LogResponse, BackendError> {
        let url = self.resolve(LOG_PATH)?;
        let form = record.form()?;
        let response = self.http.post(url.clone()).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json::<LogResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{BackendClient, BackendError, LOG_PATH};

    fn client() -> BackendClient {
        BackendClient::new("http://ebt.example/outline/", Duration::from_secs(5)).expect("client")
    }

    #[rstest]
    #[case(LOG_PATH, "http://ebt.example/cgi-bin/log")]
    #[case("projects/demo/v1/src/x.f90", "http://ebt.example/outline/projects/demo/v1/src/x.f90")]
    #[case(
        "/gitweb/?p=demo.git;a=blob_plain;f=x.f90;hb=v1",
        "http://ebt.example/gitweb/?p=demo.git;a=blob_plain;f=x.f90;hb=v1"
    )]
    fn references_resolve_against_outline_page(#[case] reference: &str, #[case] expected: &str) {
        assert_eq!(client().resolve(reference).expect("url").as_str(), expected);
    }

    #[test]
    fn invalid_base_is_rejected() {
        let err = BackendClient::new("not a url", Duration::from_secs(1)).expect_err("invalid");
        assert!(matches!(err, BackendError::InvalidUrl { .. }));
    }
}
