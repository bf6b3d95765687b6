// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fire-and-forget backend calls for the UI thread.
//!
//! Requests are started without blocking; their completions are queued and picked up by
//! [`Backend::poll`] on the next UI tick. Log posts are never retried and never roll back the
//! change that triggered them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::client::BackendClient;
use super::log::LogRecord;
use crate::viewer::SourceRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Failed log fields, shown in a blocking alert.
    Alert(String),
    SourceLoaded { request: SourceRequest, text: String },
    /// The source could not be fetched; already logged.
    SourceFailed { request: SourceRequest },
}

pub trait Backend {
    fn post_log(&mut self, record: LogRecord);
    fn request_source(&mut self, request: SourceRequest);
    /// Completions that arrived since the last call, in arrival order.
    fn poll(&mut self) -> Vec<BackendEvent>;
}

/// Backend reached over HTTP; requests run on the tokio runtime behind `handle`.
pub struct HttpBackend {
    client: Arc<BackendClient>,
    handle: Handle,
    log_enabled: bool,
    tx: mpsc::UnboundedSender<BackendEvent>,
    rx: mpsc::UnboundedReceiver<BackendEvent>,
}

impl HttpBackend {
    pub fn new(client: BackendClient, handle: Handle, log_enabled: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { client: Arc::new(client), handle, log_enabled, tx, rx }
    }
}

impl Backend for HttpBackend {
    fn post_log(&mut self, record: LogRecord) {
        if !self.log_enabled {
            debug!(action = ?record.action, "log disabled; record dropped");
            return;
        }
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            match client.post_log(&record).await {
                Ok(response) => {
                    if !response.log.is_empty() {
                        debug!(
                            time = response.time.as_deref().unwrap_or_default(),
                            user = response.user.as_deref().unwrap_or_default(),
                            ip = response.ip.as_deref().unwrap_or_default(),
                            logs = response.log.len(),
                            "log posted"
                        );
                    }
                    if let Some(message) = response.failure_message() {
                        let _ = tx.send(BackendEvent::Alert(message));
                    }
                }
                Err(err) => warn!(error = %err, "log post failed"),
            }
        });
    }

    fn request_source(&mut self, request: SourceRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            match client.fetch_source(&request.src_url).await {
                Ok(text) => {
                    let _ = tx.send(BackendEvent::SourceLoaded { request, text });
                }
                Err(err) => {
                    warn!(src = request.src_url.as_str(), error = %err, "source fetch failed");
                    let _ = tx.send(BackendEvent::SourceFailed { request });
                }
            }
        });
    }

    fn poll(&mut self) -> Vec<BackendEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// In-process backend for `--demo` and tests: sources come from a lookup function and log
/// records are kept in memory.
#[derive(Clone)]
pub struct OfflineBackend {
    sources: fn(&str) -> Option<&'static str>,
    records: Arc<Mutex<Vec<LogRecord>>>,
    failure: Option<String>,
    pending: VecDeque<BackendEvent>,
}

impl OfflineBackend {
    pub fn new(sources: fn(&str) -> Option<&'static str>) -> Self {
        Self {
            sources,
            records: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            pending: VecDeque::new(),
        }
    }

    /// Every subsequent log post answers with this failure message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Shared view of posted records; stays valid after the backend is boxed.
    pub fn records(&self) -> Arc<Mutex<Vec<LogRecord>>> {
        Arc::clone(&self.records)
    }
}

impl Backend for OfflineBackend {
    fn post_log(&mut self, record: LogRecord) {
        debug!(action = ?record.action, nodes = record.node_data.len(), "log recorded");
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
        if let Some(message) = &self.failure {
            self.pending.push_back(BackendEvent::Alert(message.clone()));
        }
    }

    fn request_source(&mut self, request: SourceRequest) {
        match (self.sources)(&request.path) {
            Some(text) => self
                .pending
                .push_back(BackendEvent::SourceLoaded { request, text: text.to_owned() }),
            None => {
                warn!(path = request.path.as_str(), "no offline source");
                self.pending.push_back(BackendEvent::SourceFailed { request });
            }
        }
    }

    fn poll(&mut self) -> Vec<BackendEvent> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, BackendEvent, OfflineBackend};
    use crate::backend::log::{LogAction, LogIdentity, LogRecord};
    use crate::model::fixtures::{demo_session, demo_source};
    use crate::model::Node;
    use crate::viewer::{LinkContext, SourceRequest};

    #[test]
    fn offline_backend_records_and_serves_sources() {
        let session = demo_session().expect("demo");
        let mut backend = OfflineBackend::new(demo_source);
        let records = backend.records();

        let node = session.tree().get("l3").expect("l3");
        backend.post_log(LogRecord::new(&LogIdentity::default(), [node], LogAction::OpenSource));
        let request = SourceRequest::for_node(node, &LinkContext::default()).expect("request");
        backend.request_source(request);

        let events = backend.poll();
        assert!(matches!(
            events.as_slice(),
            [BackendEvent::SourceLoaded { text, .. }] if text.contains("do k = 1, 8")
        ));
        assert!(backend.poll().is_empty());
        assert_eq!(records.lock().expect("records").len(), 1);
    }

    #[test]
    fn missing_offline_source_reports_failure() {
        let session = demo_session().expect("demo");
        let mut backend = OfflineBackend::new(|_| None);
        let node = session.tree().get("l3").expect("l3");
        let request = SourceRequest::for_node(node, &LinkContext::default()).expect("request");
        backend.request_source(request.clone());
        assert_eq!(backend.poll(), [BackendEvent::SourceFailed { request }]);
    }

    #[test]
    fn failures_surface_as_alerts() {
        let mut backend = OfflineBackend::new(|_| None).with_failure("judgment:locked");
        let record =
            LogRecord::new(&LogIdentity::default(), std::iter::empty::<&Node>(), LogAction::ExpandAll);
        backend.post_log(record);
        assert_eq!(backend.poll(), [BackendEvent::Alert("judgment:locked".to_owned())]);
    }
}
