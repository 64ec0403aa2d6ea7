/// Audit log container
///
/// Reads the organization's audit log and posts new entries. Posting is
/// fire-and-forget: callers never wait on it and failures are only logged.

use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::api::ApiClient;
use taskdeck_shared::models::audit_log::{AuditLogEntry, NewAuditEntry};

struct AuditInner {
    api: ApiClient,
    logs: watch::Sender<Vec<AuditLogEntry>>,
    loading: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct AuditStore {
    inner: Arc<AuditInner>,
}

impl AuditStore {
    pub fn new(api: ApiClient) -> Self {
        let (logs, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(false);

        Self {
            inner: Arc::new(AuditInner { api, logs, loading }),
        }
    }

    /// Reloads the log (`GET /audit-log`), keeping the previous list on failure
    pub async fn fetch_logs(&self) {
        self.inner.loading.send_replace(true);

        match self.inner.api.list_audit_log().await {
            Ok(logs) => {
                tracing::debug!(count = logs.len(), "Audit log loaded");
                self.inner.logs.send_replace(logs);
            }
            Err(e) => tracing::warn!("Failed to fetch audit log: {}", e),
        }

        self.inner.loading.send_replace(false);
    }

    /// Posts an entry in the background (`POST /audit-log`)
    pub fn log_action(&self, action: impl Into<String>, details: Option<JsonValue>) -> JoinHandle<()> {
        let api = self.inner.api.clone();
        let entry = NewAuditEntry::new(action, details);

        tokio::spawn(async move {
            if let Err(e) = api.append_audit(&entry).await {
                tracing::warn!(action = %entry.action, "Failed to log action: {}", e);
            }
        })
    }

    pub fn logs(&self) -> Vec<AuditLogEntry> {
        self.inner.logs.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    pub fn subscribe_logs(&self) -> watch::Receiver<Vec<AuditLogEntry>> {
        self.inner.logs.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;

    #[tokio::test]
    async fn test_failures_are_absorbed() {
        let store = AuditStore::new(ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api")).unwrap());

        store.fetch_logs().await;
        assert!(store.logs().is_empty());
        assert!(!store.is_loading());

        let handle = store.log_action("export", Some(json!({"format": "csv"})));
        assert!(handle.await.is_ok());
    }
}
