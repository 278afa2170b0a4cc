//! Per-user session state: the résumé record store.
//!
//! One record per chat-platform user identity, living in process memory for
//! the lifetime of the process. The store is an explicit abstraction injected
//! through `AppState` so call sites never touch a module-level singleton and a
//! persistent backend can be substituted later. Records are only ever fully
//! overwritten; last write wins at record granularity, and a failed extraction
//! never touches a previously stored `structured` value.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::resume::models::StructuredResume;

/// One user's résumé state. Created lazily on first access.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResumeRecord {
    /// Full extracted plain text of the uploaded document. `None` means no
    /// résumé has been uploaded yet.
    pub raw_text: Option<String>,
    pub source_file_name: Option<String>,
    /// Result of the recovery pipeline; absent until a successful extraction.
    pub structured: Option<StructuredResume>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Résumé record store. `get` creates-if-absent; the two setters are the only
/// mutators; there is no deletion API.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn get(&self, user_id: &str) -> ResumeRecord;
    async fn set_raw_text(&self, user_id: &str, raw_text: String, file_name: String);
    async fn set_structured(&self, user_id: &str, resume: StructuredResume);
}

/// In-memory store keyed by user identity. No persistence across restarts.
#[derive(Default)]
pub struct InMemoryResumeStore {
    records: RwLock<HashMap<String, ResumeRecord>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn get(&self, user_id: &str) -> ResumeRecord {
        if let Some(record) = self.records.read().await.get(user_id) {
            return record.clone();
        }
        self.records
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    async fn set_raw_text(&self, user_id: &str, raw_text: String, file_name: String) {
        let mut records = self.records.write().await;
        let record = records.entry(user_id.to_string()).or_default();
        record.raw_text = Some(raw_text);
        record.source_file_name = Some(file_name);
        record.uploaded_at = Some(Utc::now());
    }

    async fn set_structured(&self, user_id: &str, resume: StructuredResume) {
        let mut records = self.records.write().await;
        let record = records.entry(user_id.to_string()).or_default();
        record.structured = Some(resume);
    }
}
