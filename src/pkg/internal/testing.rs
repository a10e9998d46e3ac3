//! In-memory fakes for the worker's collaborator seams.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::pkg::internal::ai::spec::{
    EvaluationResult, ProviderAdapter, ProviderConfig, Recommendation,
};
use crate::pkg::internal::extract::TextSource;
use crate::pkg::internal::store::ResultStore;
use crate::prelude::Result;

#[derive(Debug, Clone)]
pub struct RecordRow {
    pub status: String,
    pub score: Option<f64>,
    pub details: Option<serde_json::Value>,
    pub error: Option<String>,
    pub upserts: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CvMetaRow {
    pub evaluations: u32,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
}

#[derive(Default)]
struct MemoryStoreInner {
    records: HashMap<String, RecordRow>,
    cv_meta: HashMap<String, CvMetaRow>,
    jd_counts: HashMap<String, u32>,
    jd_tags: HashMap<String, Vec<String>>,
    provider: Option<ProviderConfig>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_provider(name: &str) -> Self {
        let store = MemoryStore::new();
        store.inner.lock().unwrap().provider = Some(ProviderConfig {
            provider: name.into(),
            model: "test-model".into(),
            api_key: "key".into(),
            endpoint: "http://localhost:1".into(),
        });
        store
    }

    pub fn record(&self, task_id: &str) -> Option<RecordRow> {
        self.inner.lock().unwrap().records.get(task_id).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    pub fn cv_evaluations(&self, cv_name: &str) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .cv_meta
            .get(cv_name)
            .map_or(0, |m| m.evaluations)
    }

    pub fn cv_meta(&self, cv_name: &str) -> Option<CvMetaRow> {
        self.inner.lock().unwrap().cv_meta.get(cv_name).cloned()
    }

    pub fn jd_usage(&self, jd_name: &str) -> u32 {
        *self
            .inner
            .lock()
            .unwrap()
            .jd_counts
            .get(jd_name)
            .unwrap_or(&0)
    }

    pub fn jd_tags(&self, jd_name: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .jd_tags
            .get(jd_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ResultStore for MemoryStore {
    async fn upsert_processing(
        &self,
        task_id: &str,
        _jd_name: &str,
        _cv_name: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let row = inner
            .records
            .entry(task_id.to_string())
            .or_insert(RecordRow {
                status: String::new(),
                score: None,
                details: None,
                error: None,
                upserts: 0,
            });
        row.status = "processing".into();
        row.error = None;
        row.upserts += 1;
        Ok(())
    }

    async fn mark_failed(&self, task_id: &str, error: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner.records.get_mut(task_id) {
            row.status = "failed".into();
            row.score = None;
            row.error = Some(error.into());
        }
        Ok(())
    }

    async fn mark_completed(
        &self,
        task_id: &str,
        score: f64,
        details: serde_json::Value,
        error_note: Option<&str>,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner.records.get_mut(task_id) {
            row.status = "completed".into();
            row.score = Some(score);
            row.details = Some(details);
            row.error = error_note.map(str::to_string);
        }
        Ok(())
    }

    async fn record_document_evaluated(
        &self,
        cv_name: &str,
        file_size: Option<i64>,
        file_type: Option<&str>,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let meta = inner.cv_meta.entry(cv_name.to_string()).or_default();
        meta.evaluations += 1;
        if file_size.is_some() {
            meta.file_size = file_size;
        }
        if let Some(file_type) = file_type {
            meta.file_type = Some(file_type.to_string());
        }
        Ok(())
    }

    async fn increment_jd_usage(&self, jd_name: &str, criteria: &[String]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        *inner.jd_counts.entry(jd_name.to_string()).or_insert(0) += 1;
        if !criteria.is_empty() {
            inner.jd_tags.insert(jd_name.to_string(), criteria.to_vec());
        }
        Ok(())
    }

    async fn active_provider_config(&self) -> Result<Option<ProviderConfig>> {
        Ok(self.inner.lock().unwrap().provider.clone())
    }
}

#[derive(Default)]
pub struct MapTextSource {
    texts: HashMap<String, String>,
}

impl MapTextSource {
    pub fn new() -> Self {
        MapTextSource::default()
    }

    pub fn insert(&mut self, name: &str, content: &str) {
        self.texts.insert(name.to_string(), content.to_string());
    }
}

impl TextSource for MapTextSource {
    fn exists(&self, name: &str) -> bool {
        self.texts.contains_key(name)
    }

    fn extract(&self, name: &str) -> Result<String> {
        self.texts
            .get(name)
            .cloned()
            .ok_or_else(|| crate::prelude::Error::NotFound(format!("document {}", name)))
    }

    fn size(&self, name: &str) -> Option<u64> {
        self.texts.get(name).map(|t| t.len() as u64)
    }
}

/// Adapter returning the same clean verdict on every call.
pub struct StaticAdapter {
    score: i64,
}

impl StaticAdapter {
    pub fn clean(score: i64) -> Self {
        StaticAdapter { score }
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for StaticAdapter {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn evaluate(
        &self,
        _jd_text: &str,
        _cv_text: &str,
        _criteria: &[String],
    ) -> Result<EvaluationResult> {
        Ok(EvaluationResult {
            score: self.score,
            strengths: "strong match".into(),
            weaknesses: "none noted".into(),
            justification: "scripted verdict".into(),
            recommendation: Recommendation::Recommend,
            error_note: None,
        })
    }

    async fn test_connection(&self) -> bool {
        true
    }
}
