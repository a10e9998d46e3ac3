use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::pkg::internal::ai::registry::ProviderRegistry;
use crate::pkg::internal::ai::retry::RetryExecutor;
use crate::pkg::internal::ai::spec::{EvaluationResult, ProviderAdapter, Recommendation};
use crate::pkg::internal::extract::TextSource;
use crate::pkg::internal::store::ResultStore;
use crate::prelude::{Error, Result};

pub const MAX_CVS_PER_EVALUATION: usize = 3;

/// One queued evaluation request: a job description against up to three CVs.
/// Owned by the worker for the duration of a single run.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub job_id: Uuid,
    pub jd_name: String,
    pub cv_names: Vec<String>,
    pub criteria: Vec<String>,
}

impl BatchJob {
    /// Idempotency key for one batch position.
    pub fn task_id(&self, index: usize) -> String {
        format!("{}_{}", self.job_id, index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Completed,
    Failed,
}

/// Stable per-document result schema consumed by reporting layers. A
/// `completed` entry with `error` set is a degraded evaluation flagged for
/// manual review.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub cv_name: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentOutcome {
    fn failed(cv_name: &str, error: &str) -> Self {
        DocumentOutcome {
            cv_name: cv_name.into(),
            status: DocumentStatus::Failed,
            score: None,
            recommendation: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub job_id: Uuid,
    pub jd_name: String,
    pub results: Vec<DocumentOutcome>,
}

/// Orchestrates one batch to completion. Documents are processed strictly
/// in order and one at a time: burst load against rate-limited upstream APIs
/// stays bounded and the outcome preserves input order. Per-document
/// failures are contained; only store errors and a bad job description fail
/// the run.
pub struct EvaluationWorker<S, T> {
    store: S,
    texts: T,
    registry: ProviderRegistry,
    retry: RetryExecutor,
}

impl<S: ResultStore, T: TextSource> EvaluationWorker<S, T> {
    pub fn new(store: S, texts: T, registry: ProviderRegistry, retry: RetryExecutor) -> Self {
        EvaluationWorker {
            store,
            texts,
            registry,
            retry,
        }
    }

    pub async fn run(&self, job: &BatchJob) -> Result<BatchOutcome> {
        if !self.texts.exists(&job.jd_name) {
            return Err(Error::NotFound(format!("JD {}", job.jd_name)));
        }
        let jd_text = self.texts.extract(&job.jd_name)?;
        if jd_text.trim().is_empty() {
            return Err(Error::Extraction("JD file is empty or unreadable".into()));
        }

        // Active provider is resolved once; a configuration change mid-run
        // does not affect this job.
        let adapter = self.load_adapter().await?;

        let mut results = Vec::with_capacity(job.cv_names.len());
        for (index, cv_name) in job.cv_names.iter().enumerate() {
            let task_id = job.task_id(index);
            self.store
                .upsert_processing(&task_id, &job.jd_name, cv_name)
                .await?;

            if !self.texts.exists(cv_name) {
                self.store.mark_failed(&task_id, "document not found").await?;
                results.push(DocumentOutcome::failed(cv_name, "document not found"));
                continue;
            }
            let cv_text = match self.texts.extract(cv_name) {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => {
                    let msg = "document is empty or unreadable";
                    self.store.mark_failed(&task_id, msg).await?;
                    results.push(DocumentOutcome::failed(cv_name, msg));
                    continue;
                }
                Err(err) => {
                    let msg = format!("extraction failed: {}", err);
                    self.store.mark_failed(&task_id, &msg).await?;
                    results.push(DocumentOutcome::failed(cv_name, &msg));
                    continue;
                }
            };

            let evaluation = match &adapter {
                Some(adapter) => {
                    self.retry
                        .execute(adapter.as_ref(), &jd_text, &cv_text, &job.criteria)
                        .await
                }
                None => EvaluationResult::fallback("no active AI provider configured"),
            };

            // Degraded results still complete the record; the note is
            // annotated, not fatal.
            let details = details_json(job, cv_name, &evaluation);
            self.store
                .mark_completed(
                    &task_id,
                    evaluation.score as f64,
                    details,
                    evaluation.error_note.as_deref(),
                )
                .await?;
            let file_type = Path::new(cv_name)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase);
            self.store
                .record_document_evaluated(
                    cv_name,
                    self.texts.size(cv_name).map(|s| s as i64),
                    file_type.as_deref(),
                )
                .await?;

            results.push(DocumentOutcome {
                cv_name: cv_name.clone(),
                status: DocumentStatus::Completed,
                score: Some(evaluation.score),
                recommendation: Some(evaluation.recommendation),
                error: evaluation.error_note,
            });
        }

        self.store
            .increment_jd_usage(&job.jd_name, &job.criteria)
            .await?;

        Ok(BatchOutcome {
            job_id: job.job_id,
            jd_name: job.jd_name.clone(),
            results,
        })
    }

    /// Missing or unknown provider configuration degrades every document in
    /// the batch instead of aborting it.
    async fn load_adapter(&self) -> Result<Option<Arc<dyn ProviderAdapter>>> {
        let config = match self.store.active_provider_config().await? {
            Some(config) => config,
            None => {
                tracing::warn!("no active AI provider configured");
                return Ok(None);
            }
        };
        match self.registry.build(&config) {
            Ok(adapter) => {
                tracing::debug!(provider = adapter.name(), model = %config.model, "provider selected");
                Ok(Some(adapter))
            }
            Err(err) => {
                tracing::error!("cannot build provider adapter: {}", err);
                Ok(None)
            }
        }
    }
}

fn details_json(job: &BatchJob, cv_name: &str, evaluation: &EvaluationResult) -> serde_json::Value {
    json!({
        "jd_name": job.jd_name,
        "cv_name": cv_name,
        "score": evaluation.score,
        "strengths": evaluation.strengths,
        "weaknesses": evaluation.weaknesses,
        "justification": evaluation.justification,
        "recommendation": evaluation.recommendation.as_str(),
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "provider_error": evaluation.error_note,
    })
}
