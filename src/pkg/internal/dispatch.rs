use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::pkg::internal::extract::TextSource;
use crate::pkg::internal::store::ResultStore;
use crate::pkg::internal::worker::{
    BatchJob, BatchOutcome, EvaluationWorker, MAX_CVS_PER_EVALUATION,
};
use crate::prelude::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Started,
    Finished { outcome: BatchOutcome },
    Failed { error: String },
    TimedOut,
}

/// Terminal statuses kept in memory; the oldest are evicted past this.
/// Durable results live in the evaluations table, not here.
const RETAINED_OUTCOMES: usize = 256;

#[derive(Default)]
struct StatusBoard {
    entries: HashMap<Uuid, JobStatus>,
    finished: VecDeque<Uuid>,
}

impl StatusBoard {
    fn set(&mut self, job_id: Uuid, status: JobStatus) {
        if matches!(
            status,
            JobStatus::Finished { .. } | JobStatus::Failed { .. } | JobStatus::TimedOut
        ) {
            self.finished.push_back(job_id);
            while self.finished.len() > RETAINED_OUTCOMES {
                if let Some(evicted) = self.finished.pop_front() {
                    self.entries.remove(&evicted);
                }
            }
        }
        self.entries.insert(job_id, status);
    }

    fn get(&self, job_id: Uuid) -> Option<JobStatus> {
        self.entries.get(&job_id).cloned()
    }
}

/// Accepts validated batch requests and feeds long-lived consumer tasks.
/// Batches run concurrently across consumers; each batch's documents stay
/// sequential inside its worker. A timed-out job is abandoned abruptly; its
/// leftover `processing` records are reconciled externally from their
/// timestamps.
pub struct JobDispatcher {
    sender: mpsc::Sender<BatchJob>,
    statuses: Arc<Mutex<StatusBoard>>,
}

impl JobDispatcher {
    pub fn start<S, T>(
        worker: Arc<EvaluationWorker<S, T>>,
        consumers: usize,
        job_timeout: Duration,
    ) -> Self
    where
        S: ResultStore + 'static,
        T: TextSource + 'static,
    {
        let (sender, receiver) = mpsc::channel::<BatchJob>(64);
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let statuses: Arc<Mutex<StatusBoard>> = Arc::new(Mutex::new(StatusBoard::default()));

        for consumer in 0..consumers.max(1) {
            let receiver = receiver.clone();
            let statuses = statuses.clone();
            let worker = worker.clone();
            tokio::spawn(async move {
                loop {
                    let job = { receiver.lock().await.recv().await };
                    let Some(job) = job else { break };
                    let job_id = job.job_id;
                    tracing::info!(consumer, %job_id, jd = %job.jd_name, "batch started");
                    set_status(&statuses, job_id, JobStatus::Started);

                    let status = match tokio::time::timeout(job_timeout, worker.run(&job)).await {
                        Ok(Ok(outcome)) => JobStatus::Finished { outcome },
                        Ok(Err(err)) => {
                            tracing::error!(%job_id, error = %err, "batch failed");
                            JobStatus::Failed {
                                error: err.to_string(),
                            }
                        }
                        Err(_) => {
                            tracing::error!(%job_id, "batch abandoned after timeout");
                            JobStatus::TimedOut
                        }
                    };
                    set_status(&statuses, job_id, status);
                }
            });
        }

        JobDispatcher { sender, statuses }
    }

    pub async fn enqueue(
        &self,
        jd_name: &str,
        cv_names: Vec<String>,
        criteria: Vec<String>,
    ) -> Result<Uuid> {
        if jd_name.trim().is_empty() {
            return Err(Error::Queue("JD name is required".into()));
        }
        if cv_names.is_empty() {
            return Err(Error::Queue("at least one CV is required".into()));
        }
        if cv_names.len() > MAX_CVS_PER_EVALUATION {
            return Err(Error::Queue(format!(
                "maximum {} CVs allowed per evaluation",
                MAX_CVS_PER_EVALUATION
            )));
        }
        let job = BatchJob {
            job_id: Uuid::new_v4(),
            jd_name: jd_name.to_string(),
            cv_names,
            criteria,
        };
        let job_id = job.job_id;
        set_status(&self.statuses, job_id, JobStatus::Queued);
        self.sender
            .send(job)
            .await
            .map_err(|_| Error::Queue("evaluation queue is closed".into()))?;
        Ok(job_id)
    }

    pub fn status(&self, job_id: Uuid) -> Option<JobStatus> {
        self.statuses.lock().unwrap().get(job_id)
    }
}

fn set_status(statuses: &Arc<Mutex<StatusBoard>>, job_id: Uuid, status: JobStatus) {
    statuses.lock().unwrap().set(job_id, status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::ai::registry::ProviderRegistry;
    use crate::pkg::internal::ai::retry::RetryExecutor;
    use crate::pkg::internal::ai::spec::{EvaluationResult, ProviderAdapter, Recommendation};
    use crate::pkg::internal::testing::{MapTextSource, MemoryStore, StaticAdapter};

    struct StuckAdapter;

    #[async_trait::async_trait]
    impl ProviderAdapter for StuckAdapter {
        fn name(&self) -> &'static str {
            "stuck"
        }

        async fn evaluate(
            &self,
            _jd: &str,
            _cv: &str,
            _criteria: &[String],
        ) -> crate::prelude::Result<EvaluationResult> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(EvaluationResult {
                score: 9,
                strengths: String::new(),
                weaknesses: String::new(),
                justification: String::new(),
                recommendation: Recommendation::Recommend,
                error_note: None,
            })
        }

        async fn test_connection(&self) -> bool {
            true
        }
    }

    fn dispatcher(
        provider: &str,
        adapter_score: i64,
        stuck: bool,
        timeout: Duration,
    ) -> JobDispatcher {
        let store = MemoryStore::with_provider(provider);
        let mut texts = MapTextSource::new();
        texts.insert("jd.txt", "backend engineer");
        texts.insert("alice.pdf", "rust");
        texts.insert("bob.docx", "java");
        texts.insert("carol.pdf", "go");
        let mut registry = ProviderRegistry::new();
        if stuck {
            registry.register("static", |_| Arc::new(StuckAdapter));
        } else {
            registry.register("static", move |_| Arc::new(StaticAdapter::clean(adapter_score)));
        }
        let worker = Arc::new(EvaluationWorker::new(
            store,
            texts,
            registry,
            RetryExecutor::default(),
        ));
        JobDispatcher::start(worker, 2, timeout)
    }

    async fn wait_terminal(dispatcher: &JobDispatcher, job_id: Uuid) -> JobStatus {
        loop {
            match dispatcher.status(job_id) {
                Some(JobStatus::Queued) | Some(JobStatus::Started) | None => {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
                Some(status) => return status,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn enqueue_validates_batch_size() {
        let d = dispatcher("static", 7, false, Duration::from_secs(600));
        assert!(d.enqueue("jd.txt", vec![], vec![]).await.is_err());
        let too_many: Vec<String> = (0..4).map(|i| format!("cv{}.pdf", i)).collect();
        assert!(matches!(
            d.enqueue("jd.txt", too_many, vec![]).await,
            Err(Error::Queue(_))
        ));
        assert!(d.enqueue("", vec!["alice.pdf".into()], vec![]).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn batch_runs_to_finished_status() {
        let d = dispatcher("static", 7, false, Duration::from_secs(600));
        let job_id = d
            .enqueue(
                "jd.txt",
                vec!["alice.pdf".into(), "bob.docx".into(), "carol.pdf".into()],
                vec![],
            )
            .await
            .unwrap();
        match wait_terminal(&d, job_id).await {
            JobStatus::Finished { outcome } => {
                assert_eq!(outcome.results.len(), 3);
                assert_eq!(outcome.job_id, job_id);
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn missing_jd_surfaces_as_job_failure() {
        let d = dispatcher("static", 7, false, Duration::from_secs(600));
        let job_id = d
            .enqueue("nope.txt", vec!["alice.pdf".into()], vec![])
            .await
            .unwrap();
        assert!(matches!(
            wait_terminal(&d, job_id).await,
            JobStatus::Failed { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn overlong_job_times_out() {
        let d = dispatcher("static", 0, true, Duration::from_secs(600));
        let job_id = d
            .enqueue("jd.txt", vec!["alice.pdf".into()], vec![])
            .await
            .unwrap();
        assert!(matches!(
            wait_terminal(&d, job_id).await,
            JobStatus::TimedOut
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_job_id_has_no_status() {
        let d = dispatcher("static", 7, false, Duration::from_secs(600));
        assert!(d.status(Uuid::new_v4()).is_none());
    }

    #[test]
    fn terminal_statuses_evict_oldest_past_retention() {
        let mut board = StatusBoard::default();
        let oldest = Uuid::new_v4();
        board.set(oldest, JobStatus::TimedOut);
        let in_flight = Uuid::new_v4();
        board.set(in_flight, JobStatus::Started);
        for _ in 0..RETAINED_OUTCOMES {
            board.set(
                Uuid::new_v4(),
                JobStatus::Failed {
                    error: "boom".into(),
                },
            );
        }
        assert!(board.get(oldest).is_none());
        assert_eq!(board.entries.len(), RETAINED_OUTCOMES + 1);
        assert!(matches!(board.get(in_flight), Some(JobStatus::Started)));
    }
}
