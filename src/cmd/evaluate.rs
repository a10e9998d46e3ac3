use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::conf::settings;
use crate::pkg::internal::ai::registry::ProviderRegistry;
use crate::pkg::internal::ai::retry::RetryExecutor;
use crate::pkg::internal::dispatch::{JobDispatcher, JobStatus};
use crate::pkg::internal::extract::DirTextSource;
use crate::pkg::internal::store::{db_pool, PgResultStore};
use crate::pkg::internal::worker::EvaluationWorker;
use crate::prelude::Result;

/// Wires the Postgres store and directory source into running consumers.
pub(super) fn start_dispatcher() -> Result<JobDispatcher> {
    let pool = Arc::new(db_pool()?);
    let worker = Arc::new(EvaluationWorker::new(
        PgResultStore::new(pool),
        DirTextSource::new("."),
        ProviderRegistry::with_builtins(),
        RetryExecutor::default(),
    ));
    Ok(JobDispatcher::start(
        worker,
        settings.queue_workers,
        Duration::from_secs(settings.job_timeout_secs),
    ))
}

/// One-shot batch: enqueue, poll to a terminal status, print the outcome.
pub async fn run(jd: &str, cvs: Vec<String>, tags: Vec<String>) -> Result<()> {
    let dispatcher = start_dispatcher()?;

    let jd_ref = doc_ref(&settings.jd_dir, jd);
    let cv_refs = cvs.iter().map(|cv| doc_ref(&settings.cv_dir, cv)).collect();
    let job_id = dispatcher.enqueue(&jd_ref, cv_refs, tags).await?;
    tracing::info!(%job_id, "evaluation queued");

    loop {
        match dispatcher.status(job_id) {
            Some(JobStatus::Finished { outcome }) => {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                break;
            }
            Some(JobStatus::Failed { error }) => {
                tracing::error!(%job_id, "evaluation failed: {}", error);
                break;
            }
            Some(JobStatus::TimedOut) => {
                tracing::error!(%job_id, "evaluation timed out");
                break;
            }
            _ => tokio::time::sleep(Duration::from_millis(250)).await,
        }
    }
    Ok(())
}

fn doc_ref(dir: &str, name: &str) -> String {
    Path::new(dir).join(name).to_string_lossy().into_owned()
}
