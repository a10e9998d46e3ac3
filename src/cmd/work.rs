use crate::conf::settings;
use crate::prelude::{Error, Result};

/// Starts the evaluation consumers and blocks until ctrl-c.
pub async fn run() -> Result<()> {
    let dispatcher = super::evaluate::start_dispatcher()?;
    tracing::info!(
        consumers = settings.queue_workers,
        "evaluation consumers started"
    );
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::Queue(format!("signal handler: {}", e)))?;
    tracing::info!("shutting down");
    drop(dispatcher);
    Ok(())
}
