//! Billing events worker process.
//!
//! Boots configuration and logging, builds the process-wide handler
//! registry, starts the deferred-execution job worker, and feeds events read
//! as JSON lines on stdin through the dispatcher. Which dispatch path is
//! used is controlled by `--dispatch-mode` (or `DISPATCH_MODE`).

use events::{DomainEvent, EventDispatcher};
use jobs::{InProcessQueue, JobWorker, RetryPolicy};
use log::*;
use service::config::{Config, DispatchMode};
use service::logging::Logger;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

mod handlers;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!(
        "Starting billing events worker ({} environment, {} dispatch)",
        config.runtime_env(),
        config.dispatch_mode
    );

    let registry = Arc::new(handlers::build_registry());
    let (queue, receiver) = InProcessQueue::new();
    let dispatcher = EventDispatcher::new(registry.clone(), Arc::new(queue));

    let retry_policy = RetryPolicy::with_delays(
        config.job_max_retries,
        Duration::from_secs(config.job_retry_base_secs),
        Duration::from_secs(config.job_retry_max_secs),
    );
    let worker = tokio::spawn(JobWorker::new(registry, retry_policy).run(receiver));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: DomainEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                error!("Skipping undecodable event: {err}");
                continue;
            }
        };

        let result = match config.dispatch_mode {
            DispatchMode::Sync => dispatcher.dispatch(&event).await,
            DispatchMode::Async => dispatcher.dispatch_async(&event),
        };
        if let Err(err) = result {
            error!("Dispatch failed: {err}");
        }
    }

    // Dropping the dispatcher closes the queue sender; the worker drains
    // whatever is left and exits.
    drop(dispatcher);
    if let Err(err) = worker.await {
        error!("Job worker terminated abnormally: {err}");
    }
    info!("Billing events worker stopped");
}
