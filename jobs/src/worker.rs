//! Deferred execution context for asynchronously dispatched events.

use crate::retry::RetryPolicy;
use events::{interpret_outcome, DomainEvent, EventHandler, EventRegistry, EventType, JobDescriptor};
use log::*;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Drains the job queue and invokes deferred handlers.
///
/// Each job is resolved against the same registry the dispatcher scheduled
/// it from, and its outcome is judged by the same interpretation logic as
/// the synchronous path. Unlike the synchronous path there is no caller to
/// propagate errors to, so failures end in the log: resolution failures are
/// dropped immediately, outcome failures after the retry policy is spent.
pub struct JobWorker {
    registry: Arc<EventRegistry>,
    retry_policy: RetryPolicy,
}

impl JobWorker {
    pub fn new(registry: Arc<EventRegistry>, retry_policy: RetryPolicy) -> Self {
        Self {
            registry,
            retry_policy,
        }
    }

    /// Process jobs until the sending side of the queue is dropped.
    pub async fn run(self, mut receiver: UnboundedReceiver<JobDescriptor>) {
        while let Some(job) = receiver.recv().await {
            self.process(job).await;
        }
        info!("Job queue closed, worker exiting");
    }

    /// Execute a single job, retrying handler failures per policy.
    pub async fn process(&self, job: JobDescriptor) {
        let Some((handler, event)) = self.resolve(&job) else {
            return;
        };

        let mut past_retries: u32 = 0;
        loop {
            info!("Executing {} with {:?}", handler.name(), event);
            let outcome = handler.handle(&event).await;
            match interpret_outcome(handler.name(), &event, outcome) {
                Ok(()) => return,
                Err(err) => {
                    if !self.retry_policy.should_retry(past_retries) {
                        error!(
                            "Giving up on {} for {} after {} attempt(s): {err}",
                            job.handler_name,
                            job.event_type,
                            past_retries + 1
                        );
                        return;
                    }
                    let delay = self.retry_policy.delay(past_retries);
                    past_retries += 1;
                    warn!(
                        "Retrying {} for {} in {delay:?} (retry {past_retries})",
                        job.handler_name, job.event_type
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Rebuild the event from the job payload and find the named handler in
    /// the async registry table. All failures here are deterministic
    /// (undecodable payload, unknown or mismatched event type, unregistered
    /// handler name), so the job is logged and dropped without retry.
    fn resolve(&self, job: &JobDescriptor) -> Option<(Arc<dyn EventHandler>, DomainEvent)> {
        let event = match DomainEvent::from_payload(&job.payload) {
            Ok(event) => event,
            Err(err) => {
                error!("Undecodable payload for {}: {err}", job.handler_name);
                return None;
            }
        };

        let event_type = event.event_type();
        match EventType::from_str(&job.event_type) {
            Ok(declared) if declared == event_type => {}
            Ok(declared) => {
                error!(
                    "Job event type {declared} does not match payload type {event_type}, dropping job for {}",
                    job.handler_name
                );
                return None;
            }
            Err(_) => {
                error!(
                    "Unknown event type {} on job for {}",
                    job.event_type, job.handler_name
                );
                return None;
            }
        }

        let handlers = match self.registry.async_handlers(event_type) {
            Ok(handlers) => handlers,
            Err(err) => {
                error!("{err}, dropping job for {}", job.handler_name);
                return None;
            }
        };
        match handlers.iter().find(|h| h.name() == job.handler_name) {
            Some(handler) => Some((handler.clone(), event)),
            None => {
                error!(
                    "Handler {} is not registered for {event_type}, dropping job",
                    job.handler_name
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use events::{EventDispatcher, FailureDetail, Id, Outcome};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Succeeds once `failures` invocations have failed.
    #[derive(Debug)]
    struct FlakyHandler {
        name: &'static str,
        failures: u32,
        invocations: AtomicU32,
    }

    impl FlakyHandler {
        fn new(name: &'static str, failures: u32) -> Arc<Self> {
            Arc::new(Self {
                name,
                failures,
                invocations: AtomicU32::new(0),
            })
        }

        fn invocations(&self) -> u32 {
            self.invocations.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventHandler for FlakyHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn handle(&self, _event: &DomainEvent) -> Outcome {
            let n = self.invocations.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Outcome::Failure(Some(FailureDetail::Message("transient".to_string())))
            } else {
                Outcome::Success
            }
        }
    }

    fn invoice_finalized() -> DomainEvent {
        DomainEvent::InvoiceFinalized {
            invoice_id: Id::nil(),
            customer_id: Id::nil(),
            invoice: json!({"total_cents": 999}),
        }
    }

    fn descriptor_for(event: &DomainEvent, handler_name: &str) -> JobDescriptor {
        JobDescriptor {
            handler_name: handler_name.to_string(),
            event_type: event.event_type().to_string(),
            payload: event.to_payload().unwrap(),
        }
    }

    fn fast_retries(max_retries: u32) -> RetryPolicy {
        RetryPolicy::with_delays(
            max_retries,
            Duration::from_millis(1),
            Duration::from_millis(4),
        )
    }

    #[tokio::test]
    async fn test_process_invokes_the_named_handler() {
        let handler = FlakyHandler::new("receipt_email", 0);
        let registry = Arc::new(
            EventRegistry::builder()
                .with_async_handler(EventType::InvoiceFinalized, handler.clone())
                .build(),
        );
        let worker = JobWorker::new(registry, fast_retries(0));

        let event = invoice_finalized();
        worker.process(descriptor_for(&event, "receipt_email")).await;

        assert_eq!(handler.invocations(), 1);
    }

    #[tokio::test]
    async fn test_process_retries_outcome_failures_until_success() {
        let handler = FlakyHandler::new("receipt_email", 2);
        let registry = Arc::new(
            EventRegistry::builder()
                .with_async_handler(EventType::InvoiceFinalized, handler.clone())
                .build(),
        );
        let worker = JobWorker::new(registry, fast_retries(3));

        let event = invoice_finalized();
        worker.process(descriptor_for(&event, "receipt_email")).await;

        // two failed attempts, then the successful third
        assert_eq!(handler.invocations(), 3);
    }

    #[tokio::test]
    async fn test_process_gives_up_when_retries_are_spent() {
        let handler = FlakyHandler::new("receipt_email", u32::MAX);
        let registry = Arc::new(
            EventRegistry::builder()
                .with_async_handler(EventType::InvoiceFinalized, handler.clone())
                .build(),
        );
        let worker = JobWorker::new(registry, fast_retries(2));

        let event = invoice_finalized();
        worker.process(descriptor_for(&event, "receipt_email")).await;

        // first attempt plus two retries
        assert_eq!(handler.invocations(), 3);
    }

    #[tokio::test]
    async fn test_unregistered_handler_name_drops_job_without_invocation() {
        let handler = FlakyHandler::new("receipt_email", 0);
        let registry = Arc::new(
            EventRegistry::builder()
                .with_async_handler(EventType::InvoiceFinalized, handler.clone())
                .build(),
        );
        let worker = JobWorker::new(registry, fast_retries(3));

        let event = invoice_finalized();
        worker.process(descriptor_for(&event, "crm_sync")).await;

        assert_eq!(handler.invocations(), 0);
    }

    #[tokio::test]
    async fn test_mismatched_event_type_drops_job_without_invocation() {
        let handler = FlakyHandler::new("receipt_email", 0);
        let registry = Arc::new(
            EventRegistry::builder()
                .with_async_handler(EventType::InvoiceFinalized, handler.clone())
                .build(),
        );
        let worker = JobWorker::new(registry, fast_retries(3));

        let mut job = descriptor_for(&invoice_finalized(), "receipt_email");
        job.event_type = "payment_failed".to_string();
        worker.process(job).await;

        assert_eq!(handler.invocations(), 0);
    }

    #[tokio::test]
    async fn test_undecodable_payload_drops_job_without_invocation() {
        let handler = FlakyHandler::new("receipt_email", 0);
        let registry = Arc::new(
            EventRegistry::builder()
                .with_async_handler(EventType::InvoiceFinalized, handler.clone())
                .build(),
        );
        let worker = JobWorker::new(registry, fast_retries(3));

        let mut job = descriptor_for(&invoice_finalized(), "receipt_email");
        job.payload = "not json".to_string();
        worker.process(job).await;

        assert_eq!(handler.invocations(), 0);
    }

    #[tokio::test]
    async fn test_run_drains_jobs_scheduled_through_the_dispatcher() {
        let handler = FlakyHandler::new("receipt_email", 0);
        let registry = Arc::new(
            EventRegistry::builder()
                .with_async_handler(EventType::InvoiceFinalized, handler.clone())
                .build(),
        );

        let (queue, receiver) = crate::InProcessQueue::new();
        let dispatcher = EventDispatcher::new(registry.clone(), Arc::new(queue));
        let worker = tokio::spawn(JobWorker::new(registry, fast_retries(0)).run(receiver));

        dispatcher.dispatch_async(&invoice_finalized()).unwrap();
        dispatcher.dispatch_async(&invoice_finalized()).unwrap();

        // Dropping the dispatcher closes the queue so the worker exits.
        drop(dispatcher);
        worker.await.unwrap();

        assert_eq!(handler.invocations(), 2);
    }
}
