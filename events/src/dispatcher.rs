//! The core dispatch component: routes events to their registered handlers,
//! inline for the synchronous path, via the job queue for the asynchronous
//! path.

use crate::error::{Error, ErrorKind};
use crate::event::DomainEvent;
use crate::job::{JobDescriptor, JobQueue};
use crate::outcome::interpret_outcome;
use crate::registry::EventRegistry;
use log::*;
use std::sync::Arc;

/// Routes events to their registered handlers.
///
/// Holds only shared read-only state, so a single dispatcher can be cloned
/// into as many concurrent callers as needed; each `dispatch` call is an
/// independent flow of control.
#[derive(Clone)]
pub struct EventDispatcher {
    registry: Arc<EventRegistry>,
    job_queue: Arc<dyn JobQueue>,
}

impl EventDispatcher {
    pub fn new(registry: Arc<EventRegistry>, job_queue: Arc<dyn JobQueue>) -> Self {
        Self {
            registry,
            job_queue,
        }
    }

    /// Execute all synchronous handlers registered for the event's type,
    /// sequentially and in registration order.
    ///
    /// The first failing handler aborts the call: its outcome is translated
    /// into the error taxonomy and no later handler runs. On all-success the
    /// call returns silently. No timeout is imposed; a handler that blocks
    /// blocks the calling flow.
    pub async fn dispatch(&self, event: &DomainEvent) -> Result<(), Error> {
        for handler in self.registry.sync_handlers(event.event_type())? {
            info!("Executing {} with {:?}", handler.name(), event);
            let outcome = handler.handle(event).await;
            interpret_outcome(handler.name(), event, outcome)?;
        }
        Ok(())
    }

    /// Schedule all asynchronous handlers registered for the event's type by
    /// submitting one job descriptor per handler, in registration order.
    ///
    /// The lookup happens before any scheduling, so `NoHandlerAvailable` is
    /// raised synchronously and no job is submitted in that case. Handler
    /// outcomes are judged later, inside the deferred execution context; only
    /// submission order is guaranteed, not execution order. Once a job is
    /// submitted there is no handle to cancel it.
    pub fn dispatch_async(&self, event: &DomainEvent) -> Result<(), Error> {
        let handlers = self.registry.async_handlers(event.event_type())?;
        let payload = event.to_payload().map_err(|err| Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Handler("Failed to serialize event payload".to_string()),
        })?;

        for handler in handlers {
            self.job_queue.enqueue(JobDescriptor {
                handler_name: handler.name().to_string(),
                event_type: event.event_type().to_string(),
                payload: payload.clone(),
            });
        }
        Ok(())
    }
}
