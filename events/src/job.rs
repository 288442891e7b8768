//! The outbound port to the job-scheduling collaborator.

use serde::{Deserialize, Serialize};

/// A unit of deferred work: everything the job runtime needs to re-invoke a
/// handler later, in a separate execution context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Name of the handler to invoke, as reported by `EventHandler::name`.
    pub handler_name: String,
    /// Textual event type name, carried for observability and cross-checked
    /// against the payload at execution time.
    pub event_type: String,
    /// JSON serialization of the event, from `DomainEvent::to_payload`.
    pub payload: String,
}

/// The job-scheduling collaborator as the dispatcher sees it.
///
/// Submission is fire-and-forget: `enqueue` returns control immediately and
/// hands back no completion handle. The dispatcher never observes, waits
/// for, or interprets the eventual outcome of a scheduled job; that happens
/// later, inside the deferred execution context. Implementations report
/// internal submission failures through logging rather than to the caller.
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, job: JobDescriptor);
}
