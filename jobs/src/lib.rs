//! Job-queue collaborator for asynchronously dispatched events.
//!
//! The dispatcher's asynchronous path hands each scheduled handler over as a
//! [`events::JobDescriptor`] and forgets about it. This crate owns what
//! happens next:
//!
//! - **InProcessQueue**: the `events::JobQueue` implementation, an unbounded
//!   channel whose sending side lives in the dispatcher and whose receiving
//!   side is drained by the worker
//! - **JobWorker**: the deferred execution context. Rebuilds the event from
//!   the job payload, resolves the named handler in the async registry
//!   table, invokes it, and judges the outcome with the same interpretation
//!   logic the synchronous path uses
//! - **RetryPolicy**: exponential backoff applied when a deferred handler
//!   reports a failure; resolution failures are deterministic and are
//!   dropped without retry
//!
//! Submission order is preserved by the queue, but once jobs run the worker
//! gives no ordering guarantee relative to new submissions.

pub mod queue;
pub mod retry;
pub mod worker;

pub use queue::InProcessQueue;
pub use retry::RetryPolicy;
pub use worker::JobWorker;
