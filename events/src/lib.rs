//! Event dispatch infrastructure for the billing platform.
//!
//! This crate provides the event system that connects domain operations to
//! their side effects without coupling the two: domain code emits a
//! [`DomainEvent`], and registered handlers react to it either inline or in
//! a deferred job execution context.
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers, each bound to
//!   exactly one event type and returning a tagged [`Outcome`]
//! - **EventRegistry**: Immutable mapping from event type to ordered handler
//!   lists, one table for synchronous and one for asynchronous dispatch,
//!   built once at process startup
//! - **EventDispatcher**: Looks up handlers for an incoming event and either
//!   executes them inline (`dispatch`) or submits one job descriptor per
//!   handler to the job queue (`dispatch_async`)
//! - **JobQueue / JobDescriptor**: The outbound port to the job-scheduling
//!   collaborator; deferred handler invocation re-uses the same outcome
//!   interpretation as the synchronous path
//!
//! This crate has no dependencies on other internal crates, avoiding
//! circular dependencies. Entity data is carried as serialized JSON values.
//!
//! # Failure taxonomy
//!
//! `dispatch` and `dispatch_async` fail with an [`Error`] whose kind is one
//! of `NoHandlerAvailable` (event type absent from the table consulted),
//! `Handler` (a handler failed with a plain or missing reason), or
//! `HandlerExtended` (a handler failed with a structured diagnostic
//! mapping). The first failing handler aborts the dispatch call; nothing is
//! retried at this level.

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod job;
pub mod outcome;
pub mod registry;

pub use dispatcher::EventDispatcher;
pub use error::{Error, ErrorKind};
pub use event::{DomainEvent, EventType, Id, ParseEventTypeError};
pub use handler::EventHandler;
pub use job::{JobDescriptor, JobQueue};
pub use outcome::{interpret_outcome, FailureDetail, Outcome};
pub use registry::{EventRegistry, RegistryBuilder};
