//! The handler contract events are dispatched against.

use crate::event::DomainEvent;
use crate::outcome::Outcome;
use async_trait::async_trait;

/// A unit of business logic bound to exactly one event type in the registry.
///
/// Handlers are stateless from the dispatcher's perspective: the dispatcher
/// holds no handler state between calls and invokes `handle` with exactly
/// one argument, the event instance.
#[async_trait]
pub trait EventHandler: Send + Sync + std::fmt::Debug {
    /// Stable identifier for this handler, used in log output and as the
    /// handler reference in job descriptors.
    fn name(&self) -> &'static str;

    /// Consume an event and report a tagged outcome.
    async fn handle(&self, event: &DomainEvent) -> Outcome;
}
