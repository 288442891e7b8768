//! The process-wide mapping from event type to ordered handler lists.

use crate::error::Error;
use crate::event::EventType;
use crate::handler::EventHandler;
use std::collections::HashMap;
use std::sync::Arc;

type HandlerList = Vec<Arc<dyn EventHandler>>;

/// Read-only registry of event handlers, one table for synchronous dispatch
/// and one for asynchronous dispatch. An event type may appear in one table,
/// both, or neither.
///
/// Built once at process startup via [`RegistryBuilder`] and shared behind an
/// `Arc` for the remainder of the process lifetime. Because it is never
/// mutated after `build()`, concurrent readers need no locking.
pub struct EventRegistry {
    sync_handlers: HashMap<EventType, HandlerList>,
    async_handlers: HashMap<EventType, HandlerList>,
}

impl EventRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Handlers registered for synchronous dispatch of `event_type`, in
    /// registration order. Fails with `NoHandlerAvailable` when the type
    /// was never registered; a declared-but-empty entry returns an empty
    /// slice instead.
    pub fn sync_handlers(&self, event_type: EventType) -> Result<&[Arc<dyn EventHandler>], Error> {
        self.sync_handlers
            .get(&event_type)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::no_handler(event_type))
    }

    /// Handlers registered for asynchronous dispatch of `event_type`, in
    /// registration order. Same lookup semantics as [`EventRegistry::sync_handlers`].
    pub fn async_handlers(&self, event_type: EventType) -> Result<&[Arc<dyn EventHandler>], Error> {
        self.async_handlers
            .get(&event_type)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::no_handler(event_type))
    }
}

/// Builder consumed during process initialization. There is deliberately no
/// mutation API on [`EventRegistry`] itself: registration happens here, once,
/// from static configuration.
#[derive(Default)]
pub struct RegistryBuilder {
    sync_handlers: HashMap<EventType, HandlerList>,
    async_handlers: HashMap<EventType, HandlerList>,
}

impl RegistryBuilder {
    /// Append a handler to the synchronous table for `event_type`.
    /// Registration order is execution order.
    pub fn with_sync_handler(
        mut self,
        event_type: EventType,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        self.sync_handlers.entry(event_type).or_default().push(handler);
        self
    }

    /// Append a handler to the asynchronous table for `event_type`.
    /// Registration order is submission order.
    pub fn with_async_handler(
        mut self,
        event_type: EventType,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        self.async_handlers.entry(event_type).or_default().push(handler);
        self
    }

    /// Register `event_type` in the synchronous table with no handlers.
    /// Dispatching it succeeds silently rather than raising `NoHandlerAvailable`.
    pub fn declare_sync(mut self, event_type: EventType) -> Self {
        self.sync_handlers.entry(event_type).or_default();
        self
    }

    /// Register `event_type` in the asynchronous table with no handlers.
    pub fn declare_async(mut self, event_type: EventType) -> Self {
        self.async_handlers.entry(event_type).or_default();
        self
    }

    pub fn build(self) -> EventRegistry {
        EventRegistry {
            sync_handlers: self.sync_handlers,
            async_handlers: self.async_handlers,
        }
    }
}
