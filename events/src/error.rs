//! Error types for the event dispatch layer.
use crate::event::EventType;
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;

/// Top-level dispatch error type.
/// Follows the platform error pattern: a root `Error` struct holding an
/// `error_kind` enum plus an optional `source` for error chaining. Callers
/// of `dispatch`/`dispatch_async` match on `error_kind` to distinguish the
/// three dispatch failure classes and, for the extended case, inspect the
/// structured payload programmatically.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// The dispatch failure taxonomy.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The event type has no entry in the registry table being consulted.
    /// An entry with an empty handler list is not this error.
    NoHandlerAvailable(EventType),
    /// A handler reported a failure without structured diagnostic data,
    /// or reported a failure carrying no detail at all.
    Handler(String),
    /// A handler reported a failure with a structured diagnostic mapping.
    /// `payload` holds the mapping minus the extracted `message` field.
    HandlerExtended {
        message: String,
        payload: Map<String, Value>,
    },
}

impl Error {
    pub(crate) fn no_handler(event_type: EventType) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::NoHandlerAvailable(event_type),
        }
    }

    pub(crate) fn handler(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::Handler(message.into()),
        }
    }

    pub(crate) fn handler_extended(message: impl Into<String>, payload: Map<String, Value>) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::HandlerExtended {
                message: message.into(),
                payload,
            },
        }
    }

    /// Human-readable message for the failure, mirroring what was logged.
    pub fn message(&self) -> String {
        match &self.error_kind {
            ErrorKind::NoHandlerAvailable(event_type) => {
                format!("No handler available for {event_type}")
            }
            ErrorKind::Handler(message) => message.clone(),
            ErrorKind::HandlerExtended { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
