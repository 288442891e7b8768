//! Handler outcomes and the shared interpretation logic that maps them
//! onto the dispatch error taxonomy.

use crate::error::Error;
use crate::event::DomainEvent;
use log::*;
use serde_json::{Map, Value};

/// Message used when a failure carries no usable message of its own.
const DEFAULT_FAILURE_MESSAGE: &str = "Execution failed";

/// Tagged result of a handler invocation. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success,
    /// `Failure(None)` models a handler that failed without reporting
    /// any detail at all.
    Failure(Option<FailureDetail>),
}

/// Detail attached to a failed outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureDetail {
    /// A plain human-readable reason.
    Message(String),
    /// A structured diagnostic mapping. A `message` entry, when present,
    /// becomes the human-readable reason; the rest is carried through for
    /// programmatic inspection by the caller.
    Extended(Map<String, Value>),
}

/// Judge a handler outcome, logging it and translating failures into the
/// dispatch error taxonomy.
///
/// This is the single interpretation point for both execution contexts:
/// the synchronous dispatch path calls it inline, and the deferred job
/// worker calls it after invoking an asynchronously scheduled handler.
pub fn interpret_outcome(
    handler_name: &str,
    event: &DomainEvent,
    outcome: Outcome,
) -> Result<(), Error> {
    match outcome {
        Outcome::Success => {
            info!("{handler_name} executed successfully. Event: {event:?}");
            Ok(())
        }
        Outcome::Failure(Some(FailureDetail::Extended(mut payload))) => {
            let message = match payload.remove("message") {
                Some(Value::String(message)) => message,
                Some(other) => other.to_string(),
                None => DEFAULT_FAILURE_MESSAGE.to_string(),
            };
            error!(
                "{handler_name} failed to execute. Error: {message} Payload: {payload:?} Event: {event:?}"
            );
            Err(Error::handler_extended(message, payload))
        }
        Outcome::Failure(Some(FailureDetail::Message(reason))) => {
            error!("{handler_name} failed to execute. Error: {reason} Event: {event:?}");
            Err(Error::handler(reason))
        }
        Outcome::Failure(None) => {
            error!("{handler_name} failed to execute with unknown error. Event: {event:?}");
            Err(Error::handler(DEFAULT_FAILURE_MESSAGE))
        }
    }
}
