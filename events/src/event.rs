//! Domain event model for the billing platform.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A type alias that represents any entity's internal id field data type.
pub type Id = Uuid;

/// Domain events that represent business-level changes in the billing system.
/// These events are emitted when domain operations complete successfully.
///
/// Entity data is carried as `serde_json::Value` to avoid dependencies on
/// the entity layer. Events are immutable once constructed; the dispatcher
/// borrows them and never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DomainEvent {
    /// Emitted when a subscription transitions into the active state,
    /// either on initial signup or on reactivation after a lapse.
    #[serde(rename = "subscription_activated")]
    SubscriptionActivated {
        subscription_id: Id,
        customer_id: Id,
        /// Complete serialized subscription entity (plan, term, status, etc.).
        subscription: Value,
    },
    /// Emitted when a subscription is cancelled by the customer or by dunning.
    #[serde(rename = "subscription_cancelled")]
    SubscriptionCancelled {
        subscription_id: Id,
        customer_id: Id,
    },
    /// Emitted when a draft invoice is finalized and becomes payable.
    #[serde(rename = "invoice_finalized")]
    InvoiceFinalized {
        invoice_id: Id,
        customer_id: Id,
        /// Complete serialized invoice entity (line items, totals, due date, etc.).
        invoice: Value,
    },
    /// Emitted when a payment attempt against an invoice fails.
    #[serde(rename = "payment_failed")]
    PaymentFailed {
        invoice_id: Id,
        customer_id: Id,
        /// Processor-specific decline code, e.g. "card_declined".
        failure_code: String,
    },
}

impl DomainEvent {
    /// The discriminant used as the registry lookup key. Stable for the
    /// lifetime of the event instance.
    pub fn event_type(&self) -> EventType {
        match self {
            DomainEvent::SubscriptionActivated { .. } => EventType::SubscriptionActivated,
            DomainEvent::SubscriptionCancelled { .. } => EventType::SubscriptionCancelled,
            DomainEvent::InvoiceFinalized { .. } => EventType::InvoiceFinalized,
            DomainEvent::PaymentFailed { .. } => EventType::PaymentFailed,
        }
    }

    /// Serialize the event for hand-off to the job-scheduling collaborator.
    /// Deterministic for identical payload content.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Rebuild an event from a job payload produced by [`DomainEvent::to_payload`].
    pub fn from_payload(payload: &str) -> Result<DomainEvent, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Event type discriminants. Used as registry keys and, via `Display`,
/// as the textual event names carried in job descriptors and log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    SubscriptionActivated,
    SubscriptionCancelled,
    InvoiceFinalized,
    PaymentFailed,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventType::SubscriptionActivated => write!(f, "subscription_activated"),
            EventType::SubscriptionCancelled => write!(f, "subscription_cancelled"),
            EventType::InvoiceFinalized => write!(f, "invoice_finalized"),
            EventType::PaymentFailed => write!(f, "payment_failed"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseEventTypeError;

impl FromStr for EventType {
    type Err = ParseEventTypeError;
    fn from_str(name: &str) -> Result<EventType, Self::Err> {
        match name {
            "subscription_activated" => Ok(EventType::SubscriptionActivated),
            "subscription_cancelled" => Ok(EventType::SubscriptionCancelled),
            "invoice_finalized" => Ok(EventType::InvoiceFinalized),
            "payment_failed" => Ok(EventType::PaymentFailed),
            _ => Err(ParseEventTypeError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice_finalized() -> DomainEvent {
        DomainEvent::InvoiceFinalized {
            invoice_id: Uuid::nil(),
            customer_id: Uuid::nil(),
            invoice: json!({"total_cents": 4_200, "currency": "EUR"}),
        }
    }

    #[test]
    fn test_event_type_display_round_trips_through_from_str() {
        let types = [
            EventType::SubscriptionActivated,
            EventType::SubscriptionCancelled,
            EventType::InvoiceFinalized,
            EventType::PaymentFailed,
        ];
        for event_type in types {
            assert_eq!(
                event_type.to_string().parse::<EventType>(),
                Ok(event_type),
                "{event_type} should parse back to itself"
            );
        }
    }

    #[test]
    fn test_unknown_event_type_name_fails_to_parse() {
        assert_eq!("tooltip_shown".parse::<EventType>(), Err(ParseEventTypeError));
    }

    #[test]
    fn test_payload_is_deterministic_for_identical_content() {
        let first = invoice_finalized().to_payload().unwrap();
        let second = invoice_finalized().to_payload().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_rebuilds_the_same_event() {
        let event = invoice_finalized();
        let payload = event.to_payload().unwrap();
        let rebuilt = DomainEvent::from_payload(&payload).unwrap();
        assert_eq!(rebuilt, event);
        assert_eq!(rebuilt.event_type(), EventType::InvoiceFinalized);
    }
}
