//! Static handler registration for the billing platform.
//!
//! The registry is populated here, once, at process startup. There is no
//! runtime registration API; adding a handler means adding a line to
//! [`build_registry`].

use async_trait::async_trait;
use events::{
    DomainEvent, EventHandler, EventRegistry, EventType, FailureDetail, Outcome,
};
use log::*;
use std::sync::Arc;

/// Build the process-wide registry from the static handler configuration.
pub fn build_registry() -> EventRegistry {
    EventRegistry::builder()
        // Synchronous: must complete before the triggering operation returns.
        .with_sync_handler(EventType::SubscriptionActivated, Arc::new(ProvisioningHandler))
        .with_sync_handler(EventType::InvoiceFinalized, Arc::new(LedgerProjectionHandler))
        .with_sync_handler(EventType::SubscriptionCancelled, Arc::new(ProvisioningHandler))
        // Asynchronous: deferred to the job worker.
        .with_async_handler(EventType::InvoiceFinalized, Arc::new(ReceiptEmailHandler))
        .with_async_handler(EventType::PaymentFailed, Arc::new(DunningNoticeHandler))
        .build()
}

/// Grants or revokes entitlements when a subscription changes state.
#[derive(Debug)]
pub struct ProvisioningHandler;

#[async_trait]
impl EventHandler for ProvisioningHandler {
    fn name(&self) -> &'static str {
        "provisioning"
    }

    async fn handle(&self, event: &DomainEvent) -> Outcome {
        match event {
            DomainEvent::SubscriptionActivated {
                subscription_id, ..
            } => {
                debug!("Provisioning entitlements for subscription {subscription_id}");
                Outcome::Success
            }
            DomainEvent::SubscriptionCancelled {
                subscription_id, ..
            } => {
                debug!("Revoking entitlements for subscription {subscription_id}");
                Outcome::Success
            }
            other => Outcome::Failure(Some(FailureDetail::Message(format!(
                "provisioning cannot handle {}",
                other.event_type()
            )))),
        }
    }
}

/// Projects finalized invoices into the revenue ledger.
#[derive(Debug)]
pub struct LedgerProjectionHandler;

#[async_trait]
impl EventHandler for LedgerProjectionHandler {
    fn name(&self) -> &'static str {
        "ledger_projection"
    }

    async fn handle(&self, event: &DomainEvent) -> Outcome {
        match event {
            DomainEvent::InvoiceFinalized {
                invoice_id,
                invoice,
                ..
            } => {
                if invoice.get("total_cents").is_none() {
                    let mut payload = serde_json::Map::new();
                    payload.insert(
                        "message".to_string(),
                        serde_json::Value::String("Invoice is missing a total".to_string()),
                    );
                    payload.insert(
                        "invoice_id".to_string(),
                        serde_json::Value::String(invoice_id.to_string()),
                    );
                    return Outcome::Failure(Some(FailureDetail::Extended(payload)));
                }
                debug!("Posting invoice {invoice_id} to the ledger");
                Outcome::Success
            }
            other => Outcome::Failure(Some(FailureDetail::Message(format!(
                "ledger projection cannot handle {}",
                other.event_type()
            )))),
        }
    }
}

/// Sends the customer a receipt for a finalized invoice.
#[derive(Debug)]
pub struct ReceiptEmailHandler;

#[async_trait]
impl EventHandler for ReceiptEmailHandler {
    fn name(&self) -> &'static str {
        "receipt_email"
    }

    async fn handle(&self, event: &DomainEvent) -> Outcome {
        match event {
            DomainEvent::InvoiceFinalized { customer_id, .. } => {
                debug!("Queuing receipt email for customer {customer_id}");
                Outcome::Success
            }
            other => Outcome::Failure(Some(FailureDetail::Message(format!(
                "receipt email cannot handle {}",
                other.event_type()
            )))),
        }
    }
}

/// Notifies the customer that a payment attempt failed.
#[derive(Debug)]
pub struct DunningNoticeHandler;

#[async_trait]
impl EventHandler for DunningNoticeHandler {
    fn name(&self) -> &'static str {
        "dunning_notice"
    }

    async fn handle(&self, event: &DomainEvent) -> Outcome {
        match event {
            DomainEvent::PaymentFailed {
                customer_id,
                failure_code,
                ..
            } => {
                debug!("Sending dunning notice to {customer_id} for {failure_code}");
                Outcome::Success
            }
            other => Outcome::Failure(Some(FailureDetail::Message(format!(
                "dunning notice cannot handle {}",
                other.event_type()
            )))),
        }
    }
}
