//! Typed payloads exchanged with the payment provider.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::catalog::Currency;
use super::errors::DomainError;

pub const ORDER_ID_METADATA_KEY: &str = "order_id";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Could not reach the payment provider: {0}")]
    Transport(String),
    #[error("Payment provider rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected payment provider response: {0}")]
    Decode(String),
}

impl From<PaymentError> for DomainError {
    fn from(e: PaymentError) -> Self {
        DomainError::Payment(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductData {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceData {
    pub currency: Currency,
    pub product_data: ProductData,
    /// Minor units.
    pub unit_amount: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub price_data: PriceData,
    pub quantity: u32,
    pub tax_rates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionParams {
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Coupon ids.
    pub discounts: Vec<String>,
    pub order_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentParams {
    pub amount: i64,
    pub currency: Currency,
    pub order_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum WebhookEventKind {
    #[serde(rename = "checkout.session.completed")]
    CheckoutSessionCompleted,
    #[serde(rename = "payment_intent.succeeded")]
    PaymentIntentSucceeded,
    #[serde(other)]
    Other,
}

impl WebhookEventKind {
    /// Whether this event means the customer has paid.
    pub fn marks_paid(&self) -> bool {
        matches!(self, Self::CheckoutSessionCompleted | Self::PaymentIntentSucceeded)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: WebhookEventKind,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: WebhookObject,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookObject {
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl WebhookEvent {
    /// The raw `order_id` metadata value, if the provider echoed one.
    pub fn order_reference(&self) -> Option<&str> {
        self.data.object.metadata.get(ORDER_ID_METADATA_KEY).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_event_kinds() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"type":"payment_intent.succeeded","data":{"object":{"metadata":{"order_id":"12"}}}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, WebhookEventKind::PaymentIntentSucceeded);
        assert!(event.kind.marks_paid());
        assert_eq!(event.order_reference(), Some("12"));
    }

    #[test]
    fn unknown_event_kind_is_other() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"type":"charge.refunded","data":{"object":{"id":"ch_1"}}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, WebhookEventKind::Other);
        assert!(!event.kind.marks_paid());
        assert_eq!(event.order_reference(), None);
    }
}
