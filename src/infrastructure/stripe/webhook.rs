//! Verification of signed Stripe webhook deliveries.
//!
//! Stripe signs `"{timestamp}.{raw body}"` with HMAC-SHA256 keyed by the
//! endpoint secret and sends `Stripe-Signature: t=<unix>,v1=<hex>[,v1=<hex>]`.
//! Several `v1` entries appear while a secret is being rolled; any match is
//! accepted.

use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use log::trace;
use sha2::Sha256;
use thiserror::Error;

use crate::config::Secret;
use crate::domain::payment::WebhookEvent;

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Malformed signature header")]
    MalformedHeader,
    #[error("Signature header has no timestamp")]
    MissingTimestamp,
    #[error("Signature header has no v1 signature")]
    MissingSignature,
    #[error("No signature matches the payload")]
    SignatureMismatch,
    #[error("Signature timestamp is outside the tolerance window")]
    TimestampOutsideTolerance,
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

pub struct WebhookVerifier {
    secret: Secret<String>,
    tolerance: Duration,
}

impl WebhookVerifier {
    pub fn new(secret: Secret<String>, tolerance: Duration) -> Self {
        Self { secret, tolerance }
    }

    /// Verify `payload` against `header` and decode it into an event.
    pub fn construct_event(
        &self,
        payload: &[u8],
        header: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        self.verify_at(payload, header, Utc::now().timestamp())?;
        serde_json::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }

    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<(), WebhookError> {
        let (timestamp, signatures) = parse_header(header)?;

        let matched = signatures.iter().any(|expected| {
            let Ok(mut mac) = HmacSha256::new_from_slice(self.secret.reveal().as_bytes()) else {
                return false;
            };
            mac.update(timestamp.to_string().as_bytes());
            mac.update(b".");
            mac.update(payload);
            mac.verify_slice(expected).is_ok()
        });
        if !matched {
            return Err(WebhookError::SignatureMismatch);
        }

        let tolerance = i64::try_from(self.tolerance.as_secs()).unwrap_or(i64::MAX);
        if timestamp < now.saturating_sub(tolerance) {
            return Err(WebhookError::TimestampOutsideTolerance);
        }
        trace!("Webhook signature for t={timestamp} verified");
        Ok(())
    }
}

fn parse_header(header: &str) -> Result<(i64, Vec<Vec<u8>>), WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part.trim().split_once('=').ok_or(WebhookError::MalformedHeader)?;
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| WebhookError::MalformedHeader)?,
                )
            }
            // Undecodable entries can never match; skip them like unknown schemes.
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::MissingTimestamp)?;
    if signatures.is_empty() {
        return Err(WebhookError::MissingSignature);
    }
    Ok((timestamp, signatures))
}

#[cfg(test)]
pub(crate) fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}
