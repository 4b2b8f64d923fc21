//! Minimal Stripe REST client covering the calls checkout needs.

pub mod params;
pub mod webhook;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use log::{debug, trace};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{Secret, StripeConfig};
use crate::domain::catalog::NewAdjustment;
use crate::domain::payment::{CheckoutSessionParams, PaymentError, PaymentIntentParams};
use crate::domain::ports::PaymentProvider;

use self::params::Form;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Coupon {
    percent_off: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TaxRate {
    percentage: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    client_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

pub struct StripeClient {
    http: Client,
    api_base: String,
    secret_key: Secret<String>,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &Form,
    ) -> Result<T, PaymentError> {
        trace!("POST /v1/{path} with {} field(s)", form.len());
        self.send(self.http.post(self.url(path)).form(form)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PaymentError> {
        trace!("GET /v1/{path}");
        self.send(self.http.get(self.url(path))).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, PaymentError> {
        let response = request
            .bearer_auth(self.secret_key.reveal())
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| PaymentError::Decode(e.to_string()));
        }
        let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
        debug!("Stripe answered {status}: {}", body.error.message);
        Err(PaymentError::Api {
            status: status.as_u16(),
            message: body.error.message,
        })
    }
}

/// Stripe reports percentages as JSON numbers; zero or absent means no
/// adjustment.
fn to_percentage(value: Option<f64>) -> Result<Option<BigDecimal>, PaymentError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let pct = BigDecimal::from_str(&value.to_string())
        .map_err(|e| PaymentError::Decode(format!("percentage {value}: {e}")))?;
    Ok((!pct.is_zero()).then_some(pct))
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_coupon(&self, adjustment: &NewAdjustment) -> Result<String, PaymentError> {
        let created: Created = self
            .post_form("coupons", &params::coupon_form(adjustment))
            .await?;
        Ok(created.id)
    }

    async fn create_tax_rate(&self, adjustment: &NewAdjustment) -> Result<String, PaymentError> {
        let created: Created = self
            .post_form("tax_rates", &params::tax_rate_form(adjustment))
            .await?;
        Ok(created.id)
    }

    async fn coupon_percent_off(
        &self,
        coupon_id: &str,
    ) -> Result<Option<BigDecimal>, PaymentError> {
        let coupon: Coupon = self.get(&format!("coupons/{coupon_id}")).await?;
        to_percentage(coupon.percent_off)
    }

    async fn tax_rate_percentage(
        &self,
        tax_rate_id: &str,
    ) -> Result<Option<BigDecimal>, PaymentError> {
        let rate: TaxRate = self.get(&format!("tax_rates/{tax_rate_id}")).await?;
        to_percentage(rate.percentage)
    }

    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> Result<String, PaymentError> {
        let intent: PaymentIntent = self
            .post_form("payment_intents", &params::payment_intent_form(params))
            .await?;
        intent
            .client_secret
            .ok_or_else(|| PaymentError::Decode("payment intent has no client_secret".to_string()))
    }

    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<String, PaymentError> {
        let session: Created = self
            .post_form("checkout/sessions", &params::checkout_session_form(params))
            .await?;
        Ok(session.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_parse_exactly() {
        assert_eq!(to_percentage(Some(12.5)).unwrap(), Some(BigDecimal::from_str("12.5").unwrap()));
        assert_eq!(to_percentage(Some(10.0)).unwrap(), Some(BigDecimal::from(10)));
    }

    #[test]
    fn zero_or_missing_percentage_is_none() {
        assert_eq!(to_percentage(None).unwrap(), None);
        assert_eq!(to_percentage(Some(0.0)).unwrap(), None);
    }

    #[test]
    fn api_base_trailing_slash_is_ignored() {
        let config = StripeConfig {
            secret_key: Secret::new("sk_test".to_string()),
            public_key: "pk_test".to_string(),
            webhook_secret: Secret::new("whsec".to_string()),
            api_base: "http://localhost:12111/".to_string(),
            webhook_tolerance: Duration::from_secs(300),
        };
        let client = StripeClient::new(&config).unwrap();
        assert_eq!(client.url("coupons"), "http://localhost:12111/v1/coupons");
    }
}
