use std::sync::Arc;

use bigdecimal::BigDecimal;
use log::{info, warn};

use crate::domain::catalog::{Discount, NewAdjustment, Tax};
use crate::domain::errors::DomainError;
use crate::domain::order::OrderView;
use crate::domain::payment::{
    CheckoutSessionParams, LineItem, PaymentIntentParams, PriceData, ProductData,
};
use crate::domain::ports::PaymentProvider;
use crate::domain::pricing;

/// Builds provider requests for an order and resolves the percentages the
/// provider holds for its discount and tax.
#[derive(Clone)]
pub struct CheckoutService {
    provider: Arc<dyn PaymentProvider>,
}

impl CheckoutService {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    /// Create the coupon for a validated discount and return its provider id.
    pub async fn register_discount(
        &self,
        adjustment: &NewAdjustment,
    ) -> Result<String, DomainError> {
        Ok(self.provider.create_coupon(adjustment).await?)
    }

    /// Create the (exclusive) tax rate and return its provider id.
    pub async fn register_tax(&self, adjustment: &NewAdjustment) -> Result<String, DomainError> {
        Ok(self.provider.create_tax_rate(adjustment).await?)
    }

    pub fn line_items(&self, order: &OrderView) -> Result<Vec<LineItem>, DomainError> {
        let tax_rates: Vec<String> = order
            .tax
            .as_ref()
            .filter(|t| !t.stripe_id.is_empty())
            .map(|t| vec![t.stripe_id.clone()])
            .unwrap_or_default();

        order
            .items
            .iter()
            .map(|item| {
                Ok(LineItem {
                    price_data: PriceData {
                        currency: order.currency.unwrap_or(item.currency),
                        product_data: ProductData {
                            name: item.name.clone(),
                            description: item.description.clone(),
                        },
                        unit_amount: pricing::convert_price(&item.price)?,
                    },
                    quantity: 1,
                    tax_rates: tax_rates.clone(),
                })
            })
            .collect()
    }

    pub fn session_params(
        &self,
        order: &OrderView,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSessionParams, DomainError> {
        let discounts = order
            .discount
            .as_ref()
            .filter(|d| !d.stripe_id.is_empty())
            .map(|d| vec![d.stripe_id.clone()])
            .unwrap_or_default();

        Ok(CheckoutSessionParams {
            line_items: self.line_items(order)?,
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
            discounts,
            order_id: order.id,
        })
    }

    /// Order total in minor units. Adjustments the provider cannot resolve
    /// are skipped.
    pub async fn calculate_total(&self, order: &OrderView) -> Result<i64, DomainError> {
        let discount_pct = self.resolve_discount(order.discount.as_ref()).await;
        let tax_pct = self.resolve_tax(order.tax.as_ref()).await;
        pricing::calculate_total(&order.items, discount_pct.as_ref(), tax_pct.as_ref())
    }

    async fn resolve_discount(&self, discount: Option<&Discount>) -> Option<BigDecimal> {
        let discount = discount.filter(|d| !d.stripe_id.is_empty())?;
        match self.provider.coupon_percent_off(&discount.stripe_id).await {
            Ok(Some(pct)) => Some(pct),
            Ok(None) => {
                warn!("Coupon {} has no percent_off; skipping discount", discount.stripe_id);
                None
            }
            Err(e) => {
                warn!("Could not resolve coupon {}: {e}; skipping discount", discount.stripe_id);
                None
            }
        }
    }

    async fn resolve_tax(&self, tax: Option<&Tax>) -> Option<BigDecimal> {
        let tax = tax.filter(|t| !t.stripe_id.is_empty())?;
        match self.provider.tax_rate_percentage(&tax.stripe_id).await {
            Ok(Some(pct)) => Some(pct),
            Ok(None) => {
                warn!("Tax rate {} has no percentage; skipping tax", tax.stripe_id);
                None
            }
            Err(e) => {
                warn!("Could not resolve tax rate {}: {e}; skipping tax", tax.stripe_id);
                None
            }
        }
    }

    /// Create a payment intent for the order total and return its client secret.
    pub async fn create_payment_intent(&self, order: &OrderView) -> Result<String, DomainError> {
        let currency = order.currency.ok_or_else(|| nothing_to_pay_for(order))?;
        let amount = self.calculate_total(order).await?;

        let secret = self
            .provider
            .create_payment_intent(&PaymentIntentParams {
                amount,
                currency,
                order_id: order.id,
            })
            .await?;
        info!("Created payment intent for order {} ({amount} {currency})", order.id);
        Ok(secret)
    }

    /// Create a hosted checkout session for the order and return its id.
    pub async fn create_checkout_session(
        &self,
        order: &OrderView,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String, DomainError> {
        if order.items.is_empty() {
            return Err(nothing_to_pay_for(order));
        }
        let params = self.session_params(order, success_url, cancel_url)?;
        let session_id = self.provider.create_checkout_session(&params).await?;
        info!("Created checkout session {session_id} for order {}", order.id);
        Ok(session_id)
    }
}

fn nothing_to_pay_for(order: &OrderView) -> DomainError {
    DomainError::InvalidInput(format!("order {} has no items to pay for", order.id))
}
