use async_trait::async_trait;
use bigdecimal::BigDecimal;

use super::catalog::{Discount, Item, NewAdjustment, NewItem, Tax};
use super::errors::DomainError;
use super::order::{OrderRequest, OrderView};
use super::payment::{CheckoutSessionParams, PaymentError, PaymentIntentParams};

#[cfg_attr(test, mockall::automock)]
pub trait CatalogRepository: Send + Sync + 'static {
    fn find_item(&self, id: i64) -> Result<Option<Item>, DomainError>;
    fn create_item(&self, item: NewItem) -> Result<Item, DomainError>;
    fn find_discount(&self, id: i64) -> Result<Option<Discount>, DomainError>;
    fn create_discount(
        &self,
        adjustment: NewAdjustment,
        stripe_id: String,
    ) -> Result<Discount, DomainError>;
    fn find_tax(&self, id: i64) -> Result<Option<Tax>, DomainError>;
    fn create_tax(&self, adjustment: NewAdjustment, stripe_id: String) -> Result<Tax, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait OrderRepository: Send + Sync + 'static {
    /// Return the oldest pending order matching `request`, creating one if
    /// none exists. Must be atomic with respect to concurrent callers using
    /// the same session key.
    fn find_or_create(&self, request: &OrderRequest) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<OrderView>, DomainError>;
    fn add_items(&self, order_id: i64, item_ids: &[i64]) -> Result<OrderView, DomainError>;
    fn remove_items(&self, order_id: i64, item_ids: &[i64]) -> Result<OrderView, DomainError>;
    /// Write `InProgress` to the status column only. `None` if the order
    /// does not exist.
    fn mark_in_progress(&self, id: i64) -> Result<Option<OrderView>, DomainError>;
}

/// The external payment provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync + 'static {
    /// Register a coupon and return its provider id.
    async fn create_coupon(&self, adjustment: &NewAdjustment) -> Result<String, PaymentError>;
    /// Register an exclusive tax rate and return its provider id.
    async fn create_tax_rate(&self, adjustment: &NewAdjustment) -> Result<String, PaymentError>;
    async fn coupon_percent_off(
        &self,
        coupon_id: &str,
    ) -> Result<Option<BigDecimal>, PaymentError>;
    async fn tax_rate_percentage(
        &self,
        tax_rate_id: &str,
    ) -> Result<Option<BigDecimal>, PaymentError>;
    /// Returns the intent's client secret.
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> Result<String, PaymentError>;
    /// Returns the session id.
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<String, PaymentError>;
}
