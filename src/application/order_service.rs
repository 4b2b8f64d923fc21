use std::sync::Arc;

use log::{debug, info, warn};

use crate::domain::catalog::{Discount, Item, Tax};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderRequest, OrderView, WebhookOutcome};
use crate::domain::payment::WebhookEvent;
use crate::domain::ports::OrderRepository;

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Reuse the session's pending order for exactly these items, discount
    /// and tax, or create it.
    pub fn find_or_create(
        &self,
        items: &[Item],
        session_key: &str,
        discount: Option<&Discount>,
        tax: Option<&Tax>,
    ) -> Result<OrderView, DomainError> {
        let request = OrderRequest::new(items, session_key, discount, tax);
        debug!(
            "Resolving order for {} item(s), discount {:?}, tax {:?}",
            request.item_ids.len(),
            request.discount_id,
            request.tax_id
        );
        self.repo.find_or_create(&request)
    }

    pub fn get_order(&self, id: i64) -> Result<OrderView, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Order"))
    }

    pub fn add_items(&self, order_id: i64, item_ids: &[i64]) -> Result<OrderView, DomainError> {
        self.repo.add_items(order_id, item_ids)
    }

    pub fn remove_items(&self, order_id: i64, item_ids: &[i64]) -> Result<OrderView, DomainError> {
        self.repo.remove_items(order_id, item_ids)
    }

    /// Move the referenced order to `InProgress` for payment events; ignore
    /// every other event kind.
    pub fn apply_webhook(&self, event: &WebhookEvent) -> Result<WebhookOutcome, DomainError> {
        if !event.kind.marks_paid() {
            debug!("Ignoring webhook event {:?}", event.kind);
            return Ok(WebhookOutcome::Ignored);
        }

        let Some(order_id) = event.order_reference().and_then(|r| r.parse::<i64>().ok()) else {
            warn!(
                "Webhook {:?} carries no usable order id: {:?}",
                event.kind,
                event.order_reference()
            );
            return Err(DomainError::NotFound("Order"));
        };

        match self.repo.mark_in_progress(order_id)? {
            Some(order) => {
                info!("Order {order_id} is now {} after {:?}", order.status, event.kind);
                Ok(WebhookOutcome::Updated(order))
            }
            None => {
                warn!("Webhook {:?} references unknown order {order_id}", event.kind);
                Err(DomainError::NotFound("Order"))
            }
        }
    }
}
