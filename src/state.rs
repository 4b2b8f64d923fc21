use std::sync::Arc;

use crate::application::buy_cache::BuyCache;
use crate::application::catalog_service::CatalogService;
use crate::application::checkout_service::CheckoutService;
use crate::application::order_service::OrderService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::domain::payment::PaymentError;
use crate::domain::ports::{CatalogRepository, OrderRepository, PaymentProvider};
use crate::infrastructure::catalog_repo::DieselCatalogRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::stripe::webhook::WebhookVerifier;
use crate::infrastructure::stripe::StripeClient;

/// Everything a request handler needs, shared across workers via `web::Data`.
pub struct AppState {
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub checkout: CheckoutService,
    /// Client secrets handed out by `/buy`.
    pub buy_cache: BuyCache<String>,
    pub webhooks: WebhookVerifier,
    pub stripe_public_key: String,
    pub default_discount_id: Option<i64>,
    pub default_tax_id: Option<i64>,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Result<Self, PaymentError> {
        let provider = StripeClient::new(&config.stripe)?;
        Ok(Self::from_ports(
            Arc::new(DieselCatalogRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool)),
            Arc::new(provider),
            config,
        ))
    }

    pub fn from_ports(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        provider: Arc<dyn PaymentProvider>,
        config: &AppConfig,
    ) -> Self {
        Self {
            catalog: CatalogService::new(catalog),
            orders: OrderService::new(orders),
            checkout: CheckoutService::new(provider),
            buy_cache: BuyCache::new(config.buy_cache_ttl),
            webhooks: WebhookVerifier::new(
                config.stripe.webhook_secret.clone(),
                config.stripe.webhook_tolerance,
            ),
            stripe_public_key: config.stripe.public_key.clone(),
            default_discount_id: config.default_discount_id,
            default_tax_id: config.default_tax_id,
        }
    }
}
