use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalog::{Currency, Discount, Item, NewAdjustment, NewItem, Tax};
use crate::domain::order::{OrderStatus, OrderView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    /// `usd` or `rub`
    pub currency: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAdjustmentRequest {
    pub name: String,
    /// Whole percent, 0 to 100
    pub percentage: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemsRequest {
    pub item_ids: Vec<i64>,
}

impl OrderItemsRequest {
    fn into_ids(self) -> Result<Vec<i64>, AppError> {
        if self.item_ids.is_empty() {
            return Err(AppError::BadRequest("item_ids must not be empty".to_string()));
        }
        Ok(self.item_ids)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub currency: Currency,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price.to_string(),
            currency: item.currency,
        }
    }
}

/// A discount or a tax.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdjustmentResponse {
    pub id: i64,
    pub name: String,
    pub percentage: i32,
    pub stripe_id: String,
}

impl From<Discount> for AdjustmentResponse {
    fn from(d: Discount) -> Self {
        Self {
            id: d.id,
            name: d.name,
            percentage: d.percentage,
            stripe_id: d.stripe_id,
        }
    }
}

impl From<Tax> for AdjustmentResponse {
    fn from(t: Tax) -> Self {
        Self {
            id: t.id,
            name: t.name,
            percentage: t.percentage,
            stripe_id: t.stripe_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub created_at: String,
    pub status: OrderStatus,
    pub currency: Option<Currency>,
    pub items: Vec<ItemResponse>,
    pub discount: Option<AdjustmentResponse>,
    pub tax: Option<AdjustmentResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        Self {
            id: order.id,
            created_at: order.created_at.to_rfc3339(),
            status: order.status,
            currency: order.currency,
            items: order.items.into_iter().map(ItemResponse::from).collect(),
            discount: order.discount.map(AdjustmentResponse::from),
            tax: order.tax.map(AdjustmentResponse::from),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /items
#[utoipa::path(
    post,
    path = "/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Validation error"),
    ),
    tag = "catalog"
)]
pub async fn create_item(
    state: web::Data<AppState>,
    body: web::Json<CreateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let price = BigDecimal::from_str(body.price.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {e}", body.price)))?;
    let currency = Currency::from_str(&body.currency)?;
    let item = NewItem::new(body.name, body.description, price, currency)?;

    let catalog = state.catalog.clone();
    let item = web::block(move || catalog.create_item(item)).await??;

    Ok(HttpResponse::Created().json(ItemResponse::from(item)))
}

/// POST /discounts
///
/// Registers a coupon with the payment provider, then stores the discount
/// with the coupon id.
#[utoipa::path(
    post,
    path = "/discounts",
    request_body = CreateAdjustmentRequest,
    responses(
        (status = 201, description = "Discount created", body = AdjustmentResponse),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Payment provider error"),
    ),
    tag = "catalog"
)]
pub async fn create_discount(
    state: web::Data<AppState>,
    body: web::Json<CreateAdjustmentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let adjustment = NewAdjustment::new(body.name, body.percentage)?;
    let stripe_id = state.checkout.register_discount(&adjustment).await?;

    let catalog = state.catalog.clone();
    let discount = web::block(move || catalog.save_discount(adjustment, stripe_id)).await??;

    Ok(HttpResponse::Created().json(AdjustmentResponse::from(discount)))
}

/// POST /taxes
///
/// Registers an exclusive tax rate with the payment provider, then stores
/// the tax with the rate id.
#[utoipa::path(
    post,
    path = "/taxes",
    request_body = CreateAdjustmentRequest,
    responses(
        (status = 201, description = "Tax created", body = AdjustmentResponse),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Payment provider error"),
    ),
    tag = "catalog"
)]
pub async fn create_tax(
    state: web::Data<AppState>,
    body: web::Json<CreateAdjustmentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let adjustment = NewAdjustment::new(body.name, body.percentage)?;
    let stripe_id = state.checkout.register_tax(&adjustment).await?;

    let catalog = state.catalog.clone();
    let tax = web::block(move || catalog.save_tax(adjustment, stripe_id)).await??;

    Ok(HttpResponse::Created().json(AdjustmentResponse::from(tax)))
}

/// GET /orders/{id}
///
/// Returns the order together with its items, discount and tax.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let orders = state.orders.clone();
    let order = web::block(move || orders.get_order(id)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/items
///
/// Attaches items to the order. Items in a different currency than the
/// order's are rejected and the order is left unchanged.
#[utoipa::path(
    post,
    path = "/orders/{id}/items",
    params(
        ("id" = i64, Path, description = "Order id"),
    ),
    request_body = OrderItemsRequest,
    responses(
        (status = 200, description = "Items attached", body = OrderResponse),
        (status = 400, description = "Empty item list or mixed currencies"),
        (status = 404, description = "Order or item not found"),
    ),
    tag = "orders"
)]
pub async fn add_order_items(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<OrderItemsRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let item_ids = body.into_inner().into_ids()?;
    let orders = state.orders.clone();
    let order = web::block(move || orders.add_items(id, &item_ids)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/{id}/items
///
/// Detaches items from the order; removing the last item clears its currency.
#[utoipa::path(
    delete,
    path = "/orders/{id}/items",
    params(
        ("id" = i64, Path, description = "Order id"),
    ),
    request_body = OrderItemsRequest,
    responses(
        (status = 200, description = "Items detached", body = OrderResponse),
        (status = 400, description = "Empty item list"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn remove_order_items(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<OrderItemsRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let item_ids = body.into_inner().into_ids()?;
    let orders = state.orders.clone();
    let order = web::block(move || orders.remove_items(id, &item_ids)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
