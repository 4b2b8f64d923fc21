use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Currency, Item};
use crate::domain::order::OrderView;
use crate::errors::AppError;
use crate::state::AppState;

use super::session::Session;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemPageResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Decimal price as a string, e.g. "9.99"
    pub price: String,
    pub currency: Currency,
    pub currency_symbol: String,
    pub buy_url: String,
    pub session_url: String,
    pub complete_url: String,
    pub stripe_public_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BuyResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

fn absolute_url(req: &HttpRequest, path: &str) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), path)
}

/// Find or create the session's pending order for a single item with the
/// configured default discount and tax.
async fn resolve_order(
    state: &web::Data<AppState>,
    item_id: i64,
    session_key: &str,
) -> Result<OrderView, AppError> {
    let catalog = state.catalog.clone();
    let orders = state.orders.clone();
    let (discount_id, tax_id) = (state.default_discount_id, state.default_tax_id);
    let session_key = session_key.to_string();

    let order = web::block(move || {
        let item = catalog.get_item(item_id)?;
        let discount = catalog.find_discount(discount_id)?;
        let tax = catalog.find_tax(tax_id)?;
        orders.find_or_create(&[item], &session_key, discount.as_ref(), tax.as_ref())
    })
    .await??;
    Ok(order)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /item/{id}
///
/// Item detail with everything the payment page needs.
#[utoipa::path(
    get,
    path = "/item/{id}",
    params(
        ("id" = i64, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Item found", body = ItemPageResponse),
        (status = 404, description = "Item not found"),
    ),
    tag = "shop"
)]
pub async fn get_item(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let item: Item = web::block(move || catalog.get_item(id)).await??;

    let body = ItemPageResponse {
        id: item.id,
        name: item.name,
        description: item.description,
        price: item.price.to_string(),
        currency: item.currency,
        currency_symbol: item.currency.symbol().to_string(),
        buy_url: absolute_url(&req, &format!("/buy/{id}")),
        session_url: absolute_url(&req, &format!("/buy/{id}/session")),
        complete_url: absolute_url(&req, "/complete"),
        stripe_public_key: state.stripe_public_key.clone(),
    };

    let mut resp = HttpResponse::Ok();
    session.attach(&mut resp);
    Ok(resp.json(body))
}

/// GET /buy/{id}
///
/// Creates a payment intent for the session's order of this item. Repeat
/// calls within the cache window return the same client secret.
#[utoipa::path(
    get,
    path = "/buy/{id}",
    params(
        ("id" = i64, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Payment intent created", body = BuyResponse),
        (status = 404, description = "Item not found"),
        (status = 502, description = "Payment provider error"),
    ),
    tag = "shop"
)]
pub async fn buy_item(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let mut resp = HttpResponse::Ok();
    session.attach(&mut resp);

    if let Some(client_secret) = state.buy_cache.get(session.key(), item_id) {
        debug!("Serving cached payment intent for item {item_id}");
        return Ok(resp.json(BuyResponse { client_secret }));
    }

    let order = resolve_order(&state, item_id, session.key()).await?;
    let client_secret = state.checkout.create_payment_intent(&order).await?;
    state.buy_cache.set(session.key(), item_id, client_secret.clone());

    Ok(resp.json(BuyResponse { client_secret }))
}

/// GET /buy/{id}/session
///
/// Creates a hosted checkout session for the session's order of this item.
#[utoipa::path(
    get,
    path = "/buy/{id}/session",
    params(
        ("id" = i64, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutSessionResponse),
        (status = 404, description = "Item not found"),
        (status = 502, description = "Payment provider error"),
    ),
    tag = "shop"
)]
pub async fn buy_item_session(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let order = resolve_order(&state, item_id, session.key()).await?;
    let session_id = state
        .checkout
        .create_checkout_session(
            &order,
            &absolute_url(&req, "/success"),
            &absolute_url(&req, "/cancel"),
        )
        .await?;

    let mut resp = HttpResponse::Ok();
    session.attach(&mut resp);
    Ok(resp.json(CheckoutSessionResponse { session_id }))
}
