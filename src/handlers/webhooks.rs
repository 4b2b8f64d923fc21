use actix_web::{web, HttpRequest, HttpResponse};
use log::warn;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::order::WebhookOutcome;
use crate::errors::AppError;
use crate::infrastructure::stripe::webhook::SIGNATURE_HEADER;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookResponse {
    /// `updated` or `ignored`
    pub status: String,
    pub order_id: Option<i64>,
}

/// POST /webhooks/stripe
///
/// Verifies the provider signature over the raw body and moves the
/// referenced order to `InProgress` for payment events.
#[utoipa::path(
    post,
    path = "/webhooks/stripe",
    request_body(
        content = String,
        description = "Raw provider event",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Event processed or ignored", body = WebhookResponse),
        (status = 400, description = "Bad signature or payload"),
        (status = 404, description = "Order not found"),
    ),
    tag = "webhooks"
)]
pub async fn stripe_webhook(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let Some(signature) = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
    else {
        warn!("Rejecting webhook without {SIGNATURE_HEADER} header");
        return Err(AppError::BadRequest(format!(
            "Missing {SIGNATURE_HEADER} header"
        )));
    };

    let event = state.webhooks.construct_event(&body, signature).map_err(|e| {
        warn!("Rejecting webhook: {e}");
        AppError::from(e)
    })?;

    let orders = state.orders.clone();
    let outcome = web::block(move || orders.apply_webhook(&event)).await??;

    let body = match outcome {
        WebhookOutcome::Updated(order) => WebhookResponse {
            status: "updated".to_string(),
            order_id: Some(order.id),
        },
        WebhookOutcome::Ignored => WebhookResponse {
            status: "ignored".to_string(),
            order_id: None,
        },
    };
    Ok(HttpResponse::Ok().json(body))
}
