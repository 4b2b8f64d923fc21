pub mod admin;
pub mod items;
pub mod pages;
pub mod session;
pub mod webhooks;


use actix_web::web;
use utoipa::OpenApi;

use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        items::get_item,
        items::buy_item,
        items::buy_item_session,
        pages::complete,
        pages::success,
        pages::cancel,
        webhooks::stripe_webhook,
        admin::create_item,
        admin::create_discount,
        admin::create_tax,
        admin::get_order,
        admin::add_order_items,
        admin::remove_order_items,
    ),
    tags(
        (name = "shop", description = "Item pages and payment"),
        (name = "pages", description = "Static payment result pages"),
        (name = "webhooks", description = "Payment provider notifications"),
        (name = "catalog", description = "Catalog administration"),
        (name = "orders", description = "Order lookup"),
    )
)]
pub struct ApiDoc;

/// Register every route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/item/{id}", web::get().to(items::get_item))
    .route("/buy/{id}", web::get().to(items::buy_item))
    .route("/buy/{id}/session", web::get().to(items::buy_item_session))
    .route("/complete", web::get().to(pages::complete))
    .route("/success", web::get().to(pages::success))
    .route("/cancel", web::get().to(pages::cancel))
    .route("/webhooks/stripe", web::post().to(webhooks::stripe_webhook))
    .route("/items", web::post().to(admin::create_item))
    .route("/discounts", web::post().to(admin::create_discount))
    .route("/taxes", web::post().to(admin::create_tax))
    .route("/orders/{id}", web::get().to(admin::get_order))
    .route("/orders/{id}/items", web::post().to(admin::add_order_items))
    .route("/orders/{id}/items", web::delete().to(admin::remove_order_items));
}
