use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

const COMPLETE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Payment status</title></head>
<body>
<h1>Thank you!</h1>
<p>Your payment is being processed. You will receive a confirmation shortly.</p>
</body>
</html>
"#;

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Payment successful</title></head>
<body>
<h1>Payment successful</h1>
<p>Your order has been placed.</p>
</body>
</html>
"#;

const CANCEL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Payment cancelled</title></head>
<body>
<h1>Payment cancelled</h1>
<p>You have not been charged.</p>
</body>
</html>
"#;

fn html(body: &'static str) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

/// Return page for the embedded payment form.
#[utoipa::path(
    get,
    path = "/complete",
    responses((status = 200, description = "HTML page")),
    tag = "pages"
)]
pub async fn complete() -> HttpResponse {
    html(COMPLETE_PAGE)
}

#[utoipa::path(
    get,
    path = "/success",
    responses((status = 200, description = "HTML page")),
    tag = "pages"
)]
pub async fn success() -> HttpResponse {
    html(SUCCESS_PAGE)
}

#[utoipa::path(
    get,
    path = "/cancel",
    responses((status = 200, description = "HTML page")),
    tag = "pages"
)]
pub async fn cancel() -> HttpResponse {
    html(CANCEL_PAGE)
}
