//! Flattening of typed provider payloads into Stripe's bracketed
//! `application/x-www-form-urlencoded` keys, e.g. `metadata[order_id]=42`.

use crate::domain::catalog::NewAdjustment;
use crate::domain::payment::{CheckoutSessionParams, PaymentIntentParams, ORDER_ID_METADATA_KEY};

pub type Form = Vec<(String, String)>;

fn pair(key: impl Into<String>, value: impl ToString) -> (String, String) {
    (key.into(), value.to_string())
}

pub fn coupon_form(adjustment: &NewAdjustment) -> Form {
    vec![
        pair("percent_off", adjustment.percentage),
        pair("duration", "forever"),
        pair("name", &adjustment.name),
    ]
}

pub fn tax_rate_form(adjustment: &NewAdjustment) -> Form {
    vec![
        pair("display_name", &adjustment.name),
        pair("percentage", adjustment.percentage),
        pair("inclusive", false),
    ]
}

pub fn payment_intent_form(params: &PaymentIntentParams) -> Form {
    vec![
        pair("amount", params.amount),
        pair("currency", params.currency),
        pair(format!("metadata[{ORDER_ID_METADATA_KEY}]"), params.order_id),
    ]
}

pub fn checkout_session_form(params: &CheckoutSessionParams) -> Form {
    let mut form = vec![
        pair("mode", "payment"),
        pair("success_url", &params.success_url),
        pair("cancel_url", &params.cancel_url),
        pair(format!("metadata[{ORDER_ID_METADATA_KEY}]"), params.order_id),
    ];

    for (i, line) in params.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        let price = &line.price_data;
        form.push(pair(format!("{prefix}[quantity]"), line.quantity));
        form.push(pair(format!("{prefix}[price_data][currency]"), price.currency));
        form.push(pair(format!("{prefix}[price_data][unit_amount]"), price.unit_amount));
        form.push(pair(
            format!("{prefix}[price_data][product_data][name]"),
            &price.product_data.name,
        ));
        // Stripe rejects an empty description.
        if !price.product_data.description.is_empty() {
            form.push(pair(
                format!("{prefix}[price_data][product_data][description]"),
                &price.product_data.description,
            ));
        }
        for (j, rate) in line.tax_rates.iter().enumerate() {
            form.push(pair(format!("{prefix}[tax_rates][{j}]"), rate));
        }
    }

    for (i, coupon) in params.discounts.iter().enumerate() {
        form.push(pair(format!("discounts[{i}][coupon]"), coupon));
    }
    form
}
