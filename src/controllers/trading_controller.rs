use std::str::FromStr;

use axum::{
    extract::{Extension, Form, Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::{CurrentActor, Side},
    orderbook::PriceConstraint,
    services::{
        market_service::fmt2,
        trading_service::{self, CancelResult, FieldErrors, PlaceResult},
        wallet_service::WalletView,
    },
    AppState,
};

use super::{esc, hx_trigger_value, template_error, unauthorized_snippet};

fn danger(msg: &str) -> Response {
    (
        StatusCode::OK,
        Html(format!(r#"<div class="text-danger">{}</div>"#, esc(msg))),
    )
        .into_response()
}

/// Form-level message first, then field messages.
pub(crate) fn errors_snippet(errs: &FieldErrors) -> Response {
    let msgs: Vec<&str> = ["_form", "side", "quantity", "price"]
        .iter()
        .filter_map(|k| errs.get(*k).map(String::as_str))
        .collect();

    if msgs.is_empty() {
        return danger("Could not place order.");
    }
    danger(&msgs.join(" "))
}

pub(crate) fn placed_snippet(r: &PlaceResult) -> String {
    let side = match r.side {
        Side::Buy => "Buy",
        Side::Sell => "Sell",
    };
    format!(
        r#"<div class="text-success">{} order placed: {} credits @ {} (Total: {})</div>"#,
        side,
        r.quantity.normalize(),
        fmt2(r.price),
        fmt2(r.price.saturating_mul(r.quantity))
    )
}

fn cancelled_snippet(r: &CancelResult) -> String {
    let released = match r.side {
        Side::Buy => format!("Released {} in funds.", fmt2(r.released)),
        Side::Sell => format!("Released {} credits.", r.released.normalize()),
    };

    let balances = match &r.wallet {
        Some(w) => {
            let v = WalletView::from(w);
            format!(" New balance: {} · Credits: {}", v.balance, v.credits)
        }
        None => String::new(),
    };

    format!(
        r#"<div class="text-success">Order cancelled. {}{}</div>"#,
        released, balances
    )
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

#[derive(Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub price: String,
}

// POST /trade/orders
pub async fn post_place_order(
    State(state): State<AppState>,
    who: Option<Extension<CurrentActor>>,
    Form(form): Form<OrderForm>,
) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    let Some(side) = Side::parse(&form.side) else {
        return danger("Choose buy or sell.");
    };

    let quantity = parse_decimal(&form.quantity);
    let price = parse_decimal(&form.price);

    let result = match trading_service::place_order(&state, &who, side, quantity, price).await {
        Ok(r) => r,
        Err(errs) => return errors_snippet(&errs),
    };

    let mut headers = HeaderMap::new();
    headers.insert("HX-Trigger", hx_trigger_value(&["ordersUpdated", "walletUpdated"]));

    (StatusCode::OK, headers, Html(placed_snippet(&result))).into_response()
}

// POST /trade/orders/:id/cancel
pub async fn post_cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    who: Option<Extension<CurrentActor>>,
) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    let result = match trading_service::cancel_order(&state, &who, &order_id).await {
        Ok(r) => r,
        Err(errs) => return errors_snippet(&errs),
    };

    let mut headers = HeaderMap::new();
    headers.insert("HX-Trigger", hx_trigger_value(&["ordersUpdated", "walletUpdated"]));

    (StatusCode::OK, headers, Html(cancelled_snippet(&result))).into_response()
}

// GET /trade/band (HTMX partial)
pub async fn get_price_band(State(state): State<AppState>, who: Option<Extension<CurrentActor>>) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    let ctx = match trading_service::current_constraint(&state, &who).await {
        PriceConstraint::Band { band, .. } => json!({
            "constrained": true,
            "reference": fmt2(band.reference),
            "min": fmt2(band.min),
            "max": fmt2(band.max),
        }),
        PriceConstraint::Unconstrained => json!({ "constrained": false }),
    };

    match state.hbs.render("partials/price_band", &ctx) {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => template_error(e),
    }
}
