use axum::{
    extract::{Extension, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    models::CurrentActor,
    orderbook::{can_submit, DepthChart, LiquidityStats, ViewSpec},
    render,
    services::{market_service, market_service::fmt2, trading_service},
    AppState,
};

use super::{engine_error, hx_trigger_value, is_htmx, template_error, trading_controller, unauthorized_snippet};

const FILTERS: [(&str, &str); 4] = [
    ("all", "All orders"),
    ("buy", "Buy only"),
    ("sell", "Sell only"),
    ("my_orders", "My orders"),
];

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub view: Option<String>,
}

/// Unknown or missing view ids show everything.
fn resolve_view(q: &ViewQuery, who: &CurrentActor) -> ViewSpec {
    q.view
        .as_deref()
        .and_then(|v| ViewSpec::from_view_id(v, &who.actor.user_id))
        .unwrap_or(ViewSpec::All)
}

fn dash_or(v: Option<rust_decimal::Decimal>) -> String {
    v.map(fmt2).unwrap_or_else(|| "-".to_string())
}

fn stats_json(stats: &LiquidityStats) -> Value {
    json!({
        "best_bid": dash_or(stats.best_bid),
        "best_ask": dash_or(stats.best_ask),
        "spread": dash_or(stats.spread()),
        "open_orders": stats.open_orders,
        "blended_price": dash_or(stats.blended_price),
    })
}

/// Chart payload: curves plus the volume-weighted price for the axis label.
pub fn depth_json(depth: &DepthChart, stats: &LiquidityStats) -> Value {
    json!({
        "bids": depth.bids,
        "asks": depth.asks,
        "hasLiquidity": depth.has_liquidity(),
        "weightedAvgPrice": stats.blended_price.and_then(|p| p.to_f64()),
    })
}

// GET /marketplace?view=
pub async fn get_marketplace(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<ViewQuery>,
    who: Option<Extension<CurrentActor>>,
) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    let view = resolve_view(&q, &who);
    let mv = match market_service::load_marketplace(&state, &who, view).await {
        Ok(v) => v,
        Err(e) => return engine_error(&e),
    };

    let active = mv.view.view_id();
    let filters: Vec<Value> = FILTERS
        .iter()
        .map(|(id, label)| json!({ "id": id, "label": label, "active": *id == active }))
        .collect();

    let ctx = json!({
        "filters": filters,
        "view": active,
        "rows": mv.rows,
        "stats": stats_json(&mv.stats),
        "depth": {
            "has_liquidity": mv.depth.has_liquidity(),
            "json": depth_json(&mv.depth, &mv.stats).to_string(),
        },
        "can_submit": can_submit(&who.actor),
    });

    let body = match state.hbs.render("pages/marketplace", &ctx) {
        Ok(b) => b,
        Err(e) => return template_error(e),
    };

    if is_htmx(&headers) {
        return (StatusCode::OK, Html(body)).into_response();
    }

    match render::render_full(&state, "Marketplace", body, Some(&who)) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => template_error(e),
    }
}

// GET /marketplace/orders?view= (HTMX partial)
pub async fn get_order_table(
    State(state): State<AppState>,
    Query(q): Query<ViewQuery>,
    who: Option<Extension<CurrentActor>>,
) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    let view = resolve_view(&q, &who);
    let mv = match market_service::load_marketplace(&state, &who, view).await {
        Ok(v) => v,
        Err(e) => return engine_error(&e),
    };

    match state.hbs.render("partials/order_table", &json!({ "rows": mv.rows })) {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => template_error(e),
    }
}

// GET /marketplace/depth (JSON for the chart)
pub async fn get_depth(State(state): State<AppState>, who: Option<Extension<CurrentActor>>) -> Response {
    let Some(Extension(who)) = who else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response();
    };

    match market_service::load_depth(&state, &who).await {
        Ok((depth, stats)) => (StatusCode::OK, Json(depth_json(&depth, &stats))).into_response(),
        Err(e) => {
            tracing::error!("depth snapshot failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

// GET /marketplace/stats (HTMX partial)
pub async fn get_stats_panel(State(state): State<AppState>, who: Option<Extension<CurrentActor>>) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    let stats = match market_service::load_depth(&state, &who).await {
        Ok((_, stats)) => stats,
        Err(e) => return engine_error(&e),
    };

    match state.hbs.render("partials/liquidity_stats", &json!({ "stats": stats_json(&stats) })) {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => template_error(e),
    }
}

// GET /marketplace/price-history (JSON for the price chart)
pub async fn get_price_history(State(state): State<AppState>, who: Option<Extension<CurrentActor>>) -> Response {
    let Some(Extension(who)) = who else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response();
    };

    match market_service::load_price_history(&state, &who).await {
        Ok(points) => (StatusCode::OK, Json(points)).into_response(),
        Err(e) => {
            tracing::error!("price history failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

// POST /marketplace/orders/:id/trade
pub async fn post_trade_against(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    who: Option<Extension<CurrentActor>>,
) -> Response {
    let Some(Extension(who)) = who else {
        return unauthorized_snippet();
    };

    match trading_service::trade_against(&state, &who, &order_id).await {
        Ok(result) => {
            let mut headers = HeaderMap::new();
            headers.insert("HX-Trigger", hx_trigger_value(&["ordersUpdated", "walletUpdated"]));
            (StatusCode::OK, headers, Html(trading_controller::placed_snippet(&result))).into_response()
        }
        Err(errs) => trading_controller::errors_snippet(&errs),
    }
}
