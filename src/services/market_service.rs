use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    models::{Actor, CurrentActor, OrderStatus, Side},
    orderbook::{
        self, can_cancel, can_trade_against, cancel_hint, DepthChart, LiquidityStats, NormalizedOrder, PricePoint,
        ViewSpec,
    },
    AppState,
};

use super::engine::EngineError;

#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub id: String,
    pub side: &'static str,
    pub status: &'static str,
    pub status_class: &'static str,
    pub quantity: String,
    pub price: String,
    pub total: String,
    pub created_at: String,
    pub own: bool,
    pub can_cancel: bool,
    pub cancel_hint: &'static str,
    pub can_trade: bool,
    pub trade_label: &'static str,
}

#[derive(Debug, Clone)]
pub struct MarketplaceView {
    pub view: ViewSpec,
    pub rows: Vec<OrderRow>,
    pub stats: LiquidityStats,
    pub depth: DepthChart,
}

pub fn fmt2(v: Decimal) -> String {
    format!("{:.2}", v)
}

fn fmt_opt(v: Option<Decimal>) -> String {
    v.map(fmt2).unwrap_or_else(|| "-".to_string())
}

fn status_class(o: &NormalizedOrder) -> &'static str {
    match o.order.status {
        OrderStatus::Executed => "text-success",
        OrderStatus::Cancelled => "text-danger",
        OrderStatus::Pending | OrderStatus::Partial => "text-warning",
    }
}

/// Display rows with the action affordances already decided for `actor`.
pub fn build_rows(orders: &[NormalizedOrder], actor: &Actor) -> Vec<OrderRow> {
    orders
        .iter()
        .map(|o| OrderRow {
            id: o.order.id.clone(),
            side: o.order.side.as_str(),
            status: o.order.status.as_str(),
            status_class: status_class(o),
            quantity: o
                .order
                .quantity
                .map(|q| q.normalize().to_string())
                .unwrap_or_else(|| "-".to_string()),
            price: fmt_opt(o.order.price_per_unit),
            total: fmt2(o.total),
            created_at: o
                .order
                .created_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            own: o.order.owner_id == actor.user_id,
            can_cancel: can_cancel(o, actor),
            cancel_hint: cancel_hint(o, actor),
            can_trade: can_trade_against(o, actor),
            trade_label: match o.order.side.opposite() {
                Side::Buy => "Buy",
                Side::Sell => "Sell",
            },
        })
        .collect()
}

/// Runs a raw book snapshot (plus, for ownership views, the caller's orders)
/// through the core.
pub fn marketplace_view(
    book: &[NormalizedOrder],
    mine: Option<&[NormalizedOrder]>,
    view: ViewSpec,
    actor: &Actor,
) -> MarketplaceView {
    let source = match (&view, mine) {
        (ViewSpec::OwnedBy(_), Some(mine)) => mine,
        _ => book,
    };

    let visible = orderbook::filter(source, &view);

    MarketplaceView {
        rows: build_rows(&visible, actor),
        stats: orderbook::liquidity_stats(book),
        depth: DepthChart::from_book(book),
        view,
    }
}

pub async fn load_book(state: &AppState, who: &CurrentActor) -> Result<Vec<NormalizedOrder>, EngineError> {
    let raw = state.engine.open_orders(&who.token).await?;
    Ok(orderbook::normalize(&raw))
}

pub async fn load_marketplace(
    state: &AppState,
    who: &CurrentActor,
    view: ViewSpec,
) -> Result<MarketplaceView, EngineError> {
    let book = load_book(state, who).await?;

    let mine = match view {
        ViewSpec::OwnedBy(_) => {
            let raw = state.engine.my_orders(&who.token).await?;
            Some(orderbook::normalize(&raw))
        }
        _ => None,
    };

    Ok(marketplace_view(&book, mine.as_deref(), view, &who.actor))
}

pub async fn load_depth(state: &AppState, who: &CurrentActor) -> Result<(DepthChart, LiquidityStats), EngineError> {
    let book = load_book(state, who).await?;
    Ok((DepthChart::from_book(&book), orderbook::liquidity_stats(&book)))
}

pub async fn load_price_history(state: &AppState, who: &CurrentActor) -> Result<Vec<PricePoint>, EngineError> {
    let trades = state.engine.price_history(&who.token).await?;
    Ok(orderbook::price_history(&trades))
}
