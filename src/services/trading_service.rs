use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    models::{Actor, CurrentActor, NewOrder, Order, Side, Wallet},
    orderbook::{
        can_cancel, can_submit, can_trade_against, cancel_hint, last_traded_price, NormalizedOrder, PriceConstraint,
    },
    AppState,
};

use super::market_service;

pub type FieldErrors = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct PlaceResult {
    pub order: Order,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct CancelResult {
    pub order_id: String,
    pub side: Side,
    /// Funds (BUY) or credits (SELL) the engine hands back.
    pub released: Decimal,
    /// `None` when the refresh failed; panels still get a `walletUpdated` event.
    pub wallet: Option<Wallet>,
}

fn form_error(msg: impl Into<String>) -> FieldErrors {
    let mut errs: FieldErrors = HashMap::new();
    errs.insert("_form".into(), msg.into());
    errs
}

/// Band around the last traded price, or no constraint at all when that price
/// is unknown for any reason.
pub async fn current_constraint(state: &AppState, who: &CurrentActor) -> PriceConstraint {
    let tolerance = state.settings.price_band_tolerance;

    match state.engine.recent_trades(&who.token).await {
        Ok(trades) => PriceConstraint::from_reference(last_traded_price(&trades), tolerance),
        Err(e) => {
            tracing::warn!("last traded price unavailable, skipping price band: {}", e);
            PriceConstraint::Unconstrained
        }
    }
}

/// Field-level checks that need no engine round-trip.
pub fn validate_order_input(
    actor: &Actor,
    quantity: Option<Decimal>,
    price: Option<Decimal>,
) -> Result<(Decimal, Decimal), FieldErrors> {
    if !can_submit(actor) {
        return Err(form_error("Admins cannot place orders."));
    }

    let mut errs: FieldErrors = HashMap::new();

    let qty = quantity.filter(|q| *q > Decimal::ZERO);
    if qty.is_none() {
        errs.insert("quantity".into(), "Enter a valid quantity.".into());
    }

    let px = price.filter(|p| *p > Decimal::ZERO);
    if px.is_none() {
        errs.insert("price".into(), "Enter a valid price.".into());
    }

    match (qty, px) {
        (Some(q), Some(p)) if errs.is_empty() => Ok((q, p)),
        _ => Err(errs),
    }
}

pub fn check_price(price: Decimal, constraint: &PriceConstraint) -> Result<(), FieldErrors> {
    if constraint.admits(price) {
        return Ok(());
    }

    let mut errs: FieldErrors = HashMap::new();
    errs.insert("price".into(), constraint.to_string());
    Err(errs)
}

pub async fn place_order(
    state: &AppState,
    who: &CurrentActor,
    side: Side,
    quantity: Option<Decimal>,
    price: Option<Decimal>,
) -> Result<PlaceResult, FieldErrors> {
    let (quantity, price) = validate_order_input(&who.actor, quantity, price)?;

    let constraint = current_constraint(state, who).await;
    check_price(price, &constraint)?;

    let new_order = NewOrder {
        side,
        quantity,
        price_per_unit: price,
    };

    let order = state
        .engine
        .submit_order(&who.token, &new_order)
        .await
        .map_err(|e| form_error(e.to_string()))?;

    tracing::info!(
        order_id = %order.id,
        user_id = %who.actor.user_id,
        "placed {} {} @ {}",
        side.as_str(),
        quantity,
        price
    );

    // the engine locks funds/credits for the new order
    state.publish("ordersUpdated");
    state.publish("walletUpdated");

    Ok(PlaceResult {
        order,
        side,
        quantity,
        price,
    })
}

/// Places the opposing order at the resting order's quantity and price.
pub async fn trade_against(state: &AppState, who: &CurrentActor, order_id: &str) -> Result<PlaceResult, FieldErrors> {
    let book = market_service::load_book(state, who)
        .await
        .map_err(|e| form_error(e.to_string()))?;

    let Some(target) = book.into_iter().find(|o| o.order.id == order_id) else {
        return Err(form_error("Order is no longer in the book."));
    };

    if !can_trade_against(&target, &who.actor) {
        let msg = if who.actor.is_admin() {
            "Admins cannot trade."
        } else {
            "Order is no longer open."
        };
        return Err(form_error(msg));
    }

    place_order(
        state,
        who,
        target.order.side.opposite(),
        target.order.quantity,
        target.order.price_per_unit,
    )
    .await
}

fn released_amount(order: &NormalizedOrder) -> Decimal {
    match order.order.side {
        Side::Buy => order.total,
        Side::Sell => order.order.quantity.unwrap_or_default(),
    }
}

/// Cancels one of the caller's own open orders, then refreshes the wallet so
/// the released funds or credits show up immediately.
pub async fn cancel_order(state: &AppState, who: &CurrentActor, order_id: &str) -> Result<CancelResult, FieldErrors> {
    let mine = state
        .engine
        .my_orders(&who.token)
        .await
        .map_err(|e| form_error(format!("Could not load your orders: {e}")))?;

    let Some(order) = mine.into_iter().find(|o| o.id == order_id) else {
        return Err(form_error("Order not found."));
    };
    let order = NormalizedOrder::from_order(order);

    if !can_cancel(&order, &who.actor) {
        return Err(form_error(cancel_hint(&order, &who.actor)));
    }

    state
        .engine
        .cancel_order(&who.token, order_id)
        .await
        .map_err(|e| form_error(e.to_string()))?;

    tracing::info!(order_id = %order_id, user_id = %who.actor.user_id, "order cancelled");

    let wallet = match state.engine.wallet(&who.token).await {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(order_id = %order_id, "wallet refresh after cancel failed: {}", e);
            None
        }
    };

    state.publish("ordersUpdated");
    state.publish("walletUpdated");

    Ok(CancelResult {
        order_id: order_id.to_string(),
        side: order.order.side,
        released: released_amount(&order),
        wallet,
    })
}
