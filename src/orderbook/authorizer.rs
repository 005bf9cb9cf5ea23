//! Which order actions the current actor may take.
//!
//! These gate UI affordances only; the engine still enforces its own rules.
//! Administrators may not cancel (not even their own orders), trade against
//! resting orders, or place new ones.

use crate::models::Actor;

use super::NormalizedOrder;

pub fn can_cancel(order: &NormalizedOrder, actor: &Actor) -> bool {
    order.order.owner_id == actor.user_id && order.order.status.is_open() && !actor.is_admin()
}

/// Ownership does not matter here; self-matching is the engine's concern.
pub fn can_trade_against(order: &NormalizedOrder, actor: &Actor) -> bool {
    !actor.is_admin() && order.order.status.is_open()
}

pub fn can_submit(actor: &Actor) -> bool {
    !actor.is_admin()
}

/// Tooltip text for the cancel control, consistent with [`can_cancel`].
pub fn cancel_hint(order: &NormalizedOrder, actor: &Actor) -> &'static str {
    if actor.is_admin() {
        "Admins cannot cancel orders"
    } else if order.order.owner_id != actor.user_id {
        "You can only cancel your own orders"
    } else if !order.order.status.is_open() {
        "Order is no longer open"
    } else {
        "Cancel this order"
    }
}
