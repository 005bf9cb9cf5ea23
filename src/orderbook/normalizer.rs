use rust_decimal::Decimal;

use crate::models::Order;

/// An order plus its derived notional value.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOrder {
    pub order: Order,
    pub total: Decimal,
}

impl NormalizedOrder {
    pub fn from_order(order: Order) -> Self {
        let total = match (order.quantity, order.price_per_unit) {
            (Some(q), Some(p)) => q.checked_mul(p),
            _ => None,
        };

        let total = total.unwrap_or_else(|| {
            tracing::warn!(order_id = %order.id, "order has unusable quantity/price; total shown as 0");
            Decimal::ZERO
        });

        NormalizedOrder { order, total }
    }
}

/// `total = quantity * price_per_unit` for each order, same length and order
/// as the input. Records with missing numbers are kept with a zero total.
pub fn normalize<'a, I>(orders: I) -> Vec<NormalizedOrder>
where
    I: IntoIterator<Item = &'a Order>,
{
    orders
        .into_iter()
        .cloned()
        .map(NormalizedOrder::from_order)
        .collect()
}
