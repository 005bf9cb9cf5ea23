use rust_decimal::Decimal;

use crate::models::Side;

use super::NormalizedOrder;

/// Headline numbers shown above the book.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiquidityStats {
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub open_orders: usize,
    /// Volume-weighted average price over open orders.
    pub blended_price: Option<Decimal>,
}

impl LiquidityStats {
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask? - self.best_bid?)
    }
}

pub fn liquidity_stats(orders: &[NormalizedOrder]) -> LiquidityStats {
    let mut stats = LiquidityStats::default();
    let mut notional = Decimal::ZERO;
    let mut volume = Decimal::ZERO;

    for o in orders.iter().filter(|o| o.order.status.is_open()) {
        stats.open_orders += 1;

        let (Some(qty), Some(price)) = (o.order.quantity, o.order.price_per_unit) else {
            continue;
        };
        if qty <= Decimal::ZERO || price <= Decimal::ZERO {
            continue;
        }

        match o.order.side {
            Side::Buy => stats.best_bid = Some(stats.best_bid.map_or(price, |b| b.max(price))),
            Side::Sell => stats.best_ask = Some(stats.best_ask.map_or(price, |a| a.min(price))),
        }

        notional = notional.saturating_add(o.total);
        volume = volume.saturating_add(qty);
    }

    if volume > Decimal::ZERO {
        stats.blended_price = notional.checked_div(volume);
    }

    stats
}
