//! Market-depth curves: volume available at-or-better-than each price.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Side;

use super::{filter, NormalizedOrder, ViewSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthPoint {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cumulative_volume: Decimal,
}

/// Sums quantity per exact price for one side. Orders of the other side and
/// records without a positive quantity and price contribute nothing.
fn price_levels(orders: &[NormalizedOrder], side: Side) -> BTreeMap<Decimal, Decimal> {
    let mut levels: BTreeMap<Decimal, Decimal> = BTreeMap::new();

    for o in orders.iter().filter(|o| o.order.side == side) {
        let (Some(qty), Some(price)) = (o.order.quantity, o.order.price_per_unit) else {
            continue;
        };
        if qty <= Decimal::ZERO || price <= Decimal::ZERO {
            continue;
        }

        let level = levels.entry(price).or_insert(Decimal::ZERO);
        *level = level.saturating_add(qty);
    }

    levels
}

/// Cumulative depth for one side, always returned ascending by price.
///
/// Bids accumulate from the highest price down (volume at P = all bids >= P),
/// asks from the lowest price up (volume at P = all asks <= P).
pub fn aggregate_depth(orders: &[NormalizedOrder], side: Side) -> Vec<DepthPoint> {
    let levels = price_levels(orders, side);

    // walk outward from the best price on this side
    let mut walk: Vec<(Decimal, Decimal)> = levels.into_iter().collect();
    if side == Side::Buy {
        walk.reverse();
    }

    let mut acc = Decimal::ZERO;
    let mut points: Vec<DepthPoint> = walk
        .into_iter()
        .map(|(price, qty)| {
            acc = acc.saturating_add(qty);
            DepthPoint {
                price,
                cumulative_volume: acc,
            }
        })
        .collect();

    // accumulation order and presentation order differ for bids
    points.sort_by(|a, b| a.price.cmp(&b.price));
    points
}

/// Bid and ask curves built from the open book of one snapshot. Never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepthChart {
    pub bids: Vec<DepthPoint>,
    pub asks: Vec<DepthPoint>,
}

impl DepthChart {
    pub fn from_book(orders: &[NormalizedOrder]) -> Self {
        let bids = filter(orders, &ViewSpec::BySide(Side::Buy));
        let asks = filter(orders, &ViewSpec::BySide(Side::Sell));

        DepthChart {
            bids: aggregate_depth(&bids, Side::Buy),
            asks: aggregate_depth(&asks, Side::Sell),
        }
    }

    /// False means render the "no liquidity" state, not an empty chart.
    pub fn has_liquidity(&self) -> bool {
        !self.bids.is_empty() || !self.asks.is_empty()
    }
}
