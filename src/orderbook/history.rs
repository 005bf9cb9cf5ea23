//! Trade-price series for the price chart.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Trade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub executed_at: NaiveDateTime,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_unit: Decimal,
}

/// Oldest first. Trades without a timestamp or a positive price cannot be
/// placed on the chart and are dropped; equal timestamps keep feed order.
pub fn price_history(trades: &[Trade]) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = trades
        .iter()
        .filter_map(|t| {
            Some(PricePoint {
                executed_at: t.executed_at?,
                price_per_unit: t.price_per_unit.filter(|p| *p > Decimal::ZERO)?,
            })
        })
        .collect();

    points.sort_by_key(|p| p.executed_at);
    points
}
