use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Case-insensitive; used for form input.
    pub fn parse(raw: &str) -> Option<Side> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(Side::Buy),
            "SELL" => Some(Side::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Partial,
    Executed,
    Cancelled,
}

impl OrderStatus {
    /// Resting and still tradeable.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Partial)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Partial => "PARTIAL",
            OrderStatus::Executed => "EXECUTED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// A resting buy or sell intent as reported by the trading engine.
///
/// `quantity` and `price_per_unit` are `None` when the engine sent something
/// that is not a number; downstream code treats those records as degraded
/// rather than rejecting the snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,

    #[serde(alias = "type")]
    pub side: Side,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub quantity: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_per_unit: Option<Decimal>,

    pub status: OrderStatus,

    #[serde(alias = "userId")]
    pub owner_id: String,

    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// Body of the engine's submit command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(rename = "type")]
    pub side: Side,

    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_unit: Decimal,
}
