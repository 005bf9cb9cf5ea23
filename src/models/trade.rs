use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::lenient;

/// Historical execution record; only read to find the last traded price.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub quantity: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_per_unit: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub executed_at: Option<NaiveDateTime>,
}
