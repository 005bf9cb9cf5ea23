use rust_decimal::Decimal;
use serde::Deserialize;

use super::lenient;

/// Caller's wallet as reported by the engine.
///
/// `balance` and `carbon_credit_balance` are what is free to use; the engine
/// moves reserved amounts into the `*_locked` fields while orders rest and
/// moves them back on cancel.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub balance: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub carbon_credit_balance: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub money_locked: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub credit_locked: Option<Decimal>,
}

impl Wallet {
    pub fn total_funds(&self) -> Decimal {
        self.balance
            .unwrap_or_default()
            .saturating_add(self.money_locked.unwrap_or_default())
    }

    pub fn total_credits(&self) -> Decimal {
        self.carbon_credit_balance
            .unwrap_or_default()
            .saturating_add(self.credit_locked.unwrap_or_default())
    }
}
