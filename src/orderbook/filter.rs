use crate::models::Side;

use super::NormalizedOrder;

/// Named views over a normalized snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSpec {
    All,
    /// Open book for one side: matching side and status PENDING/PARTIAL.
    BySide(Side),
    /// Everything the user placed, any status.
    OwnedBy(String),
}

impl ViewSpec {
    /// Maps the UI filter ids (`all`, `buy`, `sell`, `my_orders`).
    pub fn from_view_id(id: &str, user_id: &str) -> Option<ViewSpec> {
        match id.trim().to_ascii_lowercase().as_str() {
            "all" => Some(ViewSpec::All),
            "buy" => Some(ViewSpec::BySide(Side::Buy)),
            "sell" => Some(ViewSpec::BySide(Side::Sell)),
            "my_orders" | "mine" => Some(ViewSpec::OwnedBy(user_id.to_string())),
            _ => None,
        }
    }

    pub fn view_id(&self) -> &'static str {
        match self {
            ViewSpec::All => "all",
            ViewSpec::BySide(Side::Buy) => "buy",
            ViewSpec::BySide(Side::Sell) => "sell",
            ViewSpec::OwnedBy(_) => "my_orders",
        }
    }

    pub fn matches(&self, o: &NormalizedOrder) -> bool {
        match self {
            ViewSpec::All => true,
            ViewSpec::BySide(side) => o.order.side == *side && o.order.status.is_open(),
            ViewSpec::OwnedBy(user_id) => o.order.owner_id == *user_id,
        }
    }
}

/// Keeps the orders that belong to `view`, preserving input order.
pub fn filter(orders: &[NormalizedOrder], view: &ViewSpec) -> Vec<NormalizedOrder> {
    orders.iter().filter(|o| view.matches(o)).cloned().collect()
}
