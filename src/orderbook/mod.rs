//! Order-book visualization and trading guard rails.
//!
//! Everything in here is a pure function over an immutable snapshot of
//! engine data: no I/O, no shared state, safe to call from any thread. The
//! web layer fetches a snapshot, runs it through these functions, and renders
//! the result.

pub mod normalizer;
pub mod filter;
pub mod depth;
pub mod price_band;
pub mod authorizer;
pub mod stats;
pub mod history;

pub use normalizer::{normalize, NormalizedOrder};
pub use filter::{filter, ViewSpec};
pub use depth::{aggregate_depth, DepthChart, DepthPoint};
pub use price_band::{compute_band, is_within_band, last_traded_price, PriceBand, PriceConstraint};
pub use authorizer::{can_cancel, can_submit, can_trade_against, cancel_hint};
pub use stats::{liquidity_stats, LiquidityStats};
pub use history::{price_history, PricePoint};
