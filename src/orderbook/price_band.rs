//! Advisory pre-submission price check around the last traded price.
//!
//! The engine is the authority on price rules. This only catches obvious
//! mistakes early, so whenever the reference price is unknown it fails open.

use std::fmt;

use rust_decimal::Decimal;

use crate::models::Trade;

/// 0.10, i.e. +/-10% around the reference price.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBand {
    pub reference: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

pub fn compute_band(reference: Decimal, tolerance: Decimal) -> PriceBand {
    PriceBand {
        reference,
        min: reference.saturating_mul(Decimal::ONE - tolerance),
        max: reference.saturating_mul(Decimal::ONE + tolerance),
    }
}

/// Inclusive on both ends.
pub fn is_within_band(price: Decimal, band: &PriceBand) -> bool {
    price >= band.min && price <= band.max
}

/// What a submission has to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceConstraint {
    /// No reference price yet: any positive price goes through.
    Unconstrained,
    Band { band: PriceBand, tolerance: Decimal },
}

impl PriceConstraint {
    pub fn from_reference(reference: Option<Decimal>, tolerance: Decimal) -> Self {
        match reference {
            Some(r) if r > Decimal::ZERO => PriceConstraint::Band {
                band: compute_band(r, tolerance),
                tolerance,
            },
            _ => PriceConstraint::Unconstrained,
        }
    }

    pub fn admits(&self, price: Decimal) -> bool {
        match self {
            PriceConstraint::Unconstrained => price > Decimal::ZERO,
            PriceConstraint::Band { band, .. } => is_within_band(price, band),
        }
    }

    pub fn band(&self) -> Option<&PriceBand> {
        match self {
            PriceConstraint::Unconstrained => None,
            PriceConstraint::Band { band, .. } => Some(band),
        }
    }
}

impl fmt::Display for PriceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceConstraint::Unconstrained => {
                write!(f, "No trades yet; any positive price is accepted.")
            }
            PriceConstraint::Band { band, tolerance } => write!(
                f,
                "Price must be within ±{}% of the last traded price ({:.2}). Allowed range: {:.2} - {:.2}",
                (*tolerance * Decimal::ONE_HUNDRED).normalize(),
                band.reference,
                band.min,
                band.max
            ),
        }
    }
}

/// Price of the most recent trade with a usable price.
///
/// Recency is decided by `executed_at`; trades without a timestamp, and ties,
/// fall back to feed position with earlier entries treated as newer.
pub fn last_traded_price(trades: &[Trade]) -> Option<Decimal> {
    trades
        .iter()
        .enumerate()
        .filter_map(|(idx, t)| {
            let price = t.price_per_unit.filter(|p| *p > Decimal::ZERO)?;
            Some((idx, t.executed_at, price))
        })
        .max_by(|(ia, ta, _), (ib, tb, _)| ta.cmp(tb).then(ib.cmp(ia)))
        .map(|(_, _, price)| price)
}
