//! Conversions between the simulator's floating point quotes and the
//! fixed-precision amounts used for cash and fills.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Decimal places kept on every execution price
pub const PRICE_DECIMALS: u32 = 8;

/// Convert a live quote into an execution price.
///
/// Returns `None` for NaN, infinities and non-positive quotes.
pub fn quote_to_price(quote: f64) -> Option<Decimal> {
    if !quote.is_finite() || quote <= 0.0 {
        return None;
    }
    Decimal::from_f64(quote).map(|p| p.round_dp(PRICE_DECIMALS))
}
