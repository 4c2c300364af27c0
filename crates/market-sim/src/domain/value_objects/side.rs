use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a market order, from the portfolio owner's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Signed cash movement for a fill worth `notional`: buying pays
    /// cash out, selling brings it in.
    pub fn cash_flow(&self, notional: Decimal) -> Decimal {
        match self {
            Side::Buy => -notional,
            Side::Sell => notional,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire values are accepted in any case, surrounding whitespace ignored
impl TryFrom<&str> for Side {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("BUY") {
            Ok(Side::Buy)
        } else if value.eq_ignore_ascii_case("SELL") {
            Ok(Side::Sell)
        } else {
            Err("side must be BUY or SELL")
        }
    }
}
