//! Holding of one instrument inside a portfolio.

use crate::domain::value_objects::{Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The holding cannot grow by the requested amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position size overflow")]
pub struct PositionOverflow;

/// A long holding with a cost-weighted average entry price
///
/// A position with zero quantity is never stored; callers delete the
/// position instead of reducing it to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: Symbol,
    pub quantity: u64,
    pub avg_price: Decimal,
    pub opened_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Position {
    pub fn open(symbol: Symbol, quantity: u64, price: Decimal, now: Timestamp) -> Self {
        Position {
            symbol,
            quantity,
            avg_price: price,
            opened_at: now,
            updated_at: now,
        }
    }

    /// Add to the holding. `cost` is the total paid for the added quantity:
    /// `avg = (avg * qty + cost) / (qty + added)`.
    ///
    /// On overflow the position is left unchanged.
    pub fn increase(
        &mut self,
        quantity: u64,
        cost: Decimal,
        now: Timestamp,
    ) -> Result<(), PositionOverflow> {
        let new_quantity = self.quantity.checked_add(quantity).ok_or(PositionOverflow)?;
        let avg_price = self
            .avg_price
            .checked_mul(Decimal::from(self.quantity))
            .and_then(|held| held.checked_add(cost))
            .and_then(|total| total.checked_div(Decimal::from(new_quantity)))
            .ok_or(PositionOverflow)?;

        self.quantity = new_quantity;
        self.avg_price = avg_price;
        self.updated_at = now;
        Ok(())
    }

    /// Partial close. The average price is left untouched.
    ///
    /// Callers must check `quantity < self.quantity` first; a full close
    /// deletes the position instead.
    pub fn decrease(&mut self, quantity: u64, now: Timestamp) {
        debug_assert!(quantity < self.quantity);
        self.quantity -= quantity;
        self.updated_at = now;
    }

    /// Value of the holding at the given mark price
    pub fn market_value(&self, mark: Decimal) -> Decimal {
        mark * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_increase_uses_cost_weighted_average() {
        let now = Utc::now();
        let mut position = Position::open(Symbol::new("AAPL").unwrap(), 10, dec!(100), now);

        position.increase(10, dec!(2000), now).unwrap();

        assert_eq!(position.quantity, 20);
        assert_eq!(position.avg_price, dec!(150));
    }

    #[test]
    fn test_increase_past_u64_max_is_refused() {
        let now = Utc::now();
        let mut position = Position::open(Symbol::new("SBIN").unwrap(), u64::MAX - 1, dec!(1), now);
        let before = position.clone();

        assert_eq!(position.increase(2, dec!(2), now), Err(PositionOverflow));
        assert_eq!(position, before);

        position.increase(1, dec!(1), now).unwrap();
        assert_eq!(position.quantity, u64::MAX);
    }

    #[test]
    fn test_decrease_keeps_average_price() {
        let now = Utc::now();
        let mut position = Position::open(Symbol::new("TSLA").unwrap(), 10, dec!(200), now);

        position.decrease(4, now);

        assert_eq!(position.quantity, 6);
        assert_eq!(position.avg_price, dec!(200));
        assert_eq!(position.market_value(dec!(210)), dec!(1260));
    }
}
