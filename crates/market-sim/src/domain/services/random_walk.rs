//! Bounded geometric random walk used to advance live prices.

use crate::domain::entities::{TickUpdate, Ticker};
use crate::domain::value_objects::Symbol;
use rand::Rng;
use thiserror::Error;

/// Per-instrument failure while computing a tick. The simulator logs it and
/// leaves that instrument unchanged for the generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    #[error("non-finite tick result for {symbol}")]
    NonFinite { symbol: Symbol },

    #[error("price {price} for {symbol} is not positive")]
    NonPositive { symbol: Symbol, price: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWalk {
    /// Scale of the per-tick move; `delta = price * (u - 0.5) * volatility`
    pub volatility: f64,
    /// Strictly positive lower bound on any price
    pub price_floor: f64,
    /// Exclusive upper bound of the per-tick volume increment
    pub max_volume_step: u64,
}

impl Default for RandomWalk {
    fn default() -> Self {
        RandomWalk {
            volatility: 0.002,
            price_floor: 0.01,
            max_volume_step: 100,
        }
    }
}

impl RandomWalk {
    /// Compute the next tick for `ticker` without mutating it.
    pub fn step<R: Rng + ?Sized>(&self, ticker: &Ticker, rng: &mut R) -> Result<TickUpdate, TickError> {
        let price = ticker.price;
        if !price.is_finite() {
            return Err(TickError::NonFinite {
                symbol: ticker.symbol.clone(),
            });
        }
        if price <= 0.0 {
            return Err(TickError::NonPositive {
                symbol: ticker.symbol.clone(),
                price,
            });
        }

        let u: f64 = rng.r#gen::<f64>();
        let delta = price * (u - 0.5) * self.volatility;
        let new_price = (price + delta).max(self.price_floor);
        // Relative to the price implied by the post-tick value
        let change_percent = delta / (new_price - delta) * 100.0;

        if !new_price.is_finite() || !delta.is_finite() || !change_percent.is_finite() {
            return Err(TickError::NonFinite {
                symbol: ticker.symbol.clone(),
            });
        }

        let volume_delta = if self.max_volume_step == 0 {
            0
        } else {
            rng.gen_range(0..self.max_volume_step)
        };

        Ok(TickUpdate {
            price: new_price,
            change: delta,
            change_percent,
            volume_delta,
        })
    }
}
