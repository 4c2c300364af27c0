use crate::domain::value_objects::{PortfolioId, Side, Symbol, Timestamp, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A filled order as recorded in a portfolio's ledger. Never mutated after
/// the transaction that wrote it commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: TradeId,
    pub portfolio_id: PortfolioId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: u64,
    /// Execution price, identical to the price reported in the fill
    pub price: Decimal,
    pub timestamp: Timestamp,
}

impl Trade {
    pub fn new(
        portfolio_id: PortfolioId,
        symbol: Symbol,
        side: Side,
        quantity: u64,
        price: Decimal,
        timestamp: Timestamp,
    ) -> Self {
        Trade {
            id: Uuid::new_v4(),
            portfolio_id,
            symbol,
            side,
            quantity,
            price,
            timestamp,
        }
    }

    /// Gross value of the fill
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Effect of this trade on the portfolio's cash
    pub fn cash_flow(&self) -> Decimal {
        self.side.cash_flow(self.notional())
    }
}
