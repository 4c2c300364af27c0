use crate::domain::{Portfolio, Position, Symbol, Trade};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Read model returned by portfolio queries
#[derive(Debug, Clone)]
pub struct PortfolioView {
    pub portfolio: Portfolio,
    pub positions: Vec<Position>,
    /// Newest first
    pub recent_trades: Vec<Trade>,
}

/// Storage for portfolios, their positions and the trade ledger
///
/// All writes go through a [`PortfolioTransaction`]. Implementations must
/// serialize transactions on the same portfolio; transactions on different
/// portfolios may run in parallel.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    type Transaction: PortfolioTransaction;

    /// Open a portfolio with the starting cash endowment, or return the
    /// existing one for this user
    async fn get_or_create(&self, user_id: &str) -> Portfolio;

    /// Start an exclusive unit of work on the user's portfolio.
    ///
    /// Waits for any in-flight transaction on the same portfolio. Returns
    /// `None` when the user has no portfolio.
    async fn begin(&self, user_id: &str) -> Option<Self::Transaction>;

    /// Consistent read of a portfolio with at most `trade_limit` trades
    async fn view(&self, user_id: &str, trade_limit: usize) -> Option<PortfolioView>;

    async fn exists(&self, user_id: &str) -> bool;
}

/// Exclusive, all-or-nothing unit of work on one portfolio
///
/// Changes are staged until [`commit`](PortfolioTransaction::commit).
/// Dropping the transaction without committing discards every staged change.
pub trait PortfolioTransaction: Send {
    fn portfolio(&self) -> &Portfolio;

    fn set_cash(&mut self, cash: Decimal);

    fn position(&self, symbol: &Symbol) -> Option<&Position>;

    /// Insert or replace the position for `position.symbol`
    fn put_position(&mut self, position: Position);

    fn remove_position(&mut self, symbol: &Symbol);

    /// Append to the ledger; trades are never updated or removed
    fn record_trade(&mut self, trade: Trade);

    /// Apply every staged change at once
    fn commit(self);
}
