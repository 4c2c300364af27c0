use crate::domain::{Symbol, Ticker};

/// Read-only view of live instrument state
///
/// Reads never block on the simulator for longer than a single tick
/// application and always observe a whole ticker, never a half-applied one.
pub trait PriceOracle: Send + Sync {
    /// Latest traded price, `None` when the symbol is not tracked
    fn current_price(&self, symbol: &Symbol) -> Option<f64>;

    /// Point-in-time copy of one instrument
    fn ticker(&self, symbol: &Symbol) -> Option<Ticker>;

    /// Point-in-time copy of every instrument in listing order
    fn tickers(&self) -> Vec<Ticker>;
}
