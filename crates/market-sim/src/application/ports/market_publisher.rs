use crate::domain::Ticker;

/// Fan-out of completed tick generations to stream subscribers
///
/// Called from the simulator loop, so implementations must not block on
/// subscriber I/O.
pub trait MarketPublisher: Send + Sync {
    /// Publish the full ticker set produced by tick `generation`
    fn publish(&self, generation: u64, tickers: Vec<Ticker>);

    /// Number of currently connected subscribers
    fn subscriber_count(&self) -> usize;
}
