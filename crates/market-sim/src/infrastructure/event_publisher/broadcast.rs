use crate::application::ports::MarketPublisher;
use crate::domain::{MarketMessage, Ticker};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

/// Broadcast-based market data publisher
///
/// Every subscriber gets one SNAPSHOT of the latest published generation
/// followed by each later generation as an UPDATE, with no gaps or repeats
/// between the two. The channel is bounded; a subscriber that falls more
/// than `capacity` generations behind skips straight to newer data instead
/// of slowing the publisher down.
pub struct BroadcastMarketPublisher {
    tx: broadcast::Sender<Arc<MarketMessage>>,
    /// Latest published generation and its data
    latest: Arc<RwLock<(u64, Arc<Vec<Ticker>>)>>,
    capacity: usize,
}

impl BroadcastMarketPublisher {
    /// `initial` is served as generation 0 until the first publish
    pub fn new(capacity: usize, initial: Vec<Ticker>) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));

        BroadcastMarketPublisher {
            tx,
            latest: Arc::new(RwLock::new((0, Arc::new(initial)))),
            capacity,
        }
    }

    pub fn subscribe(&self) -> MarketSubscription {
        // Holding the read lock while subscribing excludes a concurrent
        // publish, so the receiver starts exactly after the snapshot.
        let latest = self.latest.read();
        let updates = self.tx.subscribe();
        let snapshot = MarketMessage::snapshot(latest.0, Arc::clone(&latest.1));

        MarketSubscription {
            last_generation: snapshot.generation,
            snapshot,
            updates,
        }
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest.read().0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Clone for BroadcastMarketPublisher {
    fn clone(&self) -> Self {
        BroadcastMarketPublisher {
            tx: self.tx.clone(),
            latest: Arc::clone(&self.latest),
            capacity: self.capacity,
        }
    }
}

impl MarketPublisher for BroadcastMarketPublisher {
    fn publish(&self, generation: u64, tickers: Vec<Ticker>) {
        let data = Arc::new(tickers);
        let mut latest = self.latest.write();
        *latest = (generation, Arc::clone(&data));
        // No receivers is not an error
        let _ = self.tx.send(Arc::new(MarketMessage::update(generation, data)));
    }

    fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One subscriber's view of the market stream
pub struct MarketSubscription {
    snapshot: MarketMessage,
    last_generation: u64,
    updates: broadcast::Receiver<Arc<MarketMessage>>,
}

impl MarketSubscription {
    /// State at the moment of subscribing
    pub fn snapshot(&self) -> &MarketMessage {
        &self.snapshot
    }

    /// Wait for the next generation. Returns `None` once the publisher is
    /// gone.
    pub async fn next_update(&mut self) -> Option<Arc<MarketMessage>> {
        loop {
            match self.updates.recv().await {
                Ok(message) => {
                    if let Some(message) = self.accept(message) {
                        return Some(message);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "market subscriber lagged, skipping ahead");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next generation if one is already queued
    pub fn try_next_update(&mut self) -> Option<Arc<MarketMessage>> {
        loop {
            match self.updates.try_recv() {
                Ok(message) => {
                    if let Some(message) = self.accept(message) {
                        return Some(message);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "market subscriber lagged, skipping ahead");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    fn accept(&mut self, message: Arc<MarketMessage>) -> Option<Arc<MarketMessage>> {
        if message.generation <= self.last_generation {
            return None;
        }
        self.last_generation = message.generation;
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstrumentSpec, MessageKind};

    fn tickers() -> Vec<Ticker> {
        InstrumentSpec::default_universe()
            .iter()
            .map(Ticker::open)
            .collect()
    }

    fn repriced(price: f64) -> Vec<Ticker> {
        let mut tickers = tickers();
        tickers[0].price = price;
        tickers
    }

    #[tokio::test]
    async fn test_snapshot_then_updates() {
        let publisher = BroadcastMarketPublisher::new(16, tickers());
        let mut subscription = publisher.subscribe();

        assert_eq!(subscription.snapshot().kind, MessageKind::Snapshot);
        assert_eq!(subscription.snapshot().generation, 0);
        assert_eq!(subscription.snapshot().data.len(), 14);

        publisher.publish(1, repriced(151.0));
        let update = subscription.next_update().await.unwrap();
        assert_eq!(update.kind, MessageKind::Update);
        assert_eq!(update.generation, 1);
        assert_eq!(update.data[0].price, 151.0);
    }

    #[tokio::test]
    async fn test_late_subscriber_starts_from_latest() {
        let publisher = BroadcastMarketPublisher::new(16, tickers());
        publisher.publish(1, repriced(151.0));
        publisher.publish(2, repriced(152.0));

        let mut subscription = publisher.subscribe();
        assert_eq!(subscription.snapshot().generation, 2);
        assert_eq!(subscription.snapshot().data[0].price, 152.0);
        // Nothing published before subscribing is replayed
        assert!(subscription.try_next_update().is_none());

        publisher.publish(3, repriced(153.0));
        assert_eq!(subscription.try_next_update().unwrap().generation, 3);
    }

    #[tokio::test]
    async fn test_slow_subscriber_skips_ahead() {
        let publisher = BroadcastMarketPublisher::new(4, tickers());
        let mut subscription = publisher.subscribe();

        for generation in 1..=10 {
            publisher.publish(generation, repriced(150.0 + generation as f64));
        }

        let first = subscription.next_update().await.unwrap();
        assert!(first.generation > 1);
        let mut last = first.generation;
        while let Some(update) = subscription.try_next_update() {
            assert!(update.generation > last);
            last = update.generation;
        }
        assert_eq!(last, 10);
    }

    #[tokio::test]
    async fn test_subscriber_count_follows_drops() {
        let publisher = BroadcastMarketPublisher::new(16, tickers());
        assert_eq!(publisher.subscriber_count(), 0);

        let first = publisher.subscribe();
        let second = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 2);

        drop(first);
        assert_eq!(publisher.subscriber_count(), 1);
        drop(second);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let publisher = BroadcastMarketPublisher::new(16, tickers());
        publisher.publish(1, repriced(151.0));
        assert_eq!(publisher.latest_generation(), 1);
    }
}
