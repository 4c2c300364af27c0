use crate::application::ports::MarketPublisher;
use crate::domain::{RandomWalk, Symbol};
use crate::infrastructure::repositories::InMemoryTickerStore;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Result of one simulation step
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub generation: u64,
    pub updated: usize,
    /// Instruments left unchanged because their step failed
    pub skipped: Vec<Symbol>,
}

/// Drives the random walk over every instrument and publishes each
/// completed generation.
///
/// Single writer of the ticker store. A failing instrument is logged and
/// skipped for that generation; it never aborts the tick for the others.
pub struct PriceSimulator<P: MarketPublisher, R: Rng> {
    store: Arc<InMemoryTickerStore>,
    publisher: Arc<P>,
    walk: RandomWalk,
    rng: R,
    generation: u64,
}

impl<P: MarketPublisher, R: Rng> PriceSimulator<P, R> {
    pub fn new(store: Arc<InMemoryTickerStore>, publisher: Arc<P>, walk: RandomWalk, rng: R) -> Self {
        Self {
            store,
            publisher,
            walk,
            rng,
            generation: 0,
        }
    }

    /// Number of completed ticks
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick(&mut self) -> TickReport {
        let current = self.store.all();
        let mut updates = Vec::with_capacity(current.len());
        let mut skipped = Vec::new();

        for ticker in &current {
            match self.walk.step(ticker, &mut self.rng) {
                Ok(update) => updates.push((ticker.symbol.clone(), update)),
                Err(e) => {
                    warn!(symbol = %ticker.symbol, error = %e, "skipping instrument for this tick");
                    skipped.push(ticker.symbol.clone());
                }
            }
        }

        let snapshot = self.store.apply_generation(&updates);
        self.generation += 1;
        self.publisher.publish(self.generation, snapshot);

        debug!(
            generation = self.generation,
            updated = updates.len(),
            subscribers = self.publisher.subscriber_count(),
            "tick published"
        );

        TickReport {
            generation: self.generation,
            updated: updates.len(),
            skipped,
        }
    }
}

impl<P, R> PriceSimulator<P, R>
where
    P: MarketPublisher + 'static,
    R: Rng + Send + 'static,
{
    /// Run [`tick`](Self::tick) every `period` on the tokio runtime until
    /// the returned handle is stopped or dropped. The first tick happens one
    /// full period after starting.
    pub fn start(mut self, period: Duration) -> SimulatorHandle<P, R> {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            info!(period_ms = period.as_millis() as u64, "price simulator started");

            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // An interval fires immediately on the first call
            ticks.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticks.tick() => {
                        self.tick();
                    }
                }
            }

            info!(generation = self.generation, "price simulator stopped");
            self
        });

        SimulatorHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Owner of a running simulator task
pub struct SimulatorHandle<P: MarketPublisher, R: Rng> {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<PriceSimulator<P, R>>,
}

impl<P: MarketPublisher, R: Rng> SimulatorHandle<P, R> {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop ticking and hand the simulator back. Returns `None` if the task
    /// panicked or was cancelled.
    pub async fn stop(mut self) -> Option<PriceSimulator<P, R>> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.task.await.ok()
    }
}
