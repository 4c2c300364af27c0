use crate::application::ports::PriceOracle;
use crate::domain::{InstrumentSpec, Symbol, TickUpdate, Ticker};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Live ticker state for every instrument, in listing order
///
/// The simulator is the only writer: it computes a generation from a read
/// of the current state and applies it afterwards, so any other writer
/// would be overwritten. A whole generation is applied under one write
/// lock, so readers see either all of a generation or none of it.
pub struct InMemoryTickerStore {
    tickers: Arc<RwLock<IndexMap<Symbol, Ticker>>>,
}

impl InMemoryTickerStore {
    /// Duplicate symbols keep their first listing position and the last spec
    pub fn new(specs: &[InstrumentSpec]) -> Self {
        let tickers = specs
            .iter()
            .map(|spec| (spec.symbol.clone(), Ticker::open(spec)))
            .collect();

        InMemoryTickerStore {
            tickers: Arc::new(RwLock::new(tickers)),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&InstrumentSpec::default_universe())
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Ticker> {
        self.tickers.read().get(symbol).cloned()
    }

    pub fn all(&self) -> Vec<Ticker> {
        self.tickers.read().values().cloned().collect()
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.tickers.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tickers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.read().is_empty()
    }

    /// Apply one update. Returns the new state, or `None` for an unknown
    /// symbol.
    pub fn apply_tick(&self, symbol: &Symbol, update: &TickUpdate) -> Option<Ticker> {
        let mut tickers = self.tickers.write();
        let ticker = tickers.get_mut(symbol)?;
        ticker.apply(update);
        Some(ticker.clone())
    }

    /// Apply a whole generation atomically and return the resulting
    /// snapshot. Updates for unknown symbols are ignored.
    pub fn apply_generation(&self, updates: &[(Symbol, TickUpdate)]) -> Vec<Ticker> {
        let mut tickers = self.tickers.write();
        for (symbol, update) in updates {
            if let Some(ticker) = tickers.get_mut(symbol) {
                ticker.apply(update);
            }
        }
        tickers.values().cloned().collect()
    }
}

impl Default for InMemoryTickerStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Clone for InMemoryTickerStore {
    fn clone(&self) -> Self {
        InMemoryTickerStore {
            tickers: Arc::clone(&self.tickers),
        }
    }
}

impl PriceOracle for InMemoryTickerStore {
    fn current_price(&self, symbol: &Symbol) -> Option<f64> {
        self.tickers.read().get(symbol).map(|t| t.price)
    }

    fn ticker(&self, symbol: &Symbol) -> Option<Ticker> {
        self.get(symbol)
    }

    fn tickers(&self) -> Vec<Ticker> {
        self.all()
    }
}
