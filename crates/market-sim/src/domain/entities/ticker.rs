//! Live trading state of a single instrument.

use crate::domain::value_objects::Symbol;
use serde::{Deserialize, Serialize};

/// Market grouping of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "IN")]
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Inr,
}

/// Static description of an instrument tracked by the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub symbol: Symbol,
    pub price: f64,
    pub region: Region,
    pub currency: Currency,
}

impl InstrumentSpec {
    pub fn new(symbol: Symbol, price: f64, region: Region, currency: Currency) -> Self {
        InstrumentSpec {
            symbol,
            price,
            region,
            currency,
        }
    }

    /// Instruments available out of the box: seven US listings and seven
    /// Indian listings.
    pub fn default_universe() -> Vec<InstrumentSpec> {
        use Currency::{Inr, Usd};
        use Region::{In, Us};

        [
            ("AAPL", 150.00, Us, Usd),
            ("TSLA", 200.00, Us, Usd),
            ("GOOGL", 2800.00, Us, Usd),
            ("AMZN", 3400.00, Us, Usd),
            ("MSFT", 300.00, Us, Usd),
            ("BTC", 45000.00, Us, Usd),
            ("ETH", 3000.00, Us, Usd),
            ("RELIANCE", 2400.00, In, Inr),
            ("TCS", 3500.00, In, Inr),
            ("HDFCBANK", 1600.00, In, Inr),
            ("INFY", 1500.00, In, Inr),
            ("ICICIBANK", 950.00, In, Inr),
            ("TATAMOTORS", 600.00, In, Inr),
            ("SBIN", 580.00, In, Inr),
        ]
        .into_iter()
        .filter_map(|(symbol, price, region, currency)| {
            let symbol = Symbol::new(symbol).ok()?;
            Some(InstrumentSpec::new(symbol, price, region, currency))
        })
        .collect()
    }
}

/// Result of advancing one instrument by one simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickUpdate {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume_delta: u64,
}

/// Current state of an instrument as published to subscribers
///
/// Invariants: `price > 0` and `low <= price <= high`. `high`/`low` are
/// running extrema since the simulator started and `volume` never
/// decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: Symbol,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub high: f64,
    pub low: f64,
    pub region: Region,
    pub currency: Currency,
}

impl Ticker {
    pub const INITIAL_VOLUME: u64 = 1_000_000;

    /// Opening state: no change yet and a +/-1% band around the seed price
    pub fn open(spec: &InstrumentSpec) -> Self {
        Ticker {
            symbol: spec.symbol.clone(),
            price: spec.price,
            change: 0.0,
            change_percent: 0.0,
            volume: Self::INITIAL_VOLUME,
            high: spec.price * 1.01,
            low: spec.price * 0.99,
            region: spec.region,
            currency: spec.currency,
        }
    }

    /// Apply a full tick. High/low are widened, never reset.
    pub fn apply(&mut self, update: &TickUpdate) {
        self.price = update.price;
        self.change = update.change;
        self.change_percent = update.change_percent;
        self.volume = self.volume.saturating_add(update.volume_delta);
        self.high = self.high.max(update.price);
        self.low = self.low.min(update.price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Ticker {
        Ticker::open(&InstrumentSpec::new(
            Symbol::new("AAPL").unwrap(),
            150.0,
            Region::Us,
            Currency::Usd,
        ))
    }

    #[test]
    fn test_open_sets_band_and_volume() {
        let ticker = aapl();
        assert_eq!(ticker.volume, 1_000_000);
        assert!((ticker.high - 151.5).abs() < 1e-9);
        assert!((ticker.low - 148.5).abs() < 1e-9);
        assert_eq!(ticker.change, 0.0);
    }

    #[test]
    fn test_apply_widens_extrema_without_reset() {
        let mut ticker = aapl();
        ticker.apply(&TickUpdate {
            price: 160.0,
            change: 10.0,
            change_percent: 6.6,
            volume_delta: 5,
        });
        assert_eq!(ticker.high, 160.0);

        ticker.apply(&TickUpdate {
            price: 155.0,
            change: -5.0,
            change_percent: -3.1,
            volume_delta: 0,
        });
        assert_eq!(ticker.high, 160.0);
        assert!((ticker.low - 148.5).abs() < 1e-9);
        assert_eq!(ticker.volume, 1_000_005);
        assert_eq!(ticker.price, 155.0);
    }

    #[test]
    fn test_ticker_serializes_stream_fields() {
        let json = serde_json::to_value(aapl()).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["changePercent"], 0.0);
        assert_eq!(json["region"], "US");
        assert_eq!(json["currency"], "USD");
        assert!(json.get("volume").is_some());
    }

    #[test]
    fn test_default_universe_has_unique_symbols() {
        let universe = InstrumentSpec::default_universe();
        assert_eq!(universe.len(), 14);
        let mut symbols: Vec<_> = universe.iter().map(|i| i.symbol.clone()).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), 14);
    }
}
