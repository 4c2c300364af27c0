use crate::application::ports::PriceOracle;
use crate::domain::{Clock, DailyBar, Symbol, synthesize_history};
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("Too many days requested: {requested} (max {max})")]
    TooManyDays { requested: u32, max: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryLimits {
    pub default_days: u32,
    pub max_days: u32,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            default_days: 30,
            max_days: 365,
        }
    }
}

/// Daily bars for charting, synthesized on demand around the live price.
///
/// Nothing is persisted: two calls for the same symbol return different
/// series.
pub struct GetHistoryUseCase<C: Clock, O: PriceOracle> {
    clock: Arc<C>,
    oracle: Arc<O>,
    limits: HistoryLimits,
}

impl<C: Clock, O: PriceOracle> GetHistoryUseCase<C, O> {
    pub fn new(clock: Arc<C>, oracle: Arc<O>, limits: HistoryLimits) -> Self {
        Self {
            clock,
            oracle,
            limits,
        }
    }

    pub fn execute(&self, symbol: &str, days: Option<u32>) -> Result<Vec<DailyBar>, HistoryError> {
        self.execute_with_rng(symbol, days, &mut rand::thread_rng())
    }

    pub fn execute_with_rng<R: Rng + ?Sized>(
        &self,
        symbol: &str,
        days: Option<u32>,
        rng: &mut R,
    ) -> Result<Vec<DailyBar>, HistoryError> {
        let days = days.unwrap_or(self.limits.default_days);
        if days > self.limits.max_days {
            return Err(HistoryError::TooManyDays {
                requested: days,
                max: self.limits.max_days,
            });
        }

        let symbol =
            Symbol::new(symbol).map_err(|_| HistoryError::UnknownSymbol(symbol.to_string()))?;
        let price = self
            .oracle
            .current_price(&symbol)
            .ok_or_else(|| HistoryError::UnknownSymbol(symbol.to_string()))?;

        Ok(synthesize_history(price, days, self.clock.today(), rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstrumentSpec;
    use crate::infrastructure::{InMemoryTickerStore, SimulationClock};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn use_case() -> GetHistoryUseCase<SimulationClock, InMemoryTickerStore> {
        let clock = Arc::new(SimulationClock::at(
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        ));
        let store = Arc::new(InMemoryTickerStore::new(&InstrumentSpec::default_universe()));
        GetHistoryUseCase::new(clock, store, HistoryLimits::default())
    }

    #[test]
    fn test_default_window_is_thirty_days() {
        let mut rng = StdRng::seed_from_u64(3);
        let bars = use_case().execute_with_rng("AAPL", None, &mut rng).unwrap();

        assert_eq!(bars.len(), 30);
        assert_eq!(bars[29].time, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert!(bars.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_zero_days_is_empty() {
        let bars = use_case().execute("TCS", Some(0)).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_rejects_unknown_symbol_and_oversized_window() {
        let use_case = use_case();
        assert_eq!(
            use_case.execute("NOPE", Some(5)).unwrap_err(),
            HistoryError::UnknownSymbol("NOPE".to_string())
        );
        assert_eq!(
            use_case.execute("AAPL", Some(366)).unwrap_err(),
            HistoryError::TooManyDays {
                requested: 366,
                max: 365
            }
        );
    }
}
