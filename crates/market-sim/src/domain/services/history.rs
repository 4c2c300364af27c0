//! Synthetic daily OHLC history for charting.

use crate::domain::entities::DailyBar;
use chrono::{Days, NaiveDate};
use rand::Rng;

/// Fraction of the live price the synthetic history starts from
pub const HISTORY_START_RATIO: f64 = 0.9;

/// Daily move scale relative to the running price
const DAILY_VOLATILITY: f64 = 0.02;

/// Build `days` bars ending the day before `today`, oldest first.
///
/// The walk starts at 90% of `current_price`; each bar's open and close are
/// perturbed independently around the running price, and the close carries
/// over as the next running price.
pub fn synthesize_history<R: Rng + ?Sized>(
    current_price: f64,
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<DailyBar> {
    let mut bars = Vec::with_capacity(days as usize);
    let mut price = current_price * HISTORY_START_RATIO;

    for offset in (1..=days).rev() {
        let time = today
            .checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(NaiveDate::MIN);
        let volatility = price * DAILY_VOLATILITY;
        let open = price + (rng.r#gen::<f64>() - 0.5) * volatility;
        let close = price + (rng.r#gen::<f64>() - 0.5) * volatility;
        let high = open.max(close) + rng.r#gen::<f64>() * volatility;
        let low = open.min(close) - rng.r#gen::<f64>() * volatility;

        bars.push(DailyBar {
            time,
            open,
            high,
            low,
            close,
        });
        price = close;
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn test_history_has_requested_length_in_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let bars = synthesize_history(150.0, 30, today(), &mut rng);

        assert_eq!(bars.len(), 30);
        assert_eq!(bars[0].time, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(bars[29].time, NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());
        assert!(bars.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_bars_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(5);
        let bars = synthesize_history(2400.0, 90, today(), &mut rng);

        for bar in &bars {
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
        }
    }

    #[test]
    fn test_history_starts_near_ninety_percent() {
        let mut rng = StdRng::seed_from_u64(8);
        let bars = synthesize_history(1000.0, 5, today(), &mut rng);

        // First open is within one daily move of 900
        assert!((bars[0].open - 900.0).abs() <= 900.0 * DAILY_VOLATILITY * 0.5);
    }

    #[test]
    fn test_zero_days_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(synthesize_history(100.0, 0, today(), &mut rng).is_empty());
    }

    #[test]
    fn test_time_serializes_as_date() {
        let mut rng = StdRng::seed_from_u64(2);
        let bars = synthesize_history(100.0, 1, today(), &mut rng);
        let json = serde_json::to_value(&bars[0]).unwrap();
        assert_eq!(json["time"], "2024-03-30");
    }
}
