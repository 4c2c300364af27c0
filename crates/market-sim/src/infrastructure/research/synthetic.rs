use crate::application::ports::{NewsItem, OptionQuote, ResearchFeed, Sentiment, StrikeRow};
use crate::domain::{Symbol, Timestamp};
use chrono::Duration;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const NEWS_ITEMS: usize = 5;
const NEWS_SOURCE: &str = "Financial Times";
/// Strikes on each side of the at-the-money strike
const STRIKES_PER_SIDE: i32 = 5;

/// Randomized news and option chains for demo screens
///
/// Nothing here is tied to the live simulation beyond the spot price passed
/// in for the option chain.
pub struct SyntheticResearchFeed {
    rng: Mutex<StdRng>,
}

impl SyntheticResearchFeed {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SyntheticResearchFeed {
    fn default() -> Self {
        Self::new()
    }
}

fn headlines(symbol: &Symbol) -> [String; 5] {
    [
        format!("Analysts upgrade {symbol} after strong earnings"),
        format!("{symbol} faces regulatory scrutiny in new market"),
        format!("Market rally boosts {symbol} to new highs"),
        format!("{symbol} announces strategic partnership"),
        format!("Investors cautious ahead of {symbol} report"),
    ]
}

/// Strike spacing of roughly 2.5% of spot, snapped to 1, 2.5 or 5 times a
/// power of ten
fn strike_step(spot: f64) -> f64 {
    let raw = spot * 0.025;
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let snapped = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.5
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    snapped * magnitude
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn quote<R: Rng + ?Sized>(intrinsic: f64, spot: f64, distance: f64, rng: &mut R) -> OptionQuote {
    let time_value = spot * 0.03 * (-distance * 10.0).exp();
    // Volatility smile: wings trade richer than the money
    let iv = 0.20 + distance * 0.5 + rng.gen_range(0.0..0.05);
    OptionQuote {
        price: round2(intrinsic + time_value),
        volume: rng.gen_range(0..5_000),
        oi: rng.gen_range(1_000..50_000),
        iv: (iv * 10_000.0).round() / 10_000.0,
    }
}

impl ResearchFeed for SyntheticResearchFeed {
    fn news(&self, symbol: &Symbol, now: Timestamp) -> Vec<NewsItem> {
        const SENTIMENTS: [Sentiment; 3] =
            [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

        let headlines = headlines(symbol);
        let mut rng = self.rng.lock();

        (0..NEWS_ITEMS)
            .map(|i| {
                let sentiment = *SENTIMENTS.choose(&mut *rng).unwrap_or(&Sentiment::Neutral);
                let headline = headlines.choose(&mut *rng).cloned().unwrap_or_default();
                NewsItem {
                    id: i as u32,
                    headline,
                    source: NEWS_SOURCE.to_string(),
                    time: now - Duration::hours(i as i64),
                    sentiment,
                    score: sentiment.score(),
                }
            })
            .collect()
    }

    fn options_chain(&self, _symbol: &Symbol, spot: f64) -> Vec<StrikeRow> {
        if !spot.is_finite() || spot <= 0.0 {
            return Vec::new();
        }

        let step = strike_step(spot);
        let atm = (spot / step).round() * step;
        let mut rng = self.rng.lock();

        (-STRIKES_PER_SIDE..=STRIKES_PER_SIDE)
            .map(|k| atm + f64::from(k) * step)
            .filter(|strike| *strike > 0.0)
            .map(|strike| {
                let distance = (strike - spot).abs() / spot;
                StrikeRow {
                    strike: round2(strike),
                    call: quote((spot - strike).max(0.0), spot, distance, &mut *rng),
                    put: quote((strike - spot).max(0.0), spot, distance, &mut *rng),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_news_items_are_hourly_and_scored() {
        let feed = SyntheticResearchFeed::seeded(9);
        let symbol = Symbol::new("TCS").unwrap();
        let now = Utc::now();

        let news = feed.news(&symbol, now);

        assert_eq!(news.len(), 5);
        for (i, item) in news.iter().enumerate() {
            assert_eq!(item.id, i as u32);
            assert_eq!(item.time, now - Duration::hours(i as i64));
            assert_eq!(item.source, "Financial Times");
            assert!(item.headline.contains("TCS"));
            assert_eq!(item.score, item.sentiment.score());
        }
    }

    #[test]
    fn test_sentiment_wire_format() {
        let json = serde_json::to_value(Sentiment::Negative).unwrap();
        assert_eq!(json, "NEGATIVE");
        assert_eq!(Sentiment::Positive.score(), 0.8);
        assert_eq!(Sentiment::Negative.score(), -0.6);
        assert_eq!(Sentiment::Neutral.score(), 0.1);
    }

    #[test]
    fn test_options_chain_is_centered_on_spot() {
        let feed = SyntheticResearchFeed::seeded(1);
        let chain = feed.options_chain(&Symbol::new("AAPL").unwrap(), 150.0);

        assert_eq!(chain.len(), 11);
        assert!(chain.windows(2).all(|w| w[0].strike < w[1].strike));
        assert_eq!(chain[5].strike, 150.0);

        for row in &chain {
            assert!(row.call.price >= (150.0 - row.strike).max(0.0));
            assert!(row.put.price >= (row.strike - 150.0).max(0.0));
            assert!(row.call.iv > 0.0);
        }
    }

    #[test]
    fn test_strike_step_scales_with_price() {
        assert_eq!(strike_step(150.0), 5.0);
        assert_eq!(strike_step(45000.0), 1000.0);
        assert_eq!(strike_step(580.0), 10.0);
    }

    #[test]
    fn test_options_chain_rejects_bad_spot() {
        let feed = SyntheticResearchFeed::seeded(1);
        assert!(feed.options_chain(&Symbol::new("AAPL").unwrap(), 0.0).is_empty());
    }
}
