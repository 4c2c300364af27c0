use crate::domain::{Symbol, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn score(&self) -> f64 {
        match self {
            Sentiment::Positive => 0.8,
            Sentiment::Negative => -0.6,
            Sentiment::Neutral => 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: u32,
    pub headline: String,
    pub source: String,
    pub time: Timestamp,
    pub sentiment: Sentiment,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub price: f64,
    pub volume: u64,
    pub oi: u64,
    pub iv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeRow {
    pub strike: f64,
    pub call: OptionQuote,
    pub put: OptionQuote,
}

/// Headline and derivatives data shown next to the live market
///
/// Treated as an opaque collaborator: the core never inspects the results.
pub trait ResearchFeed: Send + Sync {
    fn news(&self, symbol: &Symbol, now: Timestamp) -> Vec<NewsItem>;

    /// Strike ladder centered on `spot`, lowest strike first
    fn options_chain(&self, symbol: &Symbol, spot: f64) -> Vec<StrikeRow>;
}
