use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of synthesized OHLC history, serialized with `time` as `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub time: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
