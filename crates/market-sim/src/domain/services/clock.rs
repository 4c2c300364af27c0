use crate::domain::value_objects::Timestamp;

/// Source of "now" for fills, history and news timestamps
///
/// Implementations can be the wall clock or a fixed simulation clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Current time as milliseconds since Unix epoch
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Calendar date of `now` in UTC
    fn today(&self) -> chrono::NaiveDate {
        self.now().date_naive()
    }
}
