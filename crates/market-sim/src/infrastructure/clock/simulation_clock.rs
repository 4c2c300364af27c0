use crate::domain::{Clock, Timestamp};
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Clock shared by the engine, history and news
///
/// Either follows the wall clock from a chosen origin, or stays frozen until
/// moved with [`advance`](SimulationClock::advance) or
/// [`set_time`](SimulationClock::set_time). Clones share state.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    inner: Arc<RwLock<ClockState>>,
}

#[derive(Debug)]
struct ClockState {
    origin: Timestamp,
    /// Wall time at which `origin` was taken; `None` when frozen
    wall_reference: Option<Timestamp>,
}

impl SimulationClock {
    fn with_state(origin: Timestamp, wall_reference: Option<Timestamp>) -> Self {
        SimulationClock {
            inner: Arc::new(RwLock::new(ClockState {
                origin,
                wall_reference,
            })),
        }
    }

    /// Real-time clock starting now
    pub fn new() -> Self {
        let started = Utc::now();
        Self::with_state(started, Some(started))
    }

    /// Frozen clock at `time`
    pub fn at(time: Timestamp) -> Self {
        Self::with_state(time, None)
    }

    /// Frozen clock at the current wall time
    pub fn fixed() -> Self {
        Self::at(Utc::now())
    }

    pub fn is_fixed(&self) -> bool {
        self.inner.read().wall_reference.is_none()
    }

    /// Move simulated time forward. A real-time clock keeps running from
    /// the new position.
    pub fn advance(&self, duration: Duration) {
        let target = self.now() + duration;
        self.set_time(target);
    }

    pub fn set_time(&self, time: Timestamp) {
        let mut state = self.inner.write();
        state.origin = time;
        // Re-anchor so elapsed wall time is counted from here
        if let Some(reference) = state.wall_reference.as_mut() {
            *reference = Utc::now();
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Timestamp {
        let state = self.inner.read();
        match state.wall_reference {
            None => state.origin,
            Some(reference) => state.origin + (Utc::now() - reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_frozen_clock_stays_put() {
        let clock = SimulationClock::fixed();
        let frozen = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(frozen, clock.now());
        assert!(clock.is_fixed());
    }

    #[test]
    fn test_advance_and_today() {
        let clock = SimulationClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap());
        clock.advance(Duration::hours(2));
        assert_eq!(clock.today(), chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_real_time_clock_moves_forward() {
        let clock = SimulationClock::new();
        let t1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.now() > t1);
    }

    #[test]
    fn test_clones_observe_the_same_time() {
        let engine_clock = SimulationClock::fixed();
        let feed_clock = engine_clock.clone();
        engine_clock.advance(Duration::seconds(100));
        assert_eq!(engine_clock.now(), feed_clock.now());
    }
}
