use chrono::{DateTime, Duration, Local};
use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time for session timing and history timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Test clock that only moves when told to.
/// Clones share the same instant, so a test can keep a handle after
/// handing the clock to an engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn advance_millis(&self, millis: i64) {
        self.advance(Duration::milliseconds(millis));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

/// Fractional seconds between two instants, never negative
pub fn secs_between(start: DateTime<Local>, end: DateTime<Local>) -> f64 {
    let millis = end.signed_duration_since(start).num_milliseconds();
    millis.max(0) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let handle = clock.clone();
        let before = clock.now();

        handle.advance_secs(3);

        assert_eq!(secs_between(before, clock.now()), 3.0);
    }

    #[test]
    fn secs_between_is_fractional() {
        let clock = ManualClock::default();
        let start = clock.now();
        clock.advance_millis(1500);
        assert_eq!(secs_between(start, clock.now()), 1.5);
    }

    #[test]
    fn secs_between_clamps_backwards_time() {
        let clock = ManualClock::default();
        let later = clock.now() + Duration::seconds(5);
        assert_eq!(secs_between(later, clock.now()), 0.0);
    }
}
