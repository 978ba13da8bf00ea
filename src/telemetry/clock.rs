use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

/// One read of both time sources. `monotonic_ms` only has meaning relative to
/// other readings of the same clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    pub monotonic_ms: f64,
    pub wall: DateTime<Utc>,
}

pub trait Clock {
    fn now(&self) -> ClockReading;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> ClockReading {
        ClockReading {
            monotonic_ms: self.origin.elapsed().as_secs_f64() * 1000.0,
            wall: Utc::now(),
        }
    }
}

/// Clock that only moves when told to. Clones share the same time, so a
/// replay driver can keep one handle and give another to the app.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base_wall: DateTime<Utc>,
    offset_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(base_wall: DateTime<Utc>) -> Self {
        Self {
            base_wall,
            offset_ms: Rc::new(Cell::new(0.0)),
        }
    }

    pub fn set(&self, offset_ms: f64) {
        self.offset_ms.set(offset_ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> ClockReading {
        let offset_ms = self.offset_ms.get();
        let micros = (offset_ms * 1000.0).round() as i64;
        // 超出chrono可表示范围时钉在最大值，不panic
        let wall = self
            .base_wall
            .checked_add_signed(Duration::microseconds(micros))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        ClockReading {
            monotonic_ms: offset_ms,
            wall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_moves_both_sources_together() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(base);
        let handle = clock.clone();

        handle.set(1500.25);
        let reading = clock.now();
        assert_eq!(reading.monotonic_ms, 1500.25);
        assert_eq!(reading.wall.timestamp_millis(), base.timestamp_millis() + 1500);

        handle.set(1510.25);
        assert_eq!(clock.now().monotonic_ms, 1510.25);
    }

    #[test]
    fn manual_clock_saturates_instead_of_overflowing() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        clock.set(1e16);
        let reading = clock.now();
        assert_eq!(reading.monotonic_ms, 1e16);
        assert_eq!(reading.wall, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b.monotonic_ms >= a.monotonic_ms);
    }
}
