use std::time::{Duration, Instant};

pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A monotonic timestamp split into whole seconds and sub-second nanoseconds
///
/// Captured relative to the owning [`Clock`]'s origin, so two timestamps are
/// only comparable when they come from the same clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    secs: i64,
    nanos: i32,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { secs: 0, nanos: 0 };

    fn from_duration(d: Duration) -> Self {
        Self {
            secs: d.as_secs() as i64,
            nanos: d.subsec_nanos() as i32,
        }
    }

    /// Signed nanoseconds elapsed from `before` to `self`
    ///
    /// Antisymmetric: `a.delta_ns(b) == -b.delta_ns(a)`. An i64 holds well
    /// over 290 years of nanoseconds, so process-lifetime spans cannot
    /// overflow.
    pub fn delta_ns(self, before: Timestamp) -> i64 {
        (self.secs - before.secs) * NANOS_PER_SEC + (self.nanos - before.nanos) as i64
    }
}

/// Frame clock for one scene run
///
/// Tracks the run start and the previous iteration's timestamp. The loop
/// checks its time budget against [`Clock::last`] so the frame in flight
/// always completes before the run stops.
#[derive(Debug)]
pub struct Clock {
    origin: Instant,
    started: Timestamp,
    last: Timestamp,
}

impl Clock {
    /// Start a clock; the run-start timestamp is now
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
            started: Timestamp::ZERO,
            last: Timestamp::ZERO,
        }
    }

    /// Read the current timestamp without advancing the clock
    pub fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.origin.elapsed())
    }

    /// Nanoseconds since the previous tick; stores the new timestamp
    pub fn tick(&mut self) -> i64 {
        let current = self.now();
        let delta = current.delta_ns(self.last);
        self.last = current;
        delta
    }

    /// The run-start timestamp
    pub fn started(&self) -> Timestamp {
        self.started
    }

    /// The timestamp stored by the most recent tick
    pub fn last(&self) -> Timestamp {
        self.last
    }
}
