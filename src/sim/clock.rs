use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;

/// Seconds in one fixed simulation step.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Spacing between consecutive events of one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInterval {
    /// Exactly one minute per event (real-time feed).
    FixedMinute,
    /// Uniform whole-second gap in `min_secs..=max_secs` (historical batch).
    Irregular { min_secs: u32, max_secs: u32 },
}

impl StepInterval {
    /// The historical-batch default: 1 to 60 seconds.
    pub const IRREGULAR_DEFAULT: Self = Self::Irregular {
        min_secs: 1,
        max_secs: 60,
    };

    /// Draws the next gap in seconds. Fixed steps consume no randomness.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        match *self {
            Self::FixedMinute => SECONDS_PER_MINUTE,
            Self::Irregular { min_secs, max_secs } => {
                let low = min_secs.max(1);
                rng.random_range(low..=max_secs.max(low))
            }
        }
    }
}

/// A simulation clock that advances a wall-clock timestamp.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use station_flow_sim::sim::clock::SimClock;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1)
///     .unwrap()
///     .and_hms_opt(0, 0, 0)
///     .unwrap();
/// let mut clock = SimClock::new(start);
/// let next = clock.advance(90);
/// assert_eq!(next.to_string(), "2025-01-01 00:01:30");
/// ```
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Current simulated time
    now: NaiveDateTime,
}

impl SimClock {
    /// Creates a clock positioned at `start`.
    pub fn new(start: NaiveDateTime) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Moves the clock forward by `seconds` and returns the new time.
    pub fn advance(&mut self, seconds: u32) -> NaiveDateTime {
        self.now += TimeDelta::seconds(i64::from(seconds));
        self.now
    }

    /// Whole seconds from now until `limit`, or zero if `limit` has passed.
    pub fn seconds_until(&self, limit: NaiveDateTime) -> u32 {
        let remaining = (limit - self.now).num_seconds().max(0);
        u32::try_from(remaining).unwrap_or(u32::MAX)
    }
}
