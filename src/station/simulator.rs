//! Stateful per-station flow simulator.

use chrono::{NaiveDate, NaiveDateTime};
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use super::personality::StationProfile;
use super::tank::TankState;
use crate::error::{Result, SimError};
use crate::sim::calendar::CalendarFeatures;
use crate::sim::clock::{SECONDS_PER_MINUTE, SimClock, StepInterval};
use crate::sim::types::{AdminAction, EventRecord, StockReceipt};

/// When stock is added back to the tank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefillPolicy {
    /// After depletion, if stock is below `threshold`, add `amount` in the same step.
    Automatic { threshold: f64, amount: f64 },
    /// Stock only rises through [`StationSimulator::refill`] or [`StationSimulator::reset`].
    Manual,
}

impl RefillPolicy {
    /// Checks the policy against a tank capacity.
    ///
    /// An automatic policy must satisfy `0 < threshold < capacity` and
    /// `amount >= threshold`, so one refill always lifts the stock back to
    /// at least the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidTank`] describing the violated bound.
    pub fn validate(&self, capacity: f64) -> Result<()> {
        if let Self::Automatic { threshold, amount } = *self {
            if !(threshold.is_finite() && threshold > 0.0 && threshold < capacity) {
                return Err(SimError::InvalidTank(format!(
                    "refill threshold must be in (0, {capacity}), got {threshold}"
                )));
            }
            if !(amount.is_finite() && amount >= threshold) {
                return Err(SimError::InvalidTank(format!(
                    "refill amount must be >= threshold {threshold}, got {amount}"
                )));
            }
        }
        Ok(())
    }
}

/// One simulated station: demand profile, noise, tank, clock, and its own RNG stream.
///
/// Each call to [`next_event`](Self::next_event) advances the clock, draws
/// a flow from the demand profile and noise model, depletes the tank, applies
/// the refill policy, and returns an [`EventRecord`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use station_flow_sim::sim::clock::StepInterval;
/// use station_flow_sim::station::{Personality, RefillPolicy, StationSimulator, TankState};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1)
///     .unwrap()
///     .and_hms_opt(0, 0, 0)
///     .unwrap();
/// let mut sim = StationSimulator::new(
///     "STN_B",
///     Personality::Balanced.profile(None).unwrap(),
///     TankState::full(6000.0).unwrap(),
///     RefillPolicy::Manual,
///     StepInterval::FixedMinute,
///     start,
///     42,
/// )
/// .unwrap();
///
/// let event = sim.next_event();
/// assert_eq!(event.timestamp.to_string(), "2025-01-01 00:01:00");
/// assert!(event.stock_kg < 6000.0);
/// ```
#[derive(Debug, Clone)]
pub struct StationSimulator {
    id: String,
    profile: StationProfile,
    tank: TankState,
    policy: RefillPolicy,
    interval: StepInterval,
    clock: SimClock,
    /// Day total in effect, resampled when the date changes.
    day: Option<(NaiveDate, f64)>,
    /// Set by a manual refill; reported on the next record.
    refill_pending: bool,
    rng: StdRng,
}

impl StationSimulator {
    /// Creates a station simulator.
    ///
    /// # Arguments
    ///
    /// * `id` - Station identifier carried on every record
    /// * `profile` - Demand curve and noise coefficients
    /// * `tank` - Initial tank state
    /// * `policy` - Automatic or manual refill
    /// * `interval` - Fixed one-minute or irregular step spacing
    /// * `start` - Clock start; the first record lands one interval later
    /// * `seed` - Seed for this station's private RNG stream
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidTank`] if the refill policy does not fit the tank.
    pub fn new(
        id: impl Into<String>,
        profile: StationProfile,
        tank: TankState,
        policy: RefillPolicy,
        interval: StepInterval,
        start: NaiveDateTime,
        seed: u64,
    ) -> Result<Self> {
        policy.validate(tank.capacity())?;
        Ok(Self {
            id: id.into(),
            profile,
            tank,
            policy,
            interval,
            clock: SimClock::new(start),
            day: None,
            refill_pending: false,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tank(&self) -> &TankState {
        &self.tank
    }

    pub fn policy(&self) -> RefillPolicy {
        self.policy
    }

    pub fn interval(&self) -> StepInterval {
        self.interval
    }

    pub fn profile(&self) -> &StationProfile {
        &self.profile
    }

    /// Timestamp of the most recent record (or the start time before the first).
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Advances one interval and emits the resulting record.
    pub fn next_event(&mut self) -> EventRecord {
        let seconds = self.interval.draw(&mut self.rng);
        self.step(seconds)
    }

    /// Like [`next_event`](Self::next_event), but never moves past `limit`.
    ///
    /// The final interval is shortened so the last record lands exactly on
    /// `limit`. Returns `None` once the clock has reached `limit`.
    pub fn next_event_until(&mut self, limit: NaiveDateTime) -> Option<EventRecord> {
        let remaining = self.clock.seconds_until(limit);
        if remaining == 0 {
            return None;
        }
        let seconds = self.interval.draw(&mut self.rng).min(remaining);
        Some(self.step(seconds))
    }

    /// Adds `amount` kg (capped at capacity); the next record reports `is_refill`.
    pub fn refill(&mut self, amount: f64) -> StockReceipt {
        let stock_kg = self.tank.refill(amount);
        self.refill_pending = true;
        debug!(station = %self.id, amount, stock_kg, "manual refill");
        StockReceipt {
            station_id: self.id.clone(),
            action: AdminAction::Refill,
            stock_kg,
        }
    }

    /// Overwrites the stock (sensor recalibration). Does not mark a refill.
    pub fn reset(&mut self, new_amount: f64) -> StockReceipt {
        let stock_kg = self.tank.reset(new_amount);
        debug!(station = %self.id, new_amount, stock_kg, "stock reset");
        StockReceipt {
            station_id: self.id.clone(),
            action: AdminAction::Reset,
            stock_kg,
        }
    }

    fn step(&mut self, seconds: u32) -> EventRecord {
        let timestamp = self.clock.advance(seconds);
        let calendar = CalendarFeatures::from_timestamp(timestamp);

        let day_total = self.day_total(timestamp.date(), calendar.is_weekend);
        let base = self.profile.demand.baseline(day_total, calendar.hour);
        let flow = self
            .profile
            .noise
            .perturb(base, calendar.minute, &mut self.rng);

        let consumed = flow * (f64::from(seconds) / f64::from(SECONDS_PER_MINUTE));
        let mut stock = self.tank.deplete(consumed);
        let mut is_refill = std::mem::take(&mut self.refill_pending);

        if let RefillPolicy::Automatic { threshold, amount } = self.policy
            && stock < threshold
        {
            stock = self.tank.refill(amount);
            is_refill = true;
            debug!(station = %self.id, %timestamp, stock_kg = stock, "automatic refill");
        }
        self.tank.observe(timestamp);

        EventRecord {
            timestamp,
            station_id: self.id.clone(),
            flow_kg_min: flow,
            consumed_kg: consumed,
            stock_kg: stock,
            is_refill,
            interval_secs: seconds,
            calendar,
        }
    }

    fn day_total(&mut self, date: NaiveDate, is_weekend: bool) -> f64 {
        match self.day {
            Some((day, total)) if day == date => total,
            _ => {
                let total = self.profile.demand.day_total(is_weekend, &mut self.rng);
                self.day = Some((date, total));
                total
            }
        }
    }
}
