//! Synthetic transit times for supply trips between a mother and a daughter station.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::Normal;
use tracing::info;

use crate::error::{Result, SimError};
use crate::station::profile::is_weekend_day;

/// Probability of 0, 1, … 6 trips on a given day.
pub const TRIPS_PER_DAY_WEIGHTS: [f64; 7] = [0.003, 0.05, 0.15, 0.30, 0.25, 0.20, 0.047];

/// Shortest possible transit (minutes).
pub const MIN_TRANSIT_MIN: f64 = 20.0;

const FIRST_DEPARTURE_HOUR: u32 = 5;
const LAST_DEPARTURE_HOUR: u32 = 23;
const EXTREME_EVENT_PROBABILITY: f64 = 0.01;

/// Public holidays of the 2025 calendar the default route runs under.
pub const HOLIDAYS_2025: [(u32, u32); 24] = [
    (1, 1),
    (1, 14),
    (2, 19),
    (3, 29),
    (3, 30),
    (3, 31),
    (4, 6),
    (4, 10),
    (4, 14),
    (4, 18),
    (5, 1),
    (5, 12),
    (5, 29),
    (6, 7),
    (8, 15),
    (8, 16),
    (8, 27),
    (10, 2),
    (10, 21),
    (10, 22),
    (10, 23),
    (10, 31),
    (11, 5),
    (12, 25),
];

/// [`HOLIDAYS_2025`] as dates.
pub fn default_holidays() -> BTreeSet<NaiveDate> {
    HOLIDAYS_2025
        .iter()
        .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(2025, month, day))
        .collect()
}

/// Parameters of a transit dataset.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    pub route_id: String,
    pub start: NaiveDate,
    pub days: u32,
    /// Uncongested transit time (minutes).
    pub base_transit_min: f64,
    pub holidays: BTreeSet<NaiveDate>,
    /// Number of road-construction windows.
    pub construction_events: u32,
    pub construction_min_days: u32,
    pub construction_max_days: u32,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            route_id: "MS01_DBS01".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            days: 365,
            base_transit_min: 42.0,
            holidays: default_holidays(),
            construction_events: 3,
            construction_min_days: 7,
            construction_max_days: 21,
        }
    }
}

/// One supply trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    pub start_time: NaiveDateTime,
    pub day_of_week: u32,
    pub hour_of_day: u32,
    pub is_weekend: bool,
    pub is_peak_hour: bool,
    pub is_holiday: bool,
    pub construction_active: bool,
    pub base_time_min: f64,
    pub transit_time_min: f64,
}

impl fmt::Display for TripRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<6} {} {} | {:>5.1} min (base {:.0}){}{}{}",
            self.trip_id,
            self.route_id,
            self.start_time.format("%Y-%m-%d %H:%M"),
            self.transit_time_min,
            self.base_time_min,
            if self.is_peak_hour { " peak" } else { "" },
            if self.is_holiday { " holiday" } else { "" },
            if self.construction_active { " works" } else { "" },
        )
    }
}

/// Morning (07–10) or evening (17–21) rush.
pub fn is_peak_hour(hour: u32) -> bool {
    (7..=10).contains(&hour) || (17..=21).contains(&hour)
}

/// Inclusive date-time window of road works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructionWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ConstructionWindow {
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Seeded generator of trip records.
pub struct TransitGenerator {
    config: TransitConfig,
    trips_per_day: WeightedIndex<f64>,
    noise: Normal<f64>,
    rng: StdRng,
}

impl TransitGenerator {
    /// # Errors
    ///
    /// Returns [`SimError::InvalidProfile`] when the construction bounds are
    /// reversed or the base time is not positive.
    pub fn new(config: TransitConfig, seed: u64) -> Result<Self> {
        if config.construction_min_days > config.construction_max_days {
            return Err(SimError::InvalidProfile(
                "construction_min_days must be <= construction_max_days".to_string(),
            ));
        }
        if !(config.base_transit_min.is_finite() && config.base_transit_min > 0.0) {
            return Err(SimError::InvalidProfile(format!(
                "base_transit_min must be > 0, got {}",
                config.base_transit_min
            )));
        }
        let trips_per_day = WeightedIndex::new(TRIPS_PER_DAY_WEIGHTS)
            .map_err(|e| SimError::InvalidProfile(format!("trip weights: {e}")))?;
        let noise = Normal::new(0.0, 3.0)
            .map_err(|e| SimError::InvalidProfile(format!("transit noise: {e}")))?;
        Ok(Self {
            config,
            trips_per_day,
            noise,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Draws the construction windows for the configured range.
    fn construction_windows(&mut self) -> Vec<ConstructionWindow> {
        let c = &self.config;
        let origin = c.start.and_time(NaiveTime::default());
        let latest_start = c.days.saturating_sub(c.construction_max_days);
        (0..c.construction_events)
            .map(|_| {
                let offset = self.rng.random_range(0..=latest_start);
                let duration = self
                    .rng
                    .random_range(c.construction_min_days..=c.construction_max_days);
                let start = origin + TimeDelta::days(i64::from(offset));
                ConstructionWindow {
                    start,
                    end: start + TimeDelta::days(i64::from(duration)),
                }
            })
            .collect()
    }

    /// Generates every trip over the configured date range.
    pub fn generate(&mut self) -> Vec<TripRecord> {
        let windows = self.construction_windows();
        let mut trips = Vec::new();

        for day in 0..self.config.days {
            let date = self.config.start + TimeDelta::days(i64::from(day));
            let count = self.trips_per_day.sample(&mut self.rng);
            for _ in 0..count {
                let hour = self
                    .rng
                    .random_range(FIRST_DEPARTURE_HOUR..=LAST_DEPARTURE_HOUR);
                let trip_id = format!("T{}", trips.len() + 1);
                trips.push(self.trip(trip_id, date, hour, &windows));
            }
        }

        info!(
            route = %self.config.route_id,
            trips = trips.len(),
            "transit generation complete"
        );
        trips
    }

    fn trip(
        &mut self,
        trip_id: String,
        date: NaiveDate,
        hour: u32,
        windows: &[ConstructionWindow],
    ) -> TripRecord {
        let start_time = date.and_time(NaiveTime::default()) + TimeDelta::hours(i64::from(hour));
        let weekday = start_time.weekday();
        let is_weekend = is_weekend_day(weekday);
        let is_peak = is_peak_hour(hour);
        let is_holiday = self.config.holidays.contains(&date);
        let construction = windows.iter().any(|w| w.contains(start_time));

        let base = self.config.base_transit_min;
        let mut transit = base;
        if is_weekend {
            transit *= 0.9;
        }
        if is_peak {
            transit += self.rng.random_range(8.0..18.0);
        }
        if is_holiday {
            transit += self.rng.random_range(5.0..15.0);
        }
        if construction {
            transit += self.rng.random_range(15.0..30.0);
        }
        transit += self.noise.sample(&mut self.rng);
        if self.rng.random_bool(EXTREME_EVENT_PROBABILITY) {
            transit += self.rng.random_range(20.0..45.0);
        }
        let transit = ((transit * 10.0).round() / 10.0).max(MIN_TRANSIT_MIN);

        TripRecord {
            trip_id,
            route_id: self.config.route_id.clone(),
            start_time,
            day_of_week: weekday.num_days_from_monday(),
            hour_of_day: hour,
            is_weekend,
            is_peak_hour: is_peak,
            is_holiday,
            construction_active: construction,
            base_time_min: base,
            transit_time_min: transit,
        }
    }
}
