//! Hour-of-day demand curves and daily demand totals.
//!
//! A [`DemandProfile`] splits a day's total demand across 24 hours using a
//! normalized [`HourlyWeights`] table. The day total is either fixed
//! (hand-authored stations) or drawn from a Normal fitted to historical
//! daily sales (see [`DailyStats`]).

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

use crate::error::{Result, SimError};

/// Hours in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Minutes in one hour; hourly allocations are spread evenly over them.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Default weekend multiplier when historical weekday demand is zero or undefined.
pub const WEEKEND_MULTIPLIER_FALLBACK: f64 = 1.0;

/// Hour-of-day weights normalized to sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyWeights([f64; HOURS_PER_DAY]);

impl HourlyWeights {
    /// Normalizes a raw 24-entry table.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidProfile`] if any weight is negative or
    /// non-finite, or if all weights are zero.
    pub fn normalized(raw: [f64; HOURS_PER_DAY]) -> Result<Self> {
        if raw.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SimError::InvalidProfile(
                "hourly weights must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(SimError::InvalidProfile(
                "hourly weights must not all be zero".to_string(),
            ));
        }
        Ok(Self(raw.map(|w| w / total)))
    }

    /// Builds normalized weights from inclusive hour bands.
    ///
    /// # Errors
    ///
    /// Fails if the bands leave an hour uncovered, name an hour past 23,
    /// or carry invalid weights.
    pub fn from_bands(bands: &[(RangeInclusive<u32>, f64)]) -> Result<Self> {
        Self::normalized(band_table(bands)?)
    }

    /// Weight for `hour` (0–23).
    pub fn weight(&self, hour: u32) -> f64 {
        self.0[hour as usize % HOURS_PER_DAY]
    }

    /// Sum of all weights; 1.0 up to rounding.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> &[f64; HOURS_PER_DAY] {
        &self.0
    }
}

/// Expands inclusive hour bands into a raw 24-entry table.
fn band_table(bands: &[(RangeInclusive<u32>, f64)]) -> Result<[f64; HOURS_PER_DAY]> {
    let mut raw = [f64::NAN; HOURS_PER_DAY];
    for (hours, weight) in bands {
        for hour in hours.clone() {
            let slot = raw.get_mut(hour as usize).ok_or_else(|| {
                SimError::InvalidProfile(format!("hour {hour} is outside 0..=23"))
            })?;
            *slot = *weight;
        }
    }
    if let Some(hour) = raw.iter().position(|w| w.is_nan()) {
        return Err(SimError::InvalidProfile(format!(
            "hour bands leave hour {hour} uncovered"
        )));
    }
    Ok(raw)
}

/// Daily demand statistics learned from historical sales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyStats {
    /// Mean total demand per day (kg).
    pub mean_daily: f64,
    /// Sample standard deviation of daily totals (kg).
    pub std_daily: f64,
    /// Ratio of weekend to weekday mean demand.
    pub weekend_multiplier: f64,
}

impl DailyStats {
    /// # Errors
    ///
    /// Returns [`SimError::InvalidProfile`] unless `mean_daily > 0`,
    /// `std_daily >= 0`, and `weekend_multiplier >= 0`, all finite. A zero
    /// multiplier describes a station closed at weekends.
    pub fn new(mean_daily: f64, std_daily: f64, weekend_multiplier: f64) -> Result<Self> {
        if !(mean_daily.is_finite() && mean_daily > 0.0) {
            return Err(SimError::InvalidProfile(format!(
                "mean_daily must be > 0, got {mean_daily}"
            )));
        }
        if !(std_daily.is_finite() && std_daily >= 0.0) {
            return Err(SimError::InvalidProfile(format!(
                "std_daily must be >= 0, got {std_daily}"
            )));
        }
        if !(weekend_multiplier.is_finite() && weekend_multiplier >= 0.0) {
            return Err(SimError::InvalidProfile(format!(
                "weekend_multiplier must be >= 0, got {weekend_multiplier}"
            )));
        }
        Ok(Self {
            mean_daily,
            std_daily,
            weekend_multiplier,
        })
    }

    /// Fits statistics to dated daily totals.
    ///
    /// The standard deviation uses the `n - 1` denominator (zero for a single
    /// day). The weekend multiplier is `weekend_mean / weekday_mean`, falling
    /// back to `fallback` when either mean is missing or the weekday mean is
    /// not positive.
    ///
    /// # Errors
    ///
    /// Fails when `days` is empty or the fitted mean is not positive.
    pub fn from_daily_totals(days: &[(NaiveDate, f64)], fallback: f64) -> Result<Self> {
        let totals: Vec<f64> = days.iter().map(|(_, total)| *total).collect();
        let mean = mean(&totals).ok_or_else(|| {
            SimError::InvalidProfile("no daily totals to fit".to_string())
        })?;
        let std = if totals.len() > 1 {
            let ss: f64 = totals.iter().map(|t| (t - mean).powi(2)).sum();
            (ss / (totals.len() - 1) as f64).sqrt()
        } else {
            0.0
        };

        let (weekend, weekday): (Vec<&(NaiveDate, f64)>, Vec<&(NaiveDate, f64)>) = days
            .iter()
            .partition(|(date, _)| is_weekend_day(date.weekday()));
        let totals_of = |rows: Vec<&(NaiveDate, f64)>| -> Vec<f64> {
            rows.into_iter().map(|(_, total)| *total).collect()
        };

        let multiplier = weekend_multiplier(
            mean_or_nan(&totals_of(weekday)),
            mean_or_nan(&totals_of(weekend)),
            fallback,
        );
        Self::new(mean, std, multiplier)
    }
}

/// Ratio of weekend to weekday demand, guarded against zero or undefined denominators.
pub fn weekend_multiplier(weekday_mean: f64, weekend_mean: f64, fallback: f64) -> f64 {
    if weekday_mean.is_finite() && weekday_mean > 0.0 && weekend_mean.is_finite() {
        weekend_mean / weekday_mean
    } else {
        warn!(
            weekday_mean,
            weekend_mean,
            fallback,
            "weekend multiplier undefined, using fallback"
        );
        fallback
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn mean_or_nan(values: &[f64]) -> f64 {
    mean(values).unwrap_or(f64::NAN)
}

/// Saturday and Sunday.
pub fn is_weekend_day(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Day totals drawn from historical statistics.
///
/// Each draw is `Normal(mean_daily, std_daily * spread)`, scaled by the
/// weekend multiplier on weekends, then floored at `mean_daily * floor_fraction`.
#[derive(Debug, Clone, Copy)]
pub struct FittedDemand {
    stats: DailyStats,
    floor_fraction: f64,
    distribution: Normal<f64>,
}

impl FittedDemand {
    /// # Errors
    ///
    /// Fails if `spread` or `floor_fraction` is negative or non-finite.
    pub fn new(stats: DailyStats, spread: f64, floor_fraction: f64) -> Result<Self> {
        if !(floor_fraction.is_finite() && floor_fraction >= 0.0) {
            return Err(SimError::InvalidProfile(format!(
                "floor_fraction must be >= 0, got {floor_fraction}"
            )));
        }
        let distribution = Normal::new(stats.mean_daily, stats.std_daily * spread)
            .map_err(|e| SimError::InvalidProfile(format!("daily spread {spread}: {e}")))?;
        Ok(Self {
            stats,
            floor_fraction,
            distribution,
        })
    }

    pub fn stats(&self) -> &DailyStats {
        &self.stats
    }

    /// Lowest day total a draw can produce.
    pub fn floor(&self) -> f64 {
        self.stats.mean_daily * self.floor_fraction
    }

    fn sample<R: Rng + ?Sized>(&self, is_weekend: bool, rng: &mut R) -> f64 {
        let mut total = self.distribution.sample(rng);
        if is_weekend {
            total *= self.stats.weekend_multiplier;
        }
        total.max(self.floor())
    }
}

/// How a profile arrives at the day's total demand.
#[derive(Debug, Clone, Copy)]
pub enum DailyDemand {
    /// Hand-authored stations: a constant total, scaled on weekends.
    Fixed {
        total: f64,
        weekend_multiplier: f64,
    },
    /// Stations fitted to historical sales.
    Fitted(FittedDemand),
}

/// Baseline demand curve for one station.
#[derive(Debug, Clone)]
pub struct DemandProfile {
    weights: HourlyWeights,
    daily: DailyDemand,
}

impl DemandProfile {
    /// Profile with a constant day total.
    pub fn fixed(weights: HourlyWeights, total: f64, weekend_multiplier: f64) -> Self {
        Self {
            weights,
            daily: DailyDemand::Fixed {
                total: total.max(0.0),
                weekend_multiplier: weekend_multiplier.max(0.0),
            },
        }
    }

    /// Profile from per-minute flow rates given by hour band.
    ///
    /// The rates are kept exactly: the table is normalized and the day total
    /// becomes `60 * sum(rates)`, so `baseline(total, h)` returns the band rate.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`HourlyWeights::from_bands`].
    pub fn from_hourly_rates(
        bands: &[(RangeInclusive<u32>, f64)],
        weekend_multiplier: f64,
    ) -> Result<Self> {
        let raw = band_table(bands)?;
        let total = raw.iter().sum::<f64>() * MINUTES_PER_HOUR;
        Ok(Self::fixed(
            HourlyWeights::normalized(raw)?,
            total,
            weekend_multiplier,
        ))
    }

    /// Profile drawing its day total from fitted statistics.
    pub fn fitted(weights: HourlyWeights, demand: FittedDemand) -> Self {
        Self {
            weights,
            daily: DailyDemand::Fitted(demand),
        }
    }

    pub fn weights(&self) -> &HourlyWeights {
        &self.weights
    }

    pub fn daily(&self) -> &DailyDemand {
        &self.daily
    }

    /// Total demand for one day. Only fitted profiles consume randomness.
    pub fn day_total<R: Rng + ?Sized>(&self, is_weekend: bool, rng: &mut R) -> f64 {
        match &self.daily {
            DailyDemand::Fixed {
                total,
                weekend_multiplier,
            } => {
                if is_weekend {
                    total * weekend_multiplier
                } else {
                    *total
                }
            }
            DailyDemand::Fitted(fitted) => fitted.sample(is_weekend, rng),
        }
    }

    /// Per-minute baseline flow for `hour` given the day's total demand.
    pub fn baseline(&self, day_total: f64, hour: u32) -> f64 {
        (day_total * self.weights.weight(hour) / MINUTES_PER_HOUR).max(0.0)
    }
}
