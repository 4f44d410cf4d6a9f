//! Built-in station personalities.
//!
//! Every personality is a configuration value (an hourly table, a daily
//! demand rule, and noise coefficients) fed to the one [`StationSimulator`]
//! type. New stations are new rows here, not new types.
//!
//! [`StationSimulator`]: super::simulator::StationSimulator

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::noise::{Jitter, NoiseModel, SpikeRange};
use super::profile::{
    DailyStats, DemandProfile, FittedDemand, HourlyWeights, WEEKEND_MULTIPLIER_FALLBACK,
};
use crate::error::{Result, SimError};

/// Demand curve plus noise coefficients for one station.
#[derive(Debug, Clone)]
pub struct StationProfile {
    pub demand: DemandProfile,
    pub noise: NoiseModel,
}

/// Named station configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Personality {
    /// Busy station fitted to historical sales; strong evening peak.
    HighVolume,
    /// Hand-tuned rates with a mild weekend dip.
    Balanced,
    /// Small station with bursty traffic and a slight weekend lift.
    LowVolume,
    /// Dispenser feed used for the historical dataset: absolute jitter, large spikes.
    Dispenser,
    /// Fitted station with pronounced commute peaks.
    Commuter,
    /// Fitted station without intra-hour oscillation.
    Steady,
    /// Fitted station peaking late afternoon.
    EveningPeak,
}

type Bands = &'static [(RangeInclusive<u32>, f64)];

const HIGH_VOLUME_WEIGHTS: Bands = &[
    (0..=5, 0.03),
    (6..=10, 0.06),
    (11..=16, 0.045),
    (17..=22, 0.07),
    (23..=23, 0.04),
];

const COMMUTER_WEIGHTS: Bands = &[
    (0..=5, 0.025),
    (6..=10, 0.065),
    (11..=16, 0.045),
    (17..=22, 0.075),
    (23..=23, 0.035),
];

const EVENING_PEAK_WEIGHTS: Bands = &[
    (0..=5, 0.02),
    (6..=9, 0.07),
    (10..=15, 0.05),
    (16..=19, 0.08),
    (20..=22, 0.06),
    (23..=23, 0.04),
];

// kg/min by hour
const BALANCED_RATES: Bands = &[
    (0..=4, 0.5),
    (5..=8, 1.4),
    (9..=15, 1.0),
    (16..=20, 1.7),
    (21..=23, 0.8),
];

const LOW_VOLUME_RATES: Bands = &[
    (0..=5, 0.6),
    (6..=9, 1.5),
    (10..=15, 1.1),
    (16..=19, 1.8),
    (20..=22, 1.3),
    (23..=23, 0.8),
];

const DISPENSER_RATES: Bands = &[
    (0..=5, 3.0),
    (6..=10, 12.0),
    (11..=16, 7.0),
    (17..=22, 15.0),
    (23..=23, 7.0),
];

const HEAVY_VEHICLE_SPIKE: SpikeRange = SpikeRange::Absolute {
    low: 1.5,
    high: 3.5,
};

/// How a personality arrives at its day total.
enum DailyRule {
    Rates { weekend_multiplier: f64 },
    Fitted {
        spread: f64,
        floor_fraction: f64,
        /// Weekend multiplier when history has no usable weekday demand.
        weekend_fallback: f64,
    },
}

struct Recipe {
    bands: Bands,
    daily: DailyRule,
    noise: NoiseModel,
}

impl Personality {
    pub const ALL: [Self; 7] = [
        Self::HighVolume,
        Self::Balanced,
        Self::LowVolume,
        Self::Dispenser,
        Self::Commuter,
        Self::Steady,
        Self::EveningPeak,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::HighVolume => "high_volume",
            Self::Balanced => "balanced",
            Self::LowVolume => "low_volume",
            Self::Dispenser => "dispenser",
            Self::Commuter => "commuter",
            Self::Steady => "steady",
            Self::EveningPeak => "evening_peak",
        }
    }

    /// Weekend multiplier used when fitting statistics from history without
    /// usable weekday demand.
    pub fn weekend_fallback(self) -> f64 {
        match self.recipe().daily {
            DailyRule::Fitted {
                weekend_fallback, ..
            } => weekend_fallback,
            DailyRule::Rates { .. } => WEEKEND_MULTIPLIER_FALLBACK,
        }
    }

    /// Whether the personality needs [`DailyStats`] to build its profile.
    pub fn is_fitted(self) -> bool {
        matches!(self.recipe().daily, DailyRule::Fitted { .. })
    }

    /// Builds the station profile.
    ///
    /// # Errors
    ///
    /// Fitted personalities return [`SimError::InvalidProfile`] when `stats`
    /// is `None`. Table personalities ignore `stats`.
    pub fn profile(self, stats: Option<DailyStats>) -> Result<StationProfile> {
        let recipe = self.recipe();
        let demand = match recipe.daily {
            DailyRule::Rates { weekend_multiplier } => {
                DemandProfile::from_hourly_rates(recipe.bands, weekend_multiplier)?
            }
            DailyRule::Fitted {
                spread,
                floor_fraction,
                ..
            } => {
                let stats = stats.ok_or_else(|| {
                    SimError::InvalidProfile(format!(
                        "personality \"{}\" needs daily statistics",
                        self.name()
                    ))
                })?;
                DemandProfile::fitted(
                    HourlyWeights::from_bands(recipe.bands)?,
                    FittedDemand::new(stats, spread, floor_fraction)?,
                )
            }
        };
        Ok(StationProfile {
            demand,
            noise: recipe.noise,
        })
    }

    fn recipe(self) -> Recipe {
        match self {
            Self::HighVolume => Recipe {
                bands: HIGH_VOLUME_WEIGHTS,
                daily: DailyRule::Fitted {
                    spread: 0.25,
                    floor_fraction: 0.6,
                    weekend_fallback: WEEKEND_MULTIPLIER_FALLBACK,
                },
                noise: NoiseModel {
                    wave_coefficient: 0.08,
                    jitter: Jitter::Proportional(0.12),
                    spike_probability: 0.002,
                    spike: HEAVY_VEHICLE_SPIKE,
                    floor: 0.1,
                },
            },
            Self::Balanced => Recipe {
                bands: BALANCED_RATES,
                daily: DailyRule::Rates {
                    weekend_multiplier: 0.92,
                },
                noise: NoiseModel {
                    wave_coefficient: 0.07,
                    jitter: Jitter::Proportional(0.10),
                    spike_probability: 0.0015,
                    spike: SpikeRange::Relative {
                        low: 0.8,
                        high: 1.5,
                    },
                    floor: 0.3,
                },
            },
            Self::LowVolume => Recipe {
                bands: LOW_VOLUME_RATES,
                daily: DailyRule::Rates {
                    weekend_multiplier: 1.05,
                },
                noise: NoiseModel {
                    wave_coefficient: 0.12,
                    jitter: Jitter::Proportional(0.15),
                    spike_probability: 0.003,
                    spike: SpikeRange::Relative {
                        low: 0.7,
                        high: 2.0,
                    },
                    floor: 0.4,
                },
            },
            Self::Dispenser => Recipe {
                bands: DISPENSER_RATES,
                daily: DailyRule::Rates {
                    weekend_multiplier: 0.8,
                },
                noise: NoiseModel {
                    wave_coefficient: 0.0,
                    jitter: Jitter::Absolute(0.7),
                    spike_probability: 0.004,
                    spike: SpikeRange::Absolute {
                        low: 4.0,
                        high: 9.0,
                    },
                    floor: 0.3,
                },
            },
            Self::Commuter => Recipe {
                bands: COMMUTER_WEIGHTS,
                daily: DailyRule::Fitted {
                    spread: 0.4,
                    floor_fraction: 0.6,
                    weekend_fallback: 0.9,
                },
                noise: NoiseModel {
                    wave_coefficient: 0.08,
                    jitter: Jitter::Proportional(0.12),
                    spike_probability: 0.002,
                    spike: HEAVY_VEHICLE_SPIKE,
                    floor: 0.1,
                },
            },
            Self::Steady => Recipe {
                bands: HIGH_VOLUME_WEIGHTS,
                daily: DailyRule::Fitted {
                    spread: 0.4,
                    floor_fraction: 0.6,
                    weekend_fallback: WEEKEND_MULTIPLIER_FALLBACK,
                },
                noise: NoiseModel {
                    wave_coefficient: 0.0,
                    jitter: Jitter::Proportional(0.15),
                    spike_probability: 0.002,
                    spike: HEAVY_VEHICLE_SPIKE,
                    floor: 0.1,
                },
            },
            Self::EveningPeak => Recipe {
                bands: EVENING_PEAK_WEIGHTS,
                daily: DailyRule::Fitted {
                    spread: 0.35,
                    floor_fraction: 0.65,
                    weekend_fallback: WEEKEND_MULTIPLIER_FALLBACK,
                },
                noise: NoiseModel {
                    wave_coefficient: 0.1,
                    jitter: Jitter::Proportional(0.15),
                    spike_probability: 0.003,
                    spike: SpikeRange::Absolute {
                        low: 1.0,
                        high: 4.0,
                    },
                    floor: 0.1,
                },
            },
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                format!("unknown personality \"{s}\", available: {}", names.join(", "))
            })
    }
}
