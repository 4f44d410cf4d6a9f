//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::features::parse_timestamp;
use crate::station::Personality;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use one of the built-in presets.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Date range and master seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Stations to simulate, in registration order.
    #[serde(default)]
    pub stations: Vec<StationConfig>,
}

/// Date range and master seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Start of the simulated range, `YYYY-MM-DDTHH:MM:SS`.
    pub start: String,
    /// Number of days to simulate (must be > 0).
    pub days: u32,
    /// Master random seed; stations without their own seed derive one from it.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start: "2025-01-01T00:00:00".to_string(),
            days: 1,
            seed: 42,
        }
    }
}

/// One simulated station.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationConfig {
    /// Unique station id.
    pub id: String,
    /// Personality name, see [`Personality`].
    pub personality: String,
    /// Tank capacity (kg).
    pub capacity_kg: f64,
    /// Starting stock (kg); a full tank when omitted.
    pub initial_stock_kg: Option<f64>,
    /// Step spacing: `"fixed_minute"` or `"irregular"`.
    pub step: String,
    /// Shortest irregular interval (seconds).
    pub min_interval_secs: u32,
    /// Longest irregular interval (seconds).
    pub max_interval_secs: u32,
    /// Refill policy: `"automatic"` or `"manual"`.
    pub refill: String,
    /// Automatic refill fires when stock drops below this (kg).
    pub refill_threshold_kg: f64,
    /// Quantity added by an automatic refill (kg).
    pub refill_amount_kg: f64,
    /// Station RNG seed; derived from the master seed when omitted.
    pub seed: Option<u64>,
    /// Historical daily statistics for fitted personalities.
    pub daily_stats: Option<DailyStatsConfig>,
    /// Historical daily sales CSV to fit statistics from.
    pub sales_csv: Option<PathBuf>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            id: "DBS_01".to_string(),
            personality: "dispenser".to_string(),
            capacity_kg: 6000.0,
            initial_stock_kg: None,
            step: "irregular".to_string(),
            min_interval_secs: 1,
            max_interval_secs: 60,
            refill: "automatic".to_string(),
            refill_threshold_kg: 800.0,
            refill_amount_kg: 5000.0,
            seed: None,
            daily_stats: None,
            sales_csv: None,
        }
    }
}

/// Daily demand statistics given directly in the scenario.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyStatsConfig {
    pub mean_daily: f64,
    pub std_daily: f64,
    #[serde(default = "default_weekend_multiplier")]
    pub weekend_multiplier: f64,
}

fn default_weekend_multiplier() -> f64 {
    crate::station::profile::WEEKEND_MULTIPLIER_FALLBACK
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"stations[0].capacity_kg"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Single dispenser feed with irregular intervals and automatic refill.
    pub fn dispenser() -> Self {
        Self {
            simulation: SimulationConfig {
                days: 7,
                ..SimulationConfig::default()
            },
            stations: vec![StationConfig {
                initial_stock_kg: Some(6000.0),
                ..StationConfig::default()
            }],
        }
    }

    /// Real-time feed: three one-minute stations refilled by hand.
    pub fn scada() -> Self {
        let station = |id: &str, personality: &str| StationConfig {
            id: id.to_string(),
            personality: personality.to_string(),
            step: "fixed_minute".to_string(),
            refill: "manual".to_string(),
            ..StationConfig::default()
        };
        Self {
            simulation: SimulationConfig::default(),
            stations: vec![
                StationConfig {
                    daily_stats: Some(DailyStatsConfig {
                        mean_daily: 4200.0,
                        std_daily: 600.0,
                        weekend_multiplier: 0.9,
                    }),
                    ..station("STN_A", "high_volume")
                },
                station("STN_B", "balanced"),
                station("STN_C", "low_volume"),
            ],
        }
    }

    /// Minute-level stations fitted to historical daily sales.
    pub fn fitted() -> Self {
        let station = |id: &str, personality: &str, capacity: f64, stats: DailyStatsConfig| {
            StationConfig {
                id: id.to_string(),
                personality: personality.to_string(),
                capacity_kg: capacity,
                step: "fixed_minute".to_string(),
                refill: "manual".to_string(),
                daily_stats: Some(stats),
                ..StationConfig::default()
            }
        };
        Self {
            simulation: SimulationConfig {
                days: 7,
                ..SimulationConfig::default()
            },
            stations: vec![
                station(
                    "1000000471",
                    "commuter",
                    6000.0,
                    DailyStatsConfig {
                        mean_daily: 3100.0,
                        std_daily: 420.0,
                        weekend_multiplier: 0.9,
                    },
                ),
                station(
                    "1000000518",
                    "steady",
                    6000.0,
                    DailyStatsConfig {
                        mean_daily: 2600.0,
                        std_daily: 380.0,
                        weekend_multiplier: 0.95,
                    },
                ),
                station(
                    "1000000523",
                    "evening_peak",
                    7000.0,
                    DailyStatsConfig {
                        mean_daily: 3800.0,
                        std_daily: 510.0,
                        weekend_multiplier: 1.0,
                    },
                ),
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["dispenser", "scada", "fitted"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "dispenser" => Ok(Self::dispenser()),
            "scada" => Ok(Self::scada()),
            "fitted" => Ok(Self::fitted()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parsed simulation start.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `simulation.start` is not a valid timestamp.
    pub fn start(&self) -> Result<NaiveDateTime, ConfigError> {
        parse_timestamp(&self.simulation.start)
            .map_err(|e| ConfigError::new("simulation.start", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if let Err(e) = self.start() {
            errors.push(e);
        }
        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if self.stations.is_empty() {
            errors.push(ConfigError::new("stations", "at least one station is required"));
        }

        let mut seen = HashSet::new();
        for (i, st) in self.stations.iter().enumerate() {
            let field = |name: &str| format!("stations[{i}].{name}");

            if st.id.trim().is_empty() {
                errors.push(ConfigError::new(field("id"), "must not be empty"));
            } else if !seen.insert(st.id.as_str()) {
                errors.push(ConfigError::new(
                    field("id"),
                    format!("duplicate station id \"{}\"", st.id),
                ));
            }

            match st.personality.parse::<Personality>() {
                Ok(p) if p.is_fitted() && st.daily_stats.is_none() && st.sales_csv.is_none() => {
                    errors.push(ConfigError::new(
                        field("personality"),
                        format!("\"{p}\" needs daily_stats or sales_csv"),
                    ));
                }
                Ok(_) => {}
                Err(message) => errors.push(ConfigError::new(field("personality"), message)),
            }

            if !is_positive(st.capacity_kg) {
                errors.push(ConfigError::new(field("capacity_kg"), "must be > 0"));
            }
            if let Some(initial) = st.initial_stock_kg {
                if !(0.0..=st.capacity_kg).contains(&initial) {
                    errors.push(ConfigError::new(
                        field("initial_stock_kg"),
                        "must be in [0, capacity_kg]",
                    ));
                }
            }

            match st.step.as_str() {
                "fixed_minute" => {}
                "irregular" => {
                    if st.min_interval_secs == 0 {
                        errors.push(ConfigError::new(field("min_interval_secs"), "must be >= 1"));
                    }
                    if st.min_interval_secs > st.max_interval_secs {
                        errors.push(ConfigError::new(
                            field("min_interval_secs"),
                            "must be <= max_interval_secs",
                        ));
                    }
                }
                other => errors.push(ConfigError::new(
                    field("step"),
                    format!("must be \"fixed_minute\" or \"irregular\", got \"{other}\""),
                )),
            }

            match st.refill.as_str() {
                "manual" => {}
                "automatic" => {
                    if !is_positive(st.refill_threshold_kg)
                        || st.refill_threshold_kg >= st.capacity_kg
                    {
                        errors.push(ConfigError::new(
                            field("refill_threshold_kg"),
                            "must be in (0, capacity_kg)",
                        ));
                    }
                    if st.refill_amount_kg.is_nan()
                        || st.refill_amount_kg < st.refill_threshold_kg
                    {
                        errors.push(ConfigError::new(
                            field("refill_amount_kg"),
                            "must be >= refill_threshold_kg",
                        ));
                    }
                }
                other => errors.push(ConfigError::new(
                    field("refill"),
                    format!("must be \"automatic\" or \"manual\", got \"{other}\""),
                )),
            }

            if let Some(stats) = st.daily_stats {
                if !is_positive(stats.mean_daily) {
                    errors.push(ConfigError::new(field("daily_stats.mean_daily"), "must be > 0"));
                }
                if !is_non_negative(stats.std_daily) {
                    errors.push(ConfigError::new(field("daily_stats.std_daily"), "must be >= 0"));
                }
                if !is_non_negative(stats.weekend_multiplier) {
                    errors.push(ConfigError::new(
                        field("daily_stats.weekend_multiplier"),
                        "must be >= 0",
                    ));
                }
            }
        }

        errors
    }
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn is_non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}
