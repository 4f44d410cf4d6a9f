//! Turns a validated [`ScenarioConfig`] into running station simulators.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::config::{ConfigError, ScenarioConfig, StationConfig};
use crate::error::Result;
use crate::io::sales::read_daily_totals;
use crate::sim::batch::BatchGenerator;
use crate::sim::clock::StepInterval;
use crate::sim::registry::MultiStationRegistry;
use crate::station::{DailyStats, Personality, RefillPolicy, StationSimulator, TankState};

/// Spacing between derived per-station seeds.
pub const STATION_SEED_STRIDE: u64 = 57;

/// Seed for the station at `index` when it has none of its own.
pub fn station_seed(master: u64, index: usize) -> u64 {
    master.wrapping_add(STATION_SEED_STRIDE.wrapping_mul(index as u64))
}

/// A loaded scenario: stations ready to step plus the batch range.
#[derive(Debug)]
pub struct Scenario {
    pub registry: MultiStationRegistry,
    pub batch: BatchGenerator,
}

impl Scenario {
    /// Validates `config` and builds every station in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or any error raised while reading
    /// a station's sales history or constructing its simulator.
    pub fn build(config: &ScenarioConfig) -> Result<Self> {
        if let Some(err) = config.validate().into_iter().next() {
            return Err(err.into());
        }
        let start = config.start()?;

        let mut registry = MultiStationRegistry::new();
        for (i, station) in config.stations.iter().enumerate() {
            let seed = station
                .seed
                .unwrap_or_else(|| station_seed(config.simulation.seed, i));
            registry.add(build_station(station, start, seed, i)?)?;
        }

        Ok(Self {
            registry,
            batch: BatchGenerator::new(start, config.simulation.days),
        })
    }
}

fn build_station(
    cfg: &StationConfig,
    start: NaiveDateTime,
    seed: u64,
    index: usize,
) -> Result<StationSimulator> {
    let field = |name: &str| format!("stations[{index}].{name}");

    let personality: Personality = cfg.personality.parse().map_err(|message| ConfigError {
        field: field("personality"),
        message,
    })?;

    let stats = match (&cfg.daily_stats, &cfg.sales_csv) {
        (Some(s), _) => Some(DailyStats::new(
            s.mean_daily,
            s.std_daily,
            s.weekend_multiplier,
        )?),
        (None, Some(path)) => Some(DailyStats::from_daily_totals(
            &read_daily_totals(path)?,
            personality.weekend_fallback(),
        )?),
        (None, None) => None,
    };

    let tank = match cfg.initial_stock_kg {
        Some(initial) => TankState::new(cfg.capacity_kg, initial)?,
        None => TankState::full(cfg.capacity_kg)?,
    };

    let policy = match cfg.refill.as_str() {
        "manual" => RefillPolicy::Manual,
        _ => RefillPolicy::Automatic {
            threshold: cfg.refill_threshold_kg,
            amount: cfg.refill_amount_kg,
        },
    };

    let interval = match cfg.step.as_str() {
        "fixed_minute" => StepInterval::FixedMinute,
        _ => StepInterval::Irregular {
            min_secs: cfg.min_interval_secs,
            max_secs: cfg.max_interval_secs,
        },
    };

    debug!(station = %cfg.id, %personality, seed, "station configured");
    StationSimulator::new(
        cfg.id.clone(),
        personality.profile(stats)?,
        tank,
        policy,
        interval,
        start,
        seed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn derived_seeds_are_distinct() {
        assert_eq!(station_seed(42, 0), 42);
        assert_eq!(station_seed(42, 1), 42 + STATION_SEED_STRIDE);
        assert_eq!(station_seed(u64::MAX, 1), STATION_SEED_STRIDE - 1);
    }

    #[test]
    fn every_preset_builds() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).unwrap();
            let scenario = Scenario::build(&cfg).unwrap();
            assert_eq!(scenario.registry.len(), cfg.stations.len());
            assert_eq!(scenario.batch.start(), cfg.start().unwrap());
        }
    }

    #[test]
    fn scada_preset_uses_manual_minute_stations() {
        let scenario = Scenario::build(&ScenarioConfig::scada()).unwrap();
        let ids: Vec<&str> = scenario.registry.ids().collect();
        assert_eq!(ids, ["STN_A", "STN_B", "STN_C"]);
        for id in ids {
            let station = scenario.registry.get(id).unwrap();
            assert_eq!(station.policy(), RefillPolicy::Manual);
            assert_eq!(station.interval(), StepInterval::FixedMinute);
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let mut cfg = ScenarioConfig::dispenser();
        cfg.simulation.days = 0;
        let err = Scenario::build(&cfg).unwrap_err();
        assert!(matches!(err, SimError::Config(e) if e.field == "simulation.days"));
    }

    #[test]
    fn explicit_seed_wins() {
        let mut a = ScenarioConfig::dispenser();
        a.stations[0].seed = Some(11);
        let mut b = ScenarioConfig::dispenser();
        b.simulation.seed = 999;
        b.stations[0].seed = Some(11);

        let mut ra = Scenario::build(&a).unwrap().registry;
        let mut rb = Scenario::build(&b).unwrap().registry;
        assert_eq!(ra.next_all(), rb.next_all());
    }

    #[test]
    fn missing_sales_file_is_an_io_error() {
        let mut cfg = ScenarioConfig::scada();
        cfg.stations[0].daily_stats = None;
        cfg.stations[0].sales_csv = Some("does/not/exist.csv".into());
        assert!(matches!(
            Scenario::build(&cfg),
            Err(SimError::Csv(_) | SimError::Io(_))
        ));
    }
}
