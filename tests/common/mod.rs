//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use station_flow_sim::sim::clock::StepInterval;
use station_flow_sim::station::{
    DailyStats, Personality, RefillPolicy, StationSimulator, TankState,
};

/// Refill threshold used by the dispenser fixtures (kg).
pub const THRESHOLD_KG: f64 = 800.0;

/// Automatic refill quantity used by the dispenser fixtures (kg).
pub const REFILL_KG: f64 = 5000.0;

/// Default simulation start (Wednesday 2025-01-01, midnight).
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start timestamp")
}

/// Daily statistics resembling a mid-sized fitted station.
pub fn fitted_stats() -> DailyStats {
    DailyStats::new(3100.0, 420.0, 0.9).expect("valid daily stats")
}

/// Dispenser feed: 6000 kg tank, full, automatic refill 800/5000.
pub fn dispenser(id: &str, seed: u64, interval: StepInterval) -> StationSimulator {
    station(
        id,
        Personality::Dispenser,
        TankState::new(6000.0, 6000.0).expect("valid tank"),
        RefillPolicy::Automatic {
            threshold: THRESHOLD_KG,
            amount: REFILL_KG,
        },
        interval,
        seed,
    )
}

/// Any personality on a full tank with the given policy.
pub fn station(
    id: &str,
    personality: Personality,
    tank: TankState,
    policy: RefillPolicy,
    interval: StepInterval,
    seed: u64,
) -> StationSimulator {
    let stats = personality.is_fitted().then(fitted_stats);
    let profile = personality.profile(stats).expect("valid personality profile");
    StationSimulator::new(id, profile, tank, policy, interval, start(), seed)
        .expect("valid station")
}
