//! Per-station building blocks: demand curve, noise, tank, and the simulator that composes them.

/// Random perturbation of the baseline flow.
pub mod noise;
/// Built-in station configurations.
pub mod personality;
/// Hourly demand tables and daily totals.
pub mod profile;
pub mod simulator;
/// Tank stock with clamped transitions.
pub mod tank;

// Re-export the main types for convenience
pub use noise::{Jitter, NoiseModel, SpikeRange};
pub use personality::{Personality, StationProfile};
pub use profile::{DailyStats, DemandProfile, FittedDemand, HourlyWeights};
pub use simulator::{RefillPolicy, StationSimulator};
pub use tank::TankState;
