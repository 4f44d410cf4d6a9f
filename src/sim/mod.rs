/// Multi-day batch generation.
pub mod batch;
/// Calendar features derived from timestamps.
pub mod calendar;
/// Simulation clock and step spacing.
pub mod clock;
/// Station-id keyed collection of simulators.
pub mod registry;
pub mod types;
