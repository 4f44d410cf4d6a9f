//! Synthetic fuel-station tank flow and refill simulator.
//!
//! Stations draw minute-level demand from an hourly profile plus noise,
//! deplete a bounded tank, and refill automatically or on request. The
//! batch generator produces historical datasets; the registry drives
//! stations step by step for real-time feeds.

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod scenario;
/// Clock, calendar, records, registry, and batch generation.
pub mod sim;
pub mod station;
pub mod transit;

pub use error::{Result, SimError};
