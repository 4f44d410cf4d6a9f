//! Records emitted by station simulators and administrative operations.

use std::fmt;

use chrono::NaiveDateTime;

use super::calendar::CalendarFeatures;

/// Snapshot of one simulated step for one station.
///
/// Records are immutable; the tank that produced them keeps the mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub timestamp: NaiveDateTime,
    pub station_id: String,
    /// Instantaneous flow rate (kg/min), strictly positive.
    pub flow_kg_min: f64,
    /// Quantity drawn from the tank this step: `flow * interval / 60` (kg).
    pub consumed_kg: f64,
    /// Stock after depletion and any refill fired this step (kg).
    pub stock_kg: f64,
    /// Whether a refill transition fired since the previous record.
    pub is_refill: bool,
    /// Seconds elapsed since the previous record of this station.
    pub interval_secs: u32,
    pub calendar: CalendarFeatures,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<12} | flow={:>7.3} kg/min  used={:>7.3} kg  stock={:>9.2} kg \
             | dt={:>2}s{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.station_id,
            self.flow_kg_min,
            self.consumed_kg,
            self.stock_kg,
            self.interval_secs,
            if self.is_refill { "  REFILL" } else { "" },
        )
    }
}

/// Administrative operation applied to a tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Refill,
    Reset,
}

/// Acknowledgement of a manual refill or reset.
#[derive(Debug, Clone, PartialEq)]
pub struct StockReceipt {
    pub station_id: String,
    pub action: AdminAction,
    /// Stock after the operation (kg).
    pub stock_kg: f64,
}

impl fmt::Display for StockReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            AdminAction::Refill => "refilled",
            AdminAction::Reset => "reset",
        };
        write!(f, "{} {verb} to {:.2} kg", self.station_id, self.stock_kg)
    }
}
