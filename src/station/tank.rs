use chrono::NaiveDateTime;

use crate::error::{Result, SimError};

/// A station's storage tank.
///
/// `TankState` tracks the stock held against a fixed capacity. Every
/// transition clamps the result into `[0, capacity]`; underflow and
/// overflow are never reported as errors.
///
/// # Transitions
/// - [`deplete`](Self::deplete): consumption on every simulated step
/// - [`refill`](Self::refill): add stock, capped at capacity
/// - [`reset`](Self::reset): overwrite stock (sensor recalibration)
#[derive(Debug, Clone)]
pub struct TankState {
    /// Tank capacity in kilograms.
    capacity: f64,

    /// Stock currently held, in kilograms.
    current_stock: f64,

    /// Timestamp of the most recent observation.
    last_timestamp: Option<NaiveDateTime>,
}

impl TankState {
    /// Creates a tank holding `initial_stock` (clamped into `[0, capacity]`).
    ///
    /// # Arguments
    ///
    /// * `capacity` - Tank capacity in kg (must be finite and > 0)
    /// * `initial_stock` - Starting stock in kg
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidTank`] if the capacity is not positive or
    /// the initial stock is not finite.
    pub fn new(capacity: f64, initial_stock: f64) -> Result<Self> {
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(SimError::InvalidTank(format!(
                "capacity must be > 0, got {capacity}"
            )));
        }
        if !initial_stock.is_finite() {
            return Err(SimError::InvalidTank(format!(
                "initial stock must be finite, got {initial_stock}"
            )));
        }
        Ok(Self {
            capacity,
            current_stock: initial_stock.clamp(0.0, capacity),
            last_timestamp: None,
        })
    }

    /// Creates a full tank.
    pub fn full(capacity: f64) -> Result<Self> {
        Self::new(capacity, capacity)
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn current_stock(&self) -> f64 {
        self.current_stock
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.last_timestamp
    }

    /// Removes `quantity` kg, stopping at empty. Returns the new stock.
    pub fn deplete(&mut self, quantity: f64) -> f64 {
        self.set_clamped(self.current_stock - quantity.max(0.0))
    }

    /// Adds `amount` kg, stopping at capacity. Returns the new stock.
    pub fn refill(&mut self, amount: f64) -> f64 {
        self.set_clamped(self.current_stock + amount.max(0.0))
    }

    /// Overwrites the stock with `new_amount`, clamped into `[0, capacity]`.
    pub fn reset(&mut self, new_amount: f64) -> f64 {
        self.set_clamped(new_amount)
    }

    /// Records an observation time; earlier timestamps never move it back.
    pub fn observe(&mut self, timestamp: NaiveDateTime) {
        self.last_timestamp = Some(match self.last_timestamp {
            Some(last) if last > timestamp => last,
            _ => timestamp,
        });
    }

    fn set_clamped(&mut self, stock: f64) -> f64 {
        // NaN input leaves the stock unchanged
        if !stock.is_nan() {
            self.current_stock = stock.clamp(0.0, self.capacity);
        }
        self.current_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_new_tank() {
        let tank = TankState::new(6000.0, 4500.0).unwrap();
        assert_eq!(tank.capacity(), 6000.0);
        assert_eq!(tank.current_stock(), 4500.0);
        assert!(tank.last_timestamp().is_none());
        assert_eq!(TankState::full(7000.0).unwrap().current_stock(), 7000.0);
    }

    #[test]
    fn test_initial_stock_is_clamped() {
        assert_eq!(TankState::new(100.0, 150.0).unwrap().current_stock(), 100.0);
        assert_eq!(TankState::new(100.0, -3.0).unwrap().current_stock(), 0.0);
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(TankState::new(0.0, 0.0).is_err());
        assert!(TankState::new(-10.0, 0.0).is_err());
        assert!(TankState::new(f64::NAN, 0.0).is_err());
        assert!(TankState::new(10.0, f64::NAN).is_err());
    }

    #[test]
    fn test_deplete_stops_at_empty() {
        let mut tank = TankState::new(100.0, 10.0).unwrap();
        assert_eq!(tank.deplete(4.0), 6.0);
        assert_eq!(tank.deplete(50.0), 0.0);
        assert_eq!(tank.deplete(1.0), 0.0);
    }

    #[test]
    fn test_refill_stops_at_capacity() {
        let mut tank = TankState::new(6000.0, 900.0).unwrap();
        assert_eq!(tank.refill(5000.0), 5900.0);
        assert_eq!(tank.refill(5000.0), 6000.0);
    }

    #[test]
    fn test_reset_overrides_and_clamps() {
        let mut tank = TankState::new(6000.0, 100.0).unwrap();
        assert_eq!(tank.reset(3200.0), 3200.0);
        assert_eq!(tank.reset(9000.0), 6000.0);
        assert_eq!(tank.reset(-1.0), 0.0);
    }

    #[test]
    fn test_stock_stays_within_bounds_for_any_sequence() {
        let mut tank = TankState::new(500.0, 250.0).unwrap();
        let ops: [(u8, f64); 12] = [
            (0, 120.0),
            (1, 900.0),
            (0, 1e6),
            (2, 420.0),
            (1, -50.0),
            (0, -80.0),
            (2, 1e9),
            (0, 33.3),
            (1, 12.5),
            (2, -7.0),
            (0, 0.0),
            (1, 499.9),
        ];
        for (op, amount) in ops {
            let stock = match op {
                0 => tank.deplete(amount),
                1 => tank.refill(amount),
                _ => tank.reset(amount),
            };
            assert!(
                (0.0..=500.0).contains(&stock),
                "stock {stock} out of range after op {op}({amount})"
            );
        }
    }

    #[test]
    fn test_observe_is_monotonic() {
        let mut tank = TankState::full(10.0).unwrap();
        tank.observe(at(10, 0));
        tank.observe(at(9, 0));
        assert_eq!(tank.last_timestamp(), Some(at(10, 0)));
        tank.observe(at(10, 1));
        assert_eq!(tank.last_timestamp(), Some(at(10, 1)));
    }
}
