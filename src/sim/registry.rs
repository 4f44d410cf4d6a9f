use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::station::StationSimulator;

use super::types::{EventRecord, StockReceipt};

/// Station-id keyed collection of simulators.
///
/// Stations are kept in registration order; [`next_all`](Self::next_all)
/// and iteration follow that order. Operations on one station never touch
/// another station's tank or RNG.
#[derive(Debug, Default)]
pub struct MultiStationRegistry {
    stations: Vec<StationSimulator>,
    index: HashMap<String, usize>,
}

impl MultiStationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a simulator under its own id.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DuplicateStation`] if the id is already taken.
    pub fn add(&mut self, simulator: StationSimulator) -> Result<()> {
        let id = simulator.id().to_string();
        if self.index.contains_key(&id) {
            return Err(SimError::DuplicateStation(id));
        }
        self.index.insert(id, self.stations.len());
        self.stations.push(simulator);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(StationSimulator::id)
    }

    pub fn get(&self, station_id: &str) -> Option<&StationSimulator> {
        self.index.get(station_id).map(|&i| &self.stations[i])
    }

    /// Mutable access to every station, in registration order.
    pub fn stations_mut(&mut self) -> &mut [StationSimulator] {
        &mut self.stations
    }

    /// Advances one station by one step.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownStation`] if `station_id` is not registered.
    pub fn next_event(&mut self, station_id: &str) -> Result<EventRecord> {
        Ok(self.station_mut(station_id)?.next_event())
    }

    /// Advances every station by one step, one record per station.
    pub fn next_all(&mut self) -> Vec<EventRecord> {
        self.stations
            .iter_mut()
            .map(StationSimulator::next_event)
            .collect()
    }

    /// Manually refills one station.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownStation`] if `station_id` is not registered.
    pub fn refill(&mut self, station_id: &str, amount: f64) -> Result<StockReceipt> {
        Ok(self.station_mut(station_id)?.refill(amount))
    }

    /// Overwrites one station's stock.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownStation`] if `station_id` is not registered.
    pub fn reset(&mut self, station_id: &str, new_amount: f64) -> Result<StockReceipt> {
        Ok(self.station_mut(station_id)?.reset(new_amount))
    }

    fn station_mut(&mut self, station_id: &str) -> Result<&mut StationSimulator> {
        let i = *self
            .index
            .get(station_id)
            .ok_or_else(|| SimError::UnknownStation(station_id.to_string()))?;
        Ok(&mut self.stations[i])
    }
}
