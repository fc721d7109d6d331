//! Worker model.
//!
//! Workers are created once per station at startup and never destroyed.
//! They toggle between free and busy for the lifetime of the run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Stage;

/// Worker identity: station index plus slot within that station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId {
    /// Station the worker belongs to.
    pub station: usize,
    /// Slot index, unique within the station.
    pub slot: usize,
}

impl WorkerId {
    /// Creates a worker identifier.
    pub fn new(station: usize, slot: usize) -> Self {
        Self { station, slot }
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.station, self.slot)
    }
}

/// A reusable processing slot bound to one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Worker identity.
    pub id: WorkerId,
    /// Whether the worker is currently paired with an order.
    pub busy: bool,
}

impl Worker {
    /// Creates a free worker.
    pub fn new(id: WorkerId) -> Self {
        Self { id, busy: false }
    }

    /// Station this worker serves.
    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::Station(self.id.station)
    }
}
