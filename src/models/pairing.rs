//! Pairing model.
//!
//! A pairing is the exclusive association between one worker and one order
//! at the same station, from the moment both are marked busy until its
//! completion fires.

use serde::{Deserialize, Serialize};

use super::{OrderId, Stage, WorkerId};

/// An active worker-order pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    /// Paired order.
    pub order: OrderId,
    /// Paired worker.
    pub worker: WorkerId,
    /// Station where the work happens.
    pub stage: Stage,
    /// Start time (time units).
    pub started_at: u64,
    /// Processing duration (time units). Always non-zero.
    pub duration: u64,
}

impl Pairing {
    /// Completion time (time units), saturating at `u64::MAX`.
    #[inline]
    pub fn ends_at(&self) -> u64 {
        self.started_at.saturating_add(self.duration)
    }
}

/// Result of a pairing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingOutcome {
    /// Both parties are now busy and the pairing must be put on the clock.
    Started(Pairing),
    /// Either party is busy, or they are at different stages.
    Ineligible,
    /// Duration came out as zero; nothing was started.
    Deferred,
}

impl PairingOutcome {
    /// The started pairing, if any.
    pub fn started(self) -> Option<Pairing> {
        match self {
            PairingOutcome::Started(pairing) => Some(pairing),
            _ => None,
        }
    }
}
