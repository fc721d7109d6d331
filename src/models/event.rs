//! Observable kitchen events.
//!
//! These are the only facts the engine exposes to its surroundings; logging
//! and reporting are built on top of them.

use serde::{Deserialize, Serialize};

use super::{OrderId, Stage, WorkerId};

/// Something observable happened in the kitchen.
///
/// All times are in simulation time units since the start of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum KitchenEvent {
    /// A worker started processing an order.
    PairingStarted {
        order: OrderId,
        worker: WorkerId,
        stage: Stage,
        duration: u64,
        at: u64,
    },
    /// An order had no work at a station and moved on without a worker.
    StagePassed { order: OrderId, stage: Stage, at: u64 },
    /// An order reached `Done`.
    OrderDone { order: OrderId, elapsed: u64, at: u64 },
    /// Every order reached `Done`. Emitted once per run.
    AllDone { elapsed: u64 },
}

impl KitchenEvent {
    /// Order this event concerns, if any.
    pub fn order(&self) -> Option<OrderId> {
        match self {
            KitchenEvent::PairingStarted { order, .. }
            | KitchenEvent::StagePassed { order, .. }
            | KitchenEvent::OrderDone { order, .. } => Some(*order),
            KitchenEvent::AllDone { .. } => None,
        }
    }
}
