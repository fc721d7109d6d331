//! Order (work item) model.
//!
//! An order flows through every station in sequence. Its stage only ever
//! advances, and it is busy exactly while it is paired with a worker.

use serde::{Deserialize, Serialize};

use super::Stage;

/// Unique order identifier, assigned at creation.
pub type OrderId = usize;

/// A pizza order moving through the kitchen.
///
/// # Time Representation
/// `created_at` is in simulation time units relative to the start of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Stable order identifier.
    pub id: OrderId,
    /// Topping count; scales the duration at per-topping stations.
    pub toppings: u32,
    /// Current stage.
    pub stage: Stage,
    /// Whether the order is currently paired with a worker.
    pub busy: bool,
    /// Creation time (time units).
    pub created_at: u64,
}

impl Order {
    /// Creates a free order at the first station, created at t=0.
    pub fn new(id: OrderId, toppings: u32) -> Self {
        Self {
            id,
            toppings,
            stage: Stage::FIRST,
            busy: false,
            created_at: 0,
        }
    }

    /// Sets the creation time.
    pub fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether the order has left the pipeline.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.stage.is_done()
    }

    /// Whether the order can start a pairing right now.
    #[inline]
    pub fn is_free(&self) -> bool {
        !self.busy && !self.is_done()
    }
}
