//! Kitchen domain models.
//!
//! Provides the data types the scheduling engine works on: the stage table,
//! orders, workers, pairings, and the events the engine emits.
//!
//! # Domain Mappings
//!
//! | pizza-kitchen | Job shop | Generic pipeline |
//! |---------------|----------|------------------|
//! | Order | Job | Work item |
//! | Stage | Operation step | Pipeline stage |
//! | Worker | Machine | Worker slot |
//! | Pairing | Assignment | Active job |

mod event;
mod order;
mod pairing;
mod stage;
mod worker;

pub use event::KitchenEvent;
pub use order::{Order, OrderId};
pub use pairing::{Pairing, PairingOutcome};
pub use stage::{fixed_duration, per_topping_duration, DurationFn, Stage, StageSequence, StageSpec};
pub use worker::{Worker, WorkerId};
