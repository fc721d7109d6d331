//! Kitchen runtime, completion clocks, and run metrics.
//!
//! # Algorithm
//!
//! [`Kitchen`] seeds the [`MatchingEngine`](crate::dispatching::MatchingEngine)
//! with the order batch, then feeds it completions from a [`CompletionClock`]
//! one at a time until every order is done.
//!
//! # Clocks
//!
//! - [`TokioClock`]: real-time tokio timers, one per active pairing.
//! - [`VirtualClock`]: discrete-event queue, no real waiting.
//!
//! # Report
//!
//! [`RunReport`] computes makespan, flow times, and per-station utilization
//! from the event log.

mod clock;
mod kitchen;
mod report;

pub use clock::{CompletionClock, TokioClock, VirtualClock};
pub use kitchen::Kitchen;
pub use report::{RunReport, StationReport};
