//! Matching of free workers to free orders.
//!
//! Holds the per-station worker pools, the per-stage order registry, the
//! progress tracker, and the [`MatchingEngine`] that owns them all.
//!
//! # Usage
//!
//! ```
//! use pizza_kitchen::dispatching::MatchingEngine;
//! use pizza_kitchen::models::{Order, StageSequence, StageSpec};
//!
//! let sequence = StageSequence::new(vec![
//!     StageSpec::new("dough", 1, 7),
//!     StageSpec::new("oven", 1, 10),
//! ]);
//! let mut engine = MatchingEngine::new(sequence, vec![Order::new(0, 3)]);
//!
//! let started = engine.seed().unwrap();
//! assert_eq!(started.len(), 1);
//! assert_eq!(started[0].duration, 7);
//! ```

mod engine;
mod pool;
mod progress;
mod registry;

pub use engine::{MatchingEngine, Signal};
pub use pool::WorkerPool;
pub use progress::ProgressTracker;
pub use registry::Registry;
