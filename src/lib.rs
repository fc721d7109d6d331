//! Staged kitchen simulation.
//!
//! A small, fixed pool of workers at each station serves a larger batch of
//! pizza orders that must pass through every station in order. Whenever a
//! worker or an order becomes free, the matching engine decides which pair
//! starts next, while keeping every worker and every order in at most one
//! pairing at a time.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Stage`, `StageSequence`, `Order`, `Worker`,
//!   `Pairing`, `KitchenEvent`
//! - **`dispatching`**: `WorkerPool`, `Registry`, `ProgressTracker`, and the
//!   `MatchingEngine` that owns them
//! - **`scheduler`**: `Kitchen` runtime, completion clocks, `RunReport`
//! - **`config`**: `KitchenConfig` with JSON loading and defaults
//! - **`validation`**: configuration checks and runtime invariant audit
//!
//! # Usage
//!
//! ```
//! use pizza_kitchen::config::KitchenConfig;
//! use pizza_kitchen::scheduler::{Kitchen, VirtualClock};
//!
//! let config = KitchenConfig {
//!     seed: Some(1),
//!     ..KitchenConfig::default()
//! };
//! let kitchen = Kitchen::from_config(&config).unwrap();
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let report = runtime.block_on(kitchen.run(&mut VirtualClock::new())).unwrap();
//! assert_eq!(report.orders_done, 10);
//! ```

pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::KitchenConfig;
pub use error::{KitchenError, Result};
pub use scheduler::{Kitchen, RunReport};
