//! Kitchen runtime: bootstrap and the completion loop.
//!
//! # Algorithm
//!
//! 1. Build the stage table and worker pools, create the order batch at the
//!    first station.
//! 2. Seed: announce every order once; schedule the pairings that start.
//! 3. Await the next completion from the clock, apply it to the engine,
//!    schedule whatever it triggered.
//! 4. Stop when the clock runs dry.
//!
//! Completions are applied strictly one at a time by this loop, which is
//! the only writer of engine state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{CompletionClock, RunReport};
use crate::config::KitchenConfig;
use crate::dispatching::MatchingEngine;
use crate::error::{KitchenError, Result};
use crate::models::{Order, StageSequence};
use crate::validation::audit_engine;

/// A configured kitchen, ready to run once.
///
/// # Example
///
/// ```
/// use pizza_kitchen::models::{Order, StageSequence, StageSpec};
/// use pizza_kitchen::scheduler::{Kitchen, VirtualClock};
///
/// let sequence = StageSequence::new(vec![
///     StageSpec::new("dough", 1, 7),
///     StageSpec::new("oven", 1, 10),
/// ]);
/// let kitchen = Kitchen::new(sequence, vec![Order::new(0, 2), Order::new(1, 2)]);
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let report = runtime
///     .block_on(kitchen.run(&mut VirtualClock::new()))
///     .unwrap();
/// assert_eq!(report.orders_done, 2);
/// assert_eq!(report.makespan, 27);
/// ```
#[derive(Debug, Clone)]
pub struct Kitchen {
    engine: MatchingEngine,
}

impl Kitchen {
    /// Creates a kitchen from a stage table and an explicit order batch.
    pub fn new(sequence: StageSequence, orders: Vec<Order>) -> Self {
        Self {
            engine: MatchingEngine::new(sequence, orders),
        }
    }

    /// Creates a kitchen from configuration, drawing topping counts from the
    /// configured seed (or the OS if unset).
    pub fn from_config(config: &KitchenConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Creates a kitchen from configuration with a caller-supplied RNG.
    ///
    /// The batch is exactly `config.orders` orders with ids `0..orders`.
    pub fn with_rng<R: Rng>(config: &KitchenConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let orders = (0..config.orders)
            .map(|id| Order::new(id, rng.random_range(0..config.max_toppings)))
            .collect();
        Ok(Self::new(config.stage_sequence(), orders))
    }

    /// Engine state, for inspection before the run.
    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Runs the kitchen to completion on `clock`.
    ///
    /// A batch with no unfinished orders (including an empty one) completes
    /// immediately at t=0. Fails with [`KitchenError::Stalled`] if the clock runs dry while some
    /// orders are unfinished.
    pub async fn run<C: CompletionClock>(mut self, clock: &mut C) -> Result<RunReport> {
        let total = self.engine.tracker().total();
        info!(
            orders = total,
            stations = self.engine.sequence().len(),
            workers = self.engine.pool().len(),
            "kitchen opening"
        );

        for pairing in self.engine.seed()? {
            clock.schedule(pairing);
        }
        self.debug_audit();

        while let Some(pairing) = clock.next_due().await {
            debug!(
                order = pairing.order,
                worker = %pairing.worker,
                at = pairing.ends_at(),
                "pairing finished"
            );
            for next in self.engine.finish_pairing(pairing)? {
                clock.schedule(next);
            }
            self.debug_audit();
        }

        if !self.engine.is_complete() {
            return Err(KitchenError::Stalled {
                remaining: self.engine.tracker().remaining(),
                total,
            });
        }

        let events = self.engine.take_events();
        Ok(RunReport::calculate(self.engine.sequence(), events))
    }

    fn debug_audit(&self) {
        debug_assert!(
            audit_engine(&self.engine).is_ok(),
            "kitchen invariants violated: {:?}",
            audit_engine(&self.engine)
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::config::StationConfig;
    use crate::models::{per_topping_duration, KitchenEvent, Stage, StageSpec, WorkerId};
    use crate::validation::ValidationErrorKind;
    use crate::scheduler::{TokioClock, VirtualClock};

    fn sequence(workers: [usize; 4]) -> StageSequence {
        StageSequence::new(vec![
            StageSpec::new("dough", workers[0], 7),
            StageSpec::new("toppings", workers[1], 4).with_duration_fn(per_topping_duration),
            StageSpec::new("oven", workers[2], 10),
            StageSpec::new("waiter", workers[3], 5),
        ])
    }

    fn started(event: &KitchenEvent) -> Option<(usize, WorkerId, Stage, u64, u64)> {
        match *event {
            KitchenEvent::PairingStarted {
                order,
                worker,
                stage,
                duration,
                at,
            } => Some((order, worker, stage, duration, at)),
            _ => None,
        }
    }

    fn single_order_events() -> Vec<KitchenEvent> {
        vec![
            KitchenEvent::PairingStarted {
                order: 0,
                worker: WorkerId::new(0, 0),
                stage: Stage::Station(0),
                duration: 7,
                at: 0,
            },
            KitchenEvent::PairingStarted {
                order: 0,
                worker: WorkerId::new(1, 0),
                stage: Stage::Station(1),
                duration: 8,
                at: 7,
            },
            KitchenEvent::PairingStarted {
                order: 0,
                worker: WorkerId::new(2, 0),
                stage: Stage::Station(2),
                duration: 10,
                at: 15,
            },
            KitchenEvent::PairingStarted {
                order: 0,
                worker: WorkerId::new(3, 0),
                stage: Stage::Station(3),
                duration: 5,
                at: 25,
            },
            KitchenEvent::OrderDone {
                order: 0,
                elapsed: 30,
                at: 30,
            },
            KitchenEvent::AllDone { elapsed: 30 },
        ]
    }

    #[tokio::test]
    async fn test_single_order_end_to_end() {
        let kitchen = Kitchen::new(sequence([1, 1, 1, 1]), vec![Order::new(0, 4)]);
        let report = kitchen.run(&mut VirtualClock::new()).await.unwrap();

        assert_eq!(report.events, single_order_events());
        assert_eq!(report.makespan, 30);
        assert!(report.completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_order_real_time() {
        let kitchen = Kitchen::new(sequence([1, 1, 1, 1]), vec![Order::new(0, 4)]);
        let mut clock = TokioClock::from_millis(1000);
        let origin = clock.origin();
        let report = kitchen.run(&mut clock).await.unwrap();

        assert_eq!(report.events, single_order_events());
        assert_eq!(origin.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_oven_waits_for_single_worker() {
        // Both orders clear dough and toppings together and reach the oven at t=15
        let kitchen = Kitchen::new(
            sequence([2, 2, 1, 2]),
            vec![Order::new(0, 4), Order::new(1, 4)],
        );
        let report = kitchen.run(&mut VirtualClock::new()).await.unwrap();

        let oven: Vec<_> = report
            .events
            .iter()
            .filter_map(started)
            .filter(|(_, _, stage, _, _)| *stage == Stage::Station(2))
            .collect();
        assert_eq!(oven.len(), 2);
        assert_eq!(oven[0].4, 15);
        // Second oven pairing only once the first one ends
        assert_eq!(oven[1].4, 25);
        assert_eq!(report.makespan, 40);
    }

    #[tokio::test]
    async fn test_default_kitchen_invariants() {
        let config = KitchenConfig {
            orders: 25,
            seed: Some(7),
            ..KitchenConfig::default()
        };
        let kitchen = Kitchen::from_config(&config).unwrap();
        assert_eq!(kitchen.engine().orders().count(), 25);
        assert!(kitchen.engine().orders().all(|o| o.toppings < 14));

        let report = kitchen.run(&mut VirtualClock::new()).await.unwrap();
        assert_eq!(report.orders_done, 25);

        // Completion fires once, last
        let all_done = report
            .events
            .iter()
            .filter(|e| matches!(e, KitchenEvent::AllDone { .. }))
            .count();
        assert_eq!(all_done, 1);
        assert!(matches!(report.events.last(), Some(KitchenEvent::AllDone { .. })));

        // Stages strictly advance per order, no station skipped
        let mut visited: HashMap<usize, Vec<Stage>> = HashMap::new();
        for event in &report.events {
            match *event {
                KitchenEvent::PairingStarted { order, stage, .. }
                | KitchenEvent::StagePassed { order, stage, .. } => {
                    visited.entry(order).or_default().push(stage)
                }
                _ => {}
            }
        }
        for stages in visited.values() {
            let expected: Vec<_> = (0..4).map(Stage::Station).collect();
            assert_eq!(stages, &expected);
        }

        // No worker holds two overlapping pairings
        let mut by_worker: HashMap<WorkerId, Vec<(u64, u64)>> = HashMap::new();
        for (_, worker, _, duration, at) in report.events.iter().filter_map(started) {
            by_worker.entry(worker).or_default().push((at, at + duration));
        }
        for intervals in by_worker.values_mut() {
            intervals.sort();
            for pair in intervals.windows(2) {
                assert!(pair[0].1 <= pair[1].0, "overlap: {pair:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_run() {
        let config = KitchenConfig {
            seed: Some(99),
            ..KitchenConfig::default()
        };
        let a = Kitchen::from_config(&config)
            .unwrap()
            .run(&mut VirtualClock::new())
            .await
            .unwrap();
        let b = Kitchen::from_config(&config)
            .unwrap()
            .run(&mut VirtualClock::new())
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_zero_topping_order_still_finishes() {
        let kitchen = Kitchen::new(sequence([1, 1, 1, 1]), vec![Order::new(0, 0)]);
        let report = kitchen.run(&mut VirtualClock::new()).await.unwrap();
        // 7 (dough) + 0 (toppings passed) + 10 (oven) + 5 (waiter)
        assert_eq!(report.makespan, 22);
        assert_eq!(report.stations[1].passed, 1);
        assert_eq!(report.stations[1].pairings, 0);
    }

    #[tokio::test]
    async fn test_station_without_workers_stalls() {
        let kitchen = Kitchen::new(sequence([1, 1, 0, 1]), vec![Order::new(0, 2)]);
        let err = kitchen.run(&mut VirtualClock::new()).await.unwrap_err();
        assert!(matches!(
            err,
            KitchenError::Stalled {
                remaining: 1,
                total: 1
            }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = KitchenConfig {
            max_toppings: 0,
            ..KitchenConfig::default()
        };
        assert!(matches!(
            Kitchen::from_config(&config),
            Err(KitchenError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_finished_batch_reports_completed() {
        let mut done = Order::new(0, 3);
        done.stage = Stage::Done;
        let report = Kitchen::new(sequence([1, 1, 1, 1]), vec![done])
            .run(&mut VirtualClock::new())
            .await
            .unwrap();
        assert!(report.completed);
        assert_eq!(report.makespan, 0);
        assert_eq!(report.events, vec![KitchenEvent::AllDone { elapsed: 0 }]);
    }

    #[tokio::test]
    async fn test_empty_batch_completes() {
        let report = Kitchen::new(sequence([1, 1, 1, 1]), Vec::new())
            .run(&mut VirtualClock::new())
            .await
            .unwrap();
        assert!(report.completed);
        assert_eq!(report.orders_done, 0);
        assert_eq!(report.pairing_count(), 0);
    }

    #[test]
    fn test_overflowing_durations_rejected() {
        let config = KitchenConfig {
            orders: 1,
            seed: Some(1),
            stations: vec![StationConfig::per_topping("toppings", 1, u64::MAX / 2)],
            ..KitchenConfig::default()
        };
        match Kitchen::from_config(&config) {
            Err(KitchenError::InvalidConfig(errors)) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::DurationOverflow));
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_huge_duration_without_validation_saturates() {
        let sequence = StageSequence::new(vec![
            StageSpec::new("toppings", 1, u64::MAX / 2).with_duration_fn(per_topping_duration),
            StageSpec::new("oven", 1, u64::MAX),
        ]);
        let report = Kitchen::new(sequence, vec![Order::new(0, 13)])
            .run(&mut VirtualClock::new())
            .await
            .unwrap();
        assert!(report.completed);
        assert_eq!(report.makespan, u64::MAX);
    }
}
