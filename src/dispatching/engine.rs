//! Matching engine.
//!
//! Owns all mutable kitchen state (worker pool, registry, orders, progress)
//! and is the single authority for starting and finishing pairings.
//!
//! # Protocol
//!
//! 1. Anything that becomes free is announced as a [`Signal`] on an internal
//!    FIFO queue.
//! 2. [`MatchingEngine::drain`] pops signals one at a time. A freed order scans
//!    its station's workers in pool order; a freed worker scans its station's
//!    bucket in registry order. Each scan stops at the first started pairing.
//! 3. [`MatchingEngine::attempt_pairing`] re-checks eligibility and marks both
//!    parties busy in the same `&mut self` step, so no other pairing can claim
//!    either party in between.
//! 4. [`MatchingEngine::finish_pairing`] applies a completion: advance stage,
//!    move registry bucket, record progress, free both parties, then enqueue
//!    the freed signals and drain.
//!
//! Because every step takes `&mut self`, the caller serializes completions
//! simply by applying them one at a time.

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info};

use super::{ProgressTracker, Registry, WorkerPool};
use crate::error::{KitchenError, Result};
use crate::models::{
    KitchenEvent, Order, OrderId, Pairing, PairingOutcome, Stage, StageSequence, WorkerId,
};

/// A "became free" notification routed through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// A worker finished a pairing.
    WorkerFreed(WorkerId),
    /// An order finished a pairing (or was seeded).
    OrderFreed(OrderId),
    /// An order has zero work at `stage` and moves on without a worker.
    PassThrough { order: OrderId, stage: Stage },
}

/// Scheduler-owned kitchen state and the matching rules over it.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    sequence: StageSequence,
    pool: WorkerPool,
    registry: Registry,
    orders: BTreeMap<OrderId, Order>,
    tracker: ProgressTracker,
    in_flight: BTreeMap<OrderId, WorkerId>,
    signals: VecDeque<Signal>,
    now: u64,
    events: Vec<KitchenEvent>,
}

impl MatchingEngine {
    /// Builds the engine: one worker pool per station and every order placed
    /// in the bucket for its current stage.
    ///
    /// Order ids must be unique; a later order with a repeated id replaces
    /// the earlier one.
    pub fn new(sequence: StageSequence, orders: Vec<Order>) -> Self {
        let orders: BTreeMap<OrderId, Order> = orders.into_iter().map(|o| (o.id, o)).collect();
        let pool = WorkerPool::new(&sequence);
        let mut registry = Registry::new(sequence.len());
        let mut tracker = ProgressTracker::new(orders.len());

        for order in orders.values() {
            registry.insert(order.stage, order.id);
            if order.is_done() {
                tracker.record_done();
            }
        }

        // Empty batch, or every order arrived finished
        tracker.check_complete();
        let mut events = Vec::new();
        if tracker.is_complete() {
            info!(orders = tracker.total(), "all orders done before the run");
            events.push(KitchenEvent::AllDone { elapsed: 0 });
        }

        Self {
            sequence,
            pool,
            registry,
            orders,
            tracker,
            in_flight: BTreeMap::new(),
            signals: VecDeque::new(),
            now: 0,
            events,
        }
    }

    /// Seeds matching: announces every unfinished order once, then drains.
    ///
    /// Bounded by the initial batch; returns the pairings that started.
    pub fn seed(&mut self) -> Result<Vec<Pairing>> {
        let pending: Vec<OrderId> = self
            .orders
            .values()
            .filter(|o| !o.is_done())
            .map(|o| o.id)
            .collect();
        self.signals.extend(pending.into_iter().map(Signal::OrderFreed));
        self.drain()
    }

    /// Queues a signal for the next [`drain`](Self::drain).
    pub fn enqueue(&mut self, signal: Signal) {
        self.signals.push_back(signal);
    }

    /// Processes queued signals until the queue is empty.
    ///
    /// Returns every pairing started along the way, in start order.
    pub fn drain(&mut self) -> Result<Vec<Pairing>> {
        let mut started = Vec::new();
        while let Some(signal) = self.signals.pop_front() {
            let pairing = match signal {
                Signal::WorkerFreed(worker) => self.on_worker_freed(worker),
                Signal::OrderFreed(order) => self.on_order_freed(order),
                Signal::PassThrough { order, stage } => {
                    self.pass_through(order, stage)?;
                    None
                }
            };
            started.extend(pairing);
        }
        Ok(started)
    }

    /// A worker became free: pair it with the first free order at its station.
    pub fn on_worker_freed(&mut self, worker: WorkerId) -> Option<Pairing> {
        let stage = self.pool.get(worker)?.stage();
        let candidates: Vec<OrderId> = self
            .registry
            .orders_at(stage)
            .filter(|id| self.orders.get(id).is_some_and(Order::is_free))
            .collect();

        for order in candidates {
            // Deferred orders carry no work here; keep scanning for one that does.
            if let PairingOutcome::Started(pairing) = self.attempt_pairing(order, worker) {
                return Some(pairing);
            }
        }
        None
    }

    /// An order became free: pair it with the first free worker at its stage.
    ///
    /// No-op for finished orders.
    pub fn on_order_freed(&mut self, order: OrderId) -> Option<Pairing> {
        let stage = self.orders.get(&order).filter(|o| !o.is_done())?.stage;
        let candidates: Vec<WorkerId> = self.pool.free_at(stage).collect();

        for worker in candidates {
            match self.attempt_pairing(order, worker) {
                PairingOutcome::Started(pairing) => return Some(pairing),
                // Same station, same order: every other worker would defer too.
                PairingOutcome::Deferred => return None,
                PairingOutcome::Ineligible => continue,
            }
        }
        None
    }

    /// Starts a pairing if both parties are free and at the same station.
    ///
    /// A zero computed duration starts nothing and schedules the order to
    /// pass through the station instead.
    pub fn attempt_pairing(&mut self, order_id: OrderId, worker_id: WorkerId) -> PairingOutcome {
        let (Some(order), Some(worker)) = (self.orders.get(&order_id), self.pool.get(worker_id))
        else {
            return PairingOutcome::Ineligible;
        };
        if !order.is_free() || worker.busy || order.stage != worker.stage() {
            return PairingOutcome::Ineligible;
        }

        let stage = order.stage;
        let Some(spec) = self.sequence.spec(stage) else {
            return PairingOutcome::Ineligible;
        };
        let duration = spec.duration_for(order);
        if duration == 0 {
            debug!(
                order = order_id,
                stage = %spec.name,
                "zero-length work, deferring pairing"
            );
            self.signals.push_back(Signal::PassThrough {
                order: order_id,
                stage,
            });
            return PairingOutcome::Deferred;
        }

        if let Some(order) = self.orders.get_mut(&order_id) {
            order.busy = true;
        }
        if let Some(worker) = self.pool.get_mut(worker_id) {
            worker.busy = true;
        }
        self.in_flight.insert(order_id, worker_id);

        let pairing = Pairing {
            order: order_id,
            worker: worker_id,
            stage,
            started_at: self.now,
            duration,
        };
        info!(
            order = order_id,
            worker = %worker_id,
            stage = self.sequence.name(stage),
            duration,
            at = self.now,
            "pairing started"
        );
        self.events.push(KitchenEvent::PairingStarted {
            order: order_id,
            worker: worker_id,
            stage,
            duration,
            at: self.now,
        });
        PairingOutcome::Started(pairing)
    }

    /// Applies a completion and returns the pairings it triggered.
    ///
    /// Order of effects: advance the stage, move the registry entry, record
    /// progress, free the order, free the worker, then announce both (the
    /// order only if it is not finished) and drain.
    pub fn finish_pairing(&mut self, pairing: Pairing) -> Result<Vec<Pairing>> {
        let unknown = || KitchenError::UnknownPairing {
            order: pairing.order,
            worker: pairing.worker,
        };
        if self.in_flight.get(&pairing.order) != Some(&pairing.worker) {
            return Err(unknown());
        }
        let from = self.orders.get(&pairing.order).ok_or_else(unknown)?.stage;
        if from != pairing.stage {
            return Err(unknown());
        }

        self.now = self.now.max(pairing.ends_at());
        let to = self.sequence.next(from)?;
        self.in_flight.remove(&pairing.order);
        self.advance(pairing.order, from, to);

        if let Some(order) = self.orders.get_mut(&pairing.order) {
            order.busy = false;
        }
        if let Some(worker) = self.pool.get_mut(pairing.worker) {
            worker.busy = false;
        }

        if !to.is_done() {
            self.signals.push_back(Signal::OrderFreed(pairing.order));
        }
        self.signals.push_back(Signal::WorkerFreed(pairing.worker));
        self.drain()
    }

    fn pass_through(&mut self, order_id: OrderId, stage: Stage) -> Result<()> {
        // Stale if the order already moved on or got paired meanwhile.
        if !self
            .orders
            .get(&order_id)
            .is_some_and(|o| o.stage == stage && o.is_free())
        {
            return Ok(());
        }

        let to = self.sequence.next(stage)?;
        debug!(
            order = order_id,
            stage = self.sequence.name(stage),
            "passing through without a worker"
        );
        self.events.push(KitchenEvent::StagePassed {
            order: order_id,
            stage,
            at: self.now,
        });
        self.advance(order_id, stage, to);
        if !to.is_done() {
            self.signals.push_back(Signal::OrderFreed(order_id));
        }
        Ok(())
    }

    /// Moves an order to `to`, keeping registry and progress in step.
    fn advance(&mut self, order_id: OrderId, from: Stage, to: Stage) {
        let moved = self.registry.relocate(order_id, from, to);
        debug_assert!(moved, "order {order_id} missing from {from} bucket");

        let Some(order) = self.orders.get_mut(&order_id) else {
            return;
        };
        order.stage = to;
        if !to.is_done() {
            return;
        }

        let elapsed = self.now.saturating_sub(order.created_at);
        info!(order = order_id, elapsed, "order done");
        self.events.push(KitchenEvent::OrderDone {
            order: order_id,
            elapsed,
            at: self.now,
        });
        if self.tracker.record_done() {
            info!(elapsed = self.now, orders = self.tracker.total(), "all orders done");
            self.events.push(KitchenEvent::AllDone { elapsed: self.now });
        }
    }

    /// Current simulation time (time units).
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Events emitted so far, in emission order.
    pub fn events(&self) -> &[KitchenEvent] {
        &self.events
    }

    /// Takes the event log, leaving it empty.
    pub fn take_events(&mut self) -> Vec<KitchenEvent> {
        std::mem::take(&mut self.events)
    }

    /// Looks up an order.
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// All orders, by id.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Active pairings as order → worker.
    pub fn in_flight(&self) -> impl Iterator<Item = (OrderId, WorkerId)> + '_ {
        self.in_flight.iter().map(|(o, w)| (*o, *w))
    }

    /// Stage table.
    pub fn sequence(&self) -> &StageSequence {
        &self.sequence
    }

    /// Worker pool.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Order registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Progress tracker.
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Whether every order has reached `Done`.
    pub fn is_complete(&self) -> bool {
        self.tracker.is_complete()
    }
}
