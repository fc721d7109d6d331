//! Per-stage order registry.
//!
//! Every order sits in exactly one bucket, the one for its current stage.
//! Buckets iterate in ascending order id, which is the scan order the
//! matching engine uses.

use std::collections::BTreeSet;

use crate::models::{OrderId, Stage};

/// Stage → orders currently positioned there, plus a `Done` bucket.
#[derive(Debug, Clone)]
pub struct Registry {
    stations: Vec<BTreeSet<OrderId>>,
    done: BTreeSet<OrderId>,
}

impl Registry {
    /// Creates empty buckets for `stations` stations and `Done`.
    pub fn new(stations: usize) -> Self {
        Self {
            stations: vec![BTreeSet::new(); stations],
            done: BTreeSet::new(),
        }
    }

    fn bucket(&self, stage: Stage) -> Option<&BTreeSet<OrderId>> {
        match stage {
            Stage::Station(index) => self.stations.get(index),
            Stage::Done => Some(&self.done),
        }
    }

    fn bucket_mut(&mut self, stage: Stage) -> Option<&mut BTreeSet<OrderId>> {
        match stage {
            Stage::Station(index) => self.stations.get_mut(index),
            Stage::Done => Some(&mut self.done),
        }
    }

    /// Places an order at `stage`. Returns `false` for an unknown stage or
    /// if the order was already there.
    pub fn insert(&mut self, stage: Stage, order: OrderId) -> bool {
        self.bucket_mut(stage).is_some_and(|b| b.insert(order))
    }

    /// Removes an order from `stage`. Returns whether it was present.
    pub fn remove(&mut self, stage: Stage, order: OrderId) -> bool {
        self.bucket_mut(stage).is_some_and(|b| b.remove(&order))
    }

    /// Moves an order between buckets. Returns `false` (and changes nothing)
    /// if the order is not at `from` or `to` is unknown.
    pub fn relocate(&mut self, order: OrderId, from: Stage, to: Stage) -> bool {
        if !self.contains(from, order) || self.bucket(to).is_none() {
            return false;
        }
        self.remove(from, order);
        self.insert(to, order)
    }

    /// Whether `order` is at `stage`.
    pub fn contains(&self, stage: Stage, order: OrderId) -> bool {
        self.bucket(stage).is_some_and(|b| b.contains(&order))
    }

    /// Orders at `stage` in scan order.
    pub fn orders_at(&self, stage: Stage) -> impl Iterator<Item = OrderId> + '_ {
        self.bucket(stage).into_iter().flatten().copied()
    }

    /// Number of orders at `stage`.
    pub fn len_at(&self, stage: Stage) -> usize {
        self.bucket(stage).map_or(0, BTreeSet::len)
    }

    /// Number of finished orders.
    pub fn done_count(&self) -> usize {
        self.done.len()
    }

    /// Number of orders across all buckets, `Done` included.
    pub fn total(&self) -> usize {
        self.stations.iter().map(BTreeSet::len).sum::<usize>() + self.done.len()
    }

    /// Stages whose bucket holds `order`.
    pub fn stages_of(&self, order: OrderId) -> Vec<Stage> {
        let mut found: Vec<Stage> = self
            .stations
            .iter()
            .enumerate()
            .filter(|(_, b)| b.contains(&order))
            .map(|(index, _)| Stage::Station(index))
            .collect();
        if self.done.contains(&order) {
            found.push(Stage::Done);
        }
        found
    }
}
