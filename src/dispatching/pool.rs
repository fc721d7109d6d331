//! Per-station worker pools.

use crate::models::{Stage, StageSequence, Worker, WorkerId};

/// Fixed collection of workers for every station, established at startup.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    stations: Vec<Vec<Worker>>,
}

impl WorkerPool {
    /// Creates `spec.workers` free workers for each station of `sequence`.
    pub fn new(sequence: &StageSequence) -> Self {
        let stations = sequence
            .stages()
            .iter()
            .enumerate()
            .map(|(station, spec)| {
                (0..spec.workers)
                    .map(|slot| Worker::new(WorkerId::new(station, slot)))
                    .collect()
            })
            .collect();
        Self { stations }
    }

    /// Workers at `stage`, in pool order. Empty for `Done`.
    pub fn workers(&self, stage: Stage) -> &[Worker] {
        stage
            .station()
            .and_then(|index| self.stations.get(index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks up a worker.
    pub fn get(&self, id: WorkerId) -> Option<&Worker> {
        self.stations.get(id.station)?.get(id.slot)
    }

    /// Looks up a worker mutably.
    pub fn get_mut(&mut self, id: WorkerId) -> Option<&mut Worker> {
        self.stations.get_mut(id.station)?.get_mut(id.slot)
    }

    /// Free workers at `stage`, in pool order.
    pub fn free_at(&self, stage: Stage) -> impl Iterator<Item = WorkerId> + '_ {
        self.workers(stage)
            .iter()
            .filter(|w| !w.busy)
            .map(|w| w.id)
    }

    /// Number of busy workers at `stage`.
    pub fn busy_count(&self, stage: Stage) -> usize {
        self.workers(stage).iter().filter(|w| w.busy).count()
    }

    /// Every worker, station by station.
    pub fn iter(&self) -> impl Iterator<Item = &Worker> {
        self.stations.iter().flatten()
    }

    /// Total number of workers.
    pub fn len(&self) -> usize {
        self.stations.iter().map(Vec::len).sum()
    }

    /// Whether the pool has no workers at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
