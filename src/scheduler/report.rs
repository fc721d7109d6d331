//! Run metrics.
//!
//! Computes kitchen performance indicators from the event log of a finished
//! run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Time at which the last order reached Done |
//! | Avg Flow Time | Mean time from creation to Done |
//! | Max Flow Time | Largest single creation-to-Done time |
//! | Station Utilization | busy time / (workers * makespan) |

use serde::{Deserialize, Serialize};

use crate::models::{KitchenEvent, StageSequence};

/// Per-station indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    /// Station name.
    pub name: String,
    /// Worker count.
    pub workers: usize,
    /// Pairings started at this station.
    pub pairings: usize,
    /// Orders that passed through without a worker.
    pub passed: usize,
    /// Sum of pairing durations (time units).
    pub busy_time: u64,
    /// Fraction of worker capacity spent busy (0.0..1.0).
    pub utilization: f64,
}

/// Summary of a kitchen run.
///
/// All time values are in simulation time units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Orders that reached Done.
    pub orders_done: usize,
    /// Time the last order reached Done.
    pub makespan: u64,
    /// Mean creation-to-Done time.
    pub avg_flow_time: f64,
    /// Largest creation-to-Done time.
    pub max_flow_time: u64,
    /// Whether the global completion signal fired.
    pub completed: bool,
    /// Per-station indicators, in pipeline order.
    pub stations: Vec<StationReport>,
    /// Full event log.
    pub events: Vec<KitchenEvent>,
}

impl RunReport {
    /// Computes the report from an event log.
    pub fn calculate(sequence: &StageSequence, events: Vec<KitchenEvent>) -> Self {
        let mut stations: Vec<StationReport> = sequence
            .stages()
            .iter()
            .map(|spec| StationReport {
                name: spec.name.clone(),
                workers: spec.workers,
                pairings: 0,
                passed: 0,
                busy_time: 0,
                utilization: 0.0,
            })
            .collect();

        let mut orders_done = 0;
        let mut total_flow: u64 = 0;
        let mut max_flow_time = 0;
        let mut last_done_at = 0;
        let mut completed = false;
        let mut makespan = None;

        for event in &events {
            match event {
                KitchenEvent::PairingStarted {
                    stage, duration, ..
                } => {
                    if let Some(station) = stage.station().and_then(|i| stations.get_mut(i)) {
                        station.pairings += 1;
                        station.busy_time = station.busy_time.saturating_add(*duration);
                    }
                }
                KitchenEvent::StagePassed { stage, .. } => {
                    if let Some(station) = stage.station().and_then(|i| stations.get_mut(i)) {
                        station.passed += 1;
                    }
                }
                KitchenEvent::OrderDone { elapsed, at, .. } => {
                    orders_done += 1;
                    total_flow = total_flow.saturating_add(*elapsed);
                    max_flow_time = max_flow_time.max(*elapsed);
                    last_done_at = last_done_at.max(*at);
                }
                KitchenEvent::AllDone { elapsed } => {
                    completed = true;
                    makespan = Some(*elapsed);
                }
            }
        }

        let makespan = makespan.unwrap_or(last_done_at);
        for station in &mut stations {
            let capacity = (station.workers as u64).saturating_mul(makespan);
            station.utilization = if capacity == 0 {
                0.0
            } else {
                station.busy_time as f64 / capacity as f64
            };
        }

        let avg_flow_time = if orders_done == 0 {
            0.0
        } else {
            total_flow as f64 / orders_done as f64
        };

        Self {
            orders_done,
            makespan,
            avg_flow_time,
            max_flow_time,
            completed,
            stations,
            events,
        }
    }

    /// Total pairings started across all stations.
    pub fn pairing_count(&self) -> usize {
        self.stations.iter().map(|s| s.pairings).sum()
    }

    /// The station with the highest utilization, if any.
    pub fn bottleneck(&self) -> Option<&StationReport> {
        self.stations.iter().max_by(|a, b| {
            a.utilization
                .partial_cmp(&b.utilization)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
