//! Stage model and the static stage sequence.
//!
//! The kitchen is a fixed, linear pipeline of stations followed by a terminal
//! `Done` pseudo-stage. Each station is described by a row of a stage-indexed
//! table ([`StageSpec`]); station-specific duration scaling is a function
//! pointer in that row rather than a per-station type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Order;
use crate::error::{KitchenError, Result};

/// Computes the processing duration for an order at a station.
///
/// Receives the station's base duration and the order being processed.
pub type DurationFn = fn(u64, &Order) -> u64;

/// Position of an order in the pipeline.
///
/// The derived ordering is the pipeline order: stations by index, then `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// A processing station, indexed from 0.
    Station(usize),
    /// Terminal pseudo-stage.
    Done,
}

impl Stage {
    /// The first station of every pipeline.
    pub const FIRST: Stage = Stage::Station(0);

    /// Whether this is the terminal stage.
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, Stage::Done)
    }

    /// Station index, or `None` for `Done`.
    #[inline]
    pub fn station(self) -> Option<usize> {
        match self {
            Stage::Station(index) => Some(index),
            Stage::Done => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Station(index) => write!(f, "station {index}"),
            Stage::Done => f.write_str("done"),
        }
    }
}

/// Base duration, no scaling.
pub fn fixed_duration(base: u64, _order: &Order) -> u64 {
    base
}

/// `ceil(base * toppings / 2)`, saturating at `u64::MAX / 2 + 1`.
pub fn per_topping_duration(base: u64, order: &Order) -> u64 {
    base.saturating_mul(u64::from(order.toppings)).div_ceil(2)
}

/// One row of the stage table.
#[derive(Clone)]
pub struct StageSpec {
    /// Station name used in logs and reports.
    pub name: String,
    /// Base processing duration in time units.
    pub base_duration: u64,
    /// Number of workers permanently assigned to this station.
    pub workers: usize,
    /// Duration rule for this station.
    pub duration_fn: DurationFn,
}

impl StageSpec {
    /// Creates a station with a fixed duration.
    pub fn new(name: impl Into<String>, workers: usize, base_duration: u64) -> Self {
        Self {
            name: name.into(),
            base_duration,
            workers,
            duration_fn: fixed_duration,
        }
    }

    /// Replaces the duration rule.
    pub fn with_duration_fn(mut self, duration_fn: DurationFn) -> Self {
        self.duration_fn = duration_fn;
        self
    }

    /// Processing duration for `order` at this station.
    #[inline]
    pub fn duration_for(&self, order: &Order) -> u64 {
        (self.duration_fn)(self.base_duration, order)
    }
}

impl fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("base_duration", &self.base_duration)
            .field("workers", &self.workers)
            .finish()
    }
}

/// The ordered, immutable list of stations.
#[derive(Debug, Clone)]
pub struct StageSequence {
    stages: Vec<StageSpec>,
}

impl StageSequence {
    /// Creates a sequence from station rows, in pipeline order.
    pub fn new(stages: Vec<StageSpec>) -> Self {
        Self { stages }
    }

    /// Number of stations (excluding `Done`).
    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether there are no stations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Successor of `stage`.
    ///
    /// The last station's successor is `Done`. Asking for the successor of
    /// `Done` or of an index outside the table is a configuration defect.
    pub fn next(&self, stage: Stage) -> Result<Stage> {
        match stage {
            Stage::Station(index) if index + 1 < self.stages.len() => Ok(Stage::Station(index + 1)),
            Stage::Station(index) if index + 1 == self.stages.len() => Ok(Stage::Done),
            other => Err(KitchenError::ConfigurationDefect {
                stage: other.to_string(),
            }),
        }
    }

    /// Station row for `stage`, `None` for `Done` or unknown indices.
    pub fn spec(&self, stage: Stage) -> Option<&StageSpec> {
        stage.station().and_then(|index| self.stages.get(index))
    }

    /// Display name for `stage`.
    pub fn name(&self, stage: Stage) -> &str {
        self.spec(stage).map(|s| s.name.as_str()).unwrap_or("done")
    }

    /// All station rows in pipeline order.
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    /// All stations as `Stage` values, in pipeline order.
    pub fn stations(&self) -> impl Iterator<Item = Stage> + '_ {
        (0..self.stages.len()).map(Stage::Station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen_sequence() -> StageSequence {
        StageSequence::new(vec![
            StageSpec::new("dough", 2, 7),
            StageSpec::new("toppings", 3, 4).with_duration_fn(per_topping_duration),
            StageSpec::new("oven", 1, 10),
            StageSpec::new("waiter", 2, 5),
        ])
    }

    #[test]
    fn test_next_is_linear() {
        let seq = kitchen_sequence();
        assert_eq!(seq.next(Stage::Station(0)).unwrap(), Stage::Station(1));
        assert_eq!(seq.next(Stage::Station(1)).unwrap(), Stage::Station(2));
        // oven → waiter must not be a dead transition
        assert_eq!(seq.next(Stage::Station(2)).unwrap(), Stage::Station(3));
        assert_eq!(seq.next(Stage::Station(3)).unwrap(), Stage::Done);
    }

    #[test]
    fn test_next_of_done_is_defect() {
        let seq = kitchen_sequence();
        assert!(matches!(
            seq.next(Stage::Done),
            Err(KitchenError::ConfigurationDefect { .. })
        ));
        assert!(matches!(
            seq.next(Stage::Station(9)),
            Err(KitchenError::ConfigurationDefect { .. })
        ));
    }

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::Station(0) < Stage::Station(3));
        assert!(Stage::Station(3) < Stage::Done);
        assert!(Stage::Done.is_done());
        assert_eq!(Stage::Station(2).station(), Some(2));
        assert_eq!(Stage::Done.station(), None);
    }

    #[test]
    fn test_duration_rules() {
        let seq = kitchen_sequence();
        let order = Order::new(0, 4);
        assert_eq!(seq.spec(Stage::Station(0)).unwrap().duration_for(&order), 7);
        // ceil(4 * 4 / 2) = 8
        assert_eq!(seq.spec(Stage::Station(1)).unwrap().duration_for(&order), 8);

        let odd = Order::new(1, 3);
        // ceil(4 * 3 / 2) = 6
        assert_eq!(seq.spec(Stage::Station(1)).unwrap().duration_for(&odd), 6);
        assert_eq!(per_topping_duration(5, &odd), 8); // ceil(7.5)

        let plain = Order::new(2, 0);
        assert_eq!(per_topping_duration(4, &plain), 0);
    }

    #[test]
    fn test_per_topping_duration_saturates() {
        let order = Order::new(0, 13);
        assert_eq!(per_topping_duration(u64::MAX / 2, &order), u64::MAX / 2 + 1);
    }

    #[test]
    fn test_names() {
        let seq = kitchen_sequence();
        assert_eq!(seq.name(Stage::Station(2)), "oven");
        assert_eq!(seq.name(Stage::Done), "done");
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.stations().count(), 4);
    }
}
