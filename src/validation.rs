//! Validation for kitchen configurations and runtime state.
//!
//! Two kinds of checks:
//! - [`validate_config`]: structural integrity of a configuration before a
//!   run (empty batches, stations without workers, duplicate names, durations
//!   whose worst-case total does not fit in `u64` time units).
//! - [`audit_engine`]: the runtime invariants of a [`MatchingEngine`] at any
//!   instant between steps:
//!   - every order is in exactly one registry bucket, the one for its stage
//!   - buckets hold exactly the total number of orders
//!   - a worker or order is in at most one pairing
//!   - busy flags agree with the set of active pairings

use std::collections::{HashMap, HashSet};

use crate::config::{DurationScaling, KitchenConfig};
use crate::dispatching::MatchingEngine;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Order count, topping bound, or time unit is zero.
    EmptyParameter,
    /// No stations configured.
    NoStations,
    /// A station has no workers.
    NoWorkers,
    /// Two stations share a name.
    DuplicateStation,
    /// Station durations can push simulation time past `u64::MAX`.
    DurationOverflow,
    /// An order is missing from its stage bucket or sits in several buckets.
    RegistryMismatch,
    /// Bucket sizes do not add up to the order count.
    Conservation,
    /// A worker or order is in more than one pairing, or a pairing spans stations.
    DoubleBooking,
    /// A busy flag disagrees with the active pairings.
    BusyMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a kitchen configuration.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &KitchenConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.orders == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyParameter,
            "Order count must be positive",
        ));
    }
    if config.max_toppings == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyParameter,
            "Maximum topping bound must be positive",
        ));
    }
    if config.time_unit_ms == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyParameter,
            "Time unit must be positive",
        ));
    }
    if config.stations.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoStations,
            "At least one station is required",
        ));
    }

    let mut names = HashSet::new();
    for station in &config.stations {
        if station.workers == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoWorkers,
                format!("Station '{}' has no workers", station.name),
            ));
        }
        if !names.insert(station.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateStation,
                format!("Duplicate station name: {}", station.name),
            ));
        }
    }

    if worst_case_horizon(config).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DurationOverflow,
            format!(
                "Station durations overflow the time range for {} orders of up to {} toppings",
                config.orders,
                config.max_toppings.saturating_sub(1)
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Latest time any run of `config` can reach: every order visiting every
/// station one after another at its longest duration.
///
/// `None` if that sum does not fit in `u64`.
fn worst_case_horizon(config: &KitchenConfig) -> Option<u64> {
    let toppings = u64::from(config.max_toppings.saturating_sub(1));
    let per_order = config.stations.iter().try_fold(0u64, |total, station| {
        let longest = match station.scaling {
            DurationScaling::Fixed => station.base_duration,
            DurationScaling::PerTopping => station.base_duration.checked_mul(toppings)?.div_ceil(2),
        };
        total.checked_add(longest)
    })?;
    per_order.checked_mul(u64::try_from(config.orders).ok()?)
}

/// Checks the runtime invariants of an engine.
pub fn audit_engine(engine: &MatchingEngine) -> ValidationResult {
    let mut errors = Vec::new();
    let registry = engine.registry();

    let mut total = 0;
    for order in engine.orders() {
        total += 1;
        let stages = registry.stages_of(order.id);
        if stages != vec![order.stage] {
            errors.push(ValidationError::new(
                ValidationErrorKind::RegistryMismatch,
                format!(
                    "Order {} is at {} but registered at {:?}",
                    order.id, order.stage, stages
                ),
            ));
        }
    }
    if registry.total() != total {
        errors.push(ValidationError::new(
            ValidationErrorKind::Conservation,
            format!(
                "Registry holds {} orders, expected {}",
                registry.total(),
                total
            ),
        ));
    }

    // in_flight is keyed by order, so only workers can repeat
    let mut worker_load: HashMap<_, usize> = HashMap::new();
    for (order_id, worker_id) in engine.in_flight() {
        *worker_load.entry(worker_id).or_default() += 1;

        let order = engine.order(order_id);
        let worker = engine.pool().get(worker_id);
        match (order, worker) {
            (Some(order), Some(worker)) => {
                if order.stage != worker.stage() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DoubleBooking,
                        format!(
                            "Pairing of order {} and worker {} spans stations",
                            order_id, worker_id
                        ),
                    ));
                }
                if !order.busy || !worker.busy {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::BusyMismatch,
                        format!(
                            "Pairing of order {} and worker {} has a free party",
                            order_id, worker_id
                        ),
                    ));
                }
            }
            _ => errors.push(ValidationError::new(
                ValidationErrorKind::BusyMismatch,
                format!(
                    "Pairing references unknown order {} or worker {}",
                    order_id, worker_id
                ),
            )),
        }
    }
    for (worker_id, load) in &worker_load {
        if *load > 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::DoubleBooking,
                format!("Worker {} is in {} pairings", worker_id, load),
            ));
        }
    }

    let paired_orders: HashSet<_> = engine.in_flight().map(|(o, _)| o).collect();
    for order in engine.orders() {
        if order.busy && !paired_orders.contains(&order.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::BusyMismatch,
                format!("Order {} is busy without a pairing", order.id),
            ));
        }
    }
    for worker in engine.pool().iter() {
        if worker.busy && !worker_load.contains_key(&worker.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::BusyMismatch,
                format!("Worker {} is busy without a pairing", worker.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
