//! Error types for the kitchen simulation.
//!
//! Only two kinds of failure are fatal to a run: a malformed stage table
//! (`ConfigurationDefect`) and a completion that does not match any active
//! pairing. A failed eligibility check inside the matching engine is a normal
//! negative result and never surfaces here.

use thiserror::Error;

use crate::models::{OrderId, WorkerId};
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KitchenError>;

/// Errors raised by configuration loading and the scheduling engine.
#[derive(Debug, Error)]
pub enum KitchenError {
    /// The successor function was asked about a stage outside the table
    /// or about the terminal stage.
    #[error("configuration defect: no successor for stage {stage}")]
    ConfigurationDefect { stage: String },

    /// The kitchen configuration failed validation.
    #[error("invalid configuration: {}", format_validation(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// A completion fired for a pairing the engine does not hold in flight.
    #[error("completion for unknown pairing (order {order}, worker {worker})")]
    UnknownPairing { order: OrderId, worker: WorkerId },

    /// No timers are pending but some orders never reached Done.
    #[error("kitchen stalled with {remaining} of {total} orders unfinished")]
    Stalled { remaining: usize, total: usize },

    /// Reading or writing a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or report could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
