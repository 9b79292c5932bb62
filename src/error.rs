//! Error types for rescheduling operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::CycleId;
use crate::validation::ValidationError;

/// Errors raised by the engine and its collaborators.
///
/// Every operation aborts before its write when an error is returned,
/// so retrying the whole read → compute → write sequence is always safe.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Target event or cycle is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Staff pairing changed during a date projection.
    #[error("Invariant violation in cycle {cycle_id}: {message}")]
    InvariantViolation { cycle_id: CycleId, message: String },

    /// The snapshot read before computing is stale.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Cadence search ran past its bound.
    #[error("Cadence search from {from} exceeded {limit_days} days")]
    ComputationUnbounded { from: NaiveDate, limit_days: u32 },

    /// Loaded schedule data failed structural validation.
    #[error("Invalid schedule data: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// Operation arguments are unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed or is out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collaborator failure not covered by another variant.
    #[error("Store error: {0}")]
    Store(String),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
