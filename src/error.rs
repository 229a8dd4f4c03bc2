//! Crate-wide error type.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias for fallible flow-shop operations.
pub type FlowShopResult<T> = Result<T, FlowShopError>;

/// Errors surfaced to callers.
///
/// Search exhaustion and timeouts are not errors; they are reported through
/// [`SearchStatus`](crate::bnb::SearchStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowShopError {
    /// The job list is empty or holds negative times.
    #[error("invalid input: {}", format_errors(.0))]
    InvalidInput(Vec<ValidationError>),
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A job sequence is not a permutation of the instance's job ids.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    /// The recorded machine markers do not match the job order.
    #[error("inconsistent decision trace: {0}")]
    InconsistentTrace(String),
    /// The search stopped before any feasible schedule was recorded.
    #[error("search stopped before a feasible schedule was found")]
    NoIncumbent,
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
