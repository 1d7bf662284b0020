//! Order flow error taxonomy
//!
//! [`FlowError`] is what the coordinator and its flows return. It carries
//! the outcome a caller can act on; the API layer converts it 1:1 into
//! [`AppError`] without inventing new meanings on the way.

use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stale expectation: the stored state moved under the caller. The
    /// caller re-reads and decides; nothing here retries.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Claim or handover lost to another staff member
    #[error("Already assigned: {0}")]
    AlreadyAssigned(String),

    /// Duplicate payment confirmation
    #[error("Already paid: {0}")]
    AlreadyPaid(String),

    /// Placement raced for a table that is not available
    #[error("Table unavailable: {0}")]
    AlreadyOccupied(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type FlowResult<T> = Result<T, FlowError>;

impl From<RepoError> for FlowError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => FlowError::NotFound(msg),
            RepoError::Duplicate(msg) => FlowError::Conflict(msg),
            RepoError::Conflict(msg) => FlowError::Conflict(msg),
            RepoError::Validation(msg) => FlowError::Validation(msg),
            RepoError::Database(msg) => FlowError::Storage(msg),
        }
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::NotFound(msg) => AppError::NotFound(msg),
            FlowError::Conflict(msg) => AppError::Conflict(msg),
            FlowError::InvalidTransition(msg) => AppError::InvalidTransition(msg),
            FlowError::AlreadyAssigned(msg) => AppError::AlreadyAssigned(msg),
            FlowError::AlreadyPaid(msg) => AppError::AlreadyPaid(msg),
            FlowError::AlreadyOccupied(msg) => AppError::AlreadyOccupied(msg),
            FlowError::Validation(msg) => AppError::Validation(msg),
            FlowError::Storage(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_error_keeps_its_meaning_through_app_error() {
        let err: AppError = FlowError::AlreadyPaid("ref pay_1".to_string()).into();
        assert!(matches!(err, AppError::AlreadyPaid(_)));

        let err: AppError = FlowError::AlreadyOccupied("Table 5 is occupied".to_string()).into();
        assert!(matches!(err, AppError::AlreadyOccupied(_)));

        let err: AppError = FlowError::InvalidTransition("pending -> ready".to_string()).into();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn test_repo_error_folds_into_flow_error() {
        let err: FlowError = RepoError::Conflict("Order is preparing".to_string()).into();
        assert!(matches!(err, FlowError::Conflict(_)));

        let err: FlowError = RepoError::Database("io".to_string()).into();
        assert!(matches!(err, FlowError::Storage(_)));
    }
}
