//! Scheduler error types

use predcache_domain::PredCacheError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Invalid schedule configuration
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let pred_err = match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                PredCacheError::InvalidInput(err.to_string())
            }
            SchedulerError::InvalidSchedule(_) => PredCacheError::Config(err.to_string()),
            SchedulerError::Timeout { .. } => PredCacheError::Timeout(err.to_string()),
            SchedulerError::TaskJoinFailed(_) => PredCacheError::Internal(err.to_string()),
        };
        InfraError(pred_err)
    }
}

impl From<SchedulerError> for PredCacheError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
