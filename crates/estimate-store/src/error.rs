//! Error types for the store and the round service

use crate::store::Table;
use estimate_core::{EstimateError, FactorError, ParticipantId, SessionCode, TaskId, TaskStatus};

/// Record store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with that id
    #[error("{table} record not found: {id}")]
    NotFound {
        /// Table searched
        table: Table,
        /// Requested id
        id: String,
    },

    /// Insert collided with an existing id
    #[error("{table} record already exists: {id}")]
    Duplicate {
        /// Target table
        table: Table,
        /// Colliding id
        id: String,
    },

    /// Another session already uses this join code
    #[error("session code already in use: {0}")]
    DuplicateCode(SessionCode),

    /// Task status change not allowed
    #[error("illegal task transition: {from} -> {to}")]
    IllegalTransition {
        /// Current status
        from: TaskStatus,
        /// Requested status
        to: TaskStatus,
    },

    /// Backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Not-found helper
    #[inline]
    pub fn not_found(table: Table, id: impl ToString) -> Self {
        Self::NotFound {
            table,
            id: id.to_string(),
        }
    }

    /// Whether a retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::DuplicateCode(_))
    }
}

/// Estimation round errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Submitted factors cannot be scored
    #[error("invalid factors: {0}")]
    InvalidFactors(#[from] FactorError),

    /// Buffer or multiplier rejected
    #[error("invalid adjustment: {0}")]
    InvalidAdjustment(#[from] EstimateError),

    /// Task is not accepting votes
    #[error("task {task} is not open for voting (status: {status})")]
    NotVoting {
        /// Task
        task: TaskId,
        /// Its status
        status: TaskStatus,
    },

    /// Participant is not part of the task's session
    #[error("participant {participant} is not in the session of task {task}")]
    UnknownParticipant {
        /// Participant
        participant: ParticipantId,
        /// Task
        task: TaskId,
    },

    /// Every generated code was already taken
    #[error("no free session code after {attempts} attempts")]
    CodeSpaceExhausted {
        /// Attempts made
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::FactorKind;

    #[test]
    fn store_error_display() {
        let err = StoreError::not_found(Table::Tasks, "abc");
        assert_eq!(err.to_string(), "tasks record not found: abc");
        assert!(!err.is_retryable());
        assert!(StoreError::Backend("timeout".into()).is_retryable());
    }

    #[test]
    fn service_error_from_factor_error() {
        let err: ServiceError = FactorError::Missing(FactorKind::Effort).into();
        assert!(err.to_string().contains("missing required factor: effort"));
    }

    #[test]
    fn illegal_transition_display() {
        let err = StoreError::IllegalTransition {
            from: TaskStatus::Completed,
            to: TaskStatus::Voting,
        };
        assert_eq!(err.to_string(), "illegal task transition: completed -> voting");
    }
}
