//! Task status transitions
//!
//! A task moves Pending → Voting → VotingCompleted → Completed. Voting can be
//! reopened after a reveal, and a task may be completed without one.

use crate::error::StoreError;
use estimate_core::TaskStatus;

/// Validates a task status change.
///
/// Voting may be reopened after a reveal; a completed task is final.
///
/// # Errors
/// [`StoreError::IllegalTransition`] for any step not in [`allowed_transitions`]
pub fn validate_transition(from: TaskStatus, to: TaskStatus) -> Result<(), StoreError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(StoreError::IllegalTransition { from, to })
    }
}

/// Statuses reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: TaskStatus) -> &'static [TaskStatus] {
    match from {
        TaskStatus::Pending => &[TaskStatus::Voting],
        TaskStatus::Voting => &[TaskStatus::VotingCompleted, TaskStatus::Completed],
        TaskStatus::VotingCompleted => &[TaskStatus::Voting, TaskStatus::Completed],
        TaskStatus::Completed => &[],
    }
}
