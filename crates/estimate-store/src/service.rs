//! Estimation rounds
//!
//! Wires the record store to the scoring engine:
//! - Sessions get a join code nobody else holds
//! - Votes are validated at submission and stored with their factors
//! - Reveal re-scores every stored vote
//! - Finalization records base points plus adjustments on the task

use crate::error::{ServiceError, StoreError};
use crate::lifecycle::validate_transition;
use crate::store::RecordStore;
use estimate_core::{
    aggregate, estimate, generate_session_code_with, try_finalize, validate, EstimationFactors,
    Participant, ParticipantId, Session, SessionCode, SessionId, StoredFactors, Task, TaskId,
    TaskStatus, Vote, VoteSummary,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Code draws before giving up on session creation
    pub max_code_attempts: u32,
}

impl ServiceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max code attempts (at least one)
    #[inline]
    #[must_use]
    pub fn with_max_code_attempts(mut self, attempts: u32) -> Self {
        self.max_code_attempts = attempts.max(1);
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_code_attempts: 10,
        }
    }
}

/// Runs estimation rounds against a record store
#[derive(Debug)]
pub struct EstimationService<S> {
    store: Arc<S>,
    config: ServiceConfig,
}

impl<S> Clone for EstimationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: RecordStore> EstimationService<S> {
    /// Create service
    #[must_use]
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Open a session under a fresh join code
    ///
    /// # Errors
    /// [`ServiceError::CodeSpaceExhausted`] if every drawn code was taken
    pub async fn create_session(&self, name: &str) -> Result<Session, ServiceError> {
        let mut rng = StdRng::from_entropy();
        self.create_session_with_rng(name, &mut rng).await
    }

    /// [`create_session`](Self::create_session) with a caller-supplied RNG
    pub async fn create_session_with_rng<R: Rng + Send>(
        &self,
        name: &str,
        rng: &mut R,
    ) -> Result<Session, ServiceError> {
        let attempts = self.config.max_code_attempts.max(1);
        for attempt in 1..=attempts {
            let code = generate_session_code_with(&mut *rng);
            if self.store.session_by_code(&code).await?.is_some() {
                tracing::debug!(%code, attempt, "session code taken, drawing again");
                continue;
            }
            let session = Session::new(code, name);
            match self.store.insert_session(session.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        session_id = %session.id,
                        code = %session.code,
                        "session created"
                    );
                    return Ok(session);
                }
                Err(StoreError::DuplicateCode(code)) => {
                    tracing::debug!(%code, attempt, "session code raced, drawing again");
                }
                Err(err) => return Err(err.into()),
            }
        }
        tracing::warn!(attempts, "could not allocate a session code");
        Err(ServiceError::CodeSpaceExhausted { attempts })
    }

    /// Join a session by code
    pub async fn join(
        &self,
        code: &SessionCode,
        name: &str,
        is_moderator: bool,
    ) -> Result<Participant, ServiceError> {
        let session = self
            .store
            .session_by_code(code)
            .await?
            .ok_or_else(|| StoreError::not_found(crate::store::Table::Sessions, code))?;
        let participant = Participant::new(session.id, name, is_moderator);
        self.store.insert_participant(participant.clone()).await?;
        tracing::info!(
            session_id = %session.id,
            participant_id = %participant.id,
            "participant joined"
        );
        Ok(participant)
    }

    /// Add a pending task to a session
    pub async fn add_task(&self, session_id: SessionId, title: &str) -> Result<Task, ServiceError> {
        let task = Task::new(session_id, title);
        self.store.insert_task(task.clone()).await?;
        Ok(task)
    }

    /// Open a task for voting
    pub async fn start_voting(&self, task_id: TaskId) -> Result<Task, ServiceError> {
        let task = self.transition(task_id, TaskStatus::Voting).await?;
        tracing::info!(task_id = %task_id, "voting started");
        Ok(task)
    }

    /// Submit or replace a participant's vote
    ///
    /// The selection must be complete; it is stored alongside its score so
    /// the vote can be re-scored later.
    ///
    /// # Errors
    /// - [`ServiceError::InvalidFactors`] for an incomplete or invalid selection
    /// - [`ServiceError::NotVoting`] if the task is not accepting votes
    /// - [`ServiceError::UnknownParticipant`] if the voter is not in the session
    ///
    /// The status check reads the task before the write; see
    /// [`RecordStore::upsert_vote`] for votes that race a reveal.
    pub async fn submit_vote(
        &self,
        task_id: TaskId,
        participant_id: ParticipantId,
        factors: &EstimationFactors,
    ) -> Result<Vote, ServiceError> {
        let complete = validate(factors)?;

        let task = self.store.task(task_id).await?;
        if task.status != TaskStatus::Voting {
            return Err(ServiceError::NotVoting {
                task: task_id,
                status: task.status,
            });
        }

        let in_session = self
            .store
            .participants(task.session_id)
            .await?
            .iter()
            .any(|p| p.id == participant_id);
        if !in_session {
            return Err(ServiceError::UnknownParticipant {
                participant: participant_id,
                task: task_id,
            });
        }

        let points = estimate(&complete).points;
        let vote = Vote::new(
            task_id,
            participant_id,
            points,
            Some(StoredFactors::Current(factors.clone())),
        );
        let stored = self.store.upsert_vote(vote).await?;
        tracing::debug!(
            task_id = %task_id,
            participant_id = %participant_id,
            points,
            "vote stored"
        );
        Ok(stored)
    }

    /// Close voting and summarize the votes
    ///
    /// Revealing an already revealed task only recomputes the summary.
    /// `None` when nobody voted.
    pub async fn reveal(&self, task_id: TaskId) -> Result<Option<VoteSummary>, ServiceError> {
        let task = self.store.task(task_id).await?;
        if task.status != TaskStatus::VotingCompleted {
            self.transition(task_id, TaskStatus::VotingCompleted).await?;
        }

        let votes = self.store.votes(task_id).await?;
        let summary = aggregate(&votes);
        if let Some(s) = &summary {
            tracing::info!(
                task_id = %task_id,
                count = s.count,
                average = s.average,
                min = s.min,
                max = s.max,
                "votes revealed"
            );
        }
        Ok(summary)
    }

    /// Record the final estimate and complete the task
    ///
    /// # Errors
    /// [`ServiceError::InvalidAdjustment`] for a negative or non-finite buffer,
    /// or a multiplier that is not positive and finite
    pub async fn finalize_task(
        &self,
        task_id: TaskId,
        base_estimate: u32,
        meeting_buffer: f64,
        iteration_multiplier: f64,
    ) -> Result<Task, ServiceError> {
        let total = try_finalize(base_estimate, meeting_buffer, iteration_multiplier)?;

        let mut task = self.store.task(task_id).await?;
        validate_transition(task.status, TaskStatus::Completed)?;
        task.status = TaskStatus::Completed;
        task.final_estimate = Some(base_estimate);
        task.meeting_buffer = meeting_buffer;
        task.iteration_multiplier = iteration_multiplier;
        self.store.update_task(task.clone()).await?;

        tracing::info!(task_id = %task_id, base_estimate, total, "task finalized");
        Ok(task)
    }

    /// Discard all votes and reopen voting after a reveal
    pub async fn reset_votes(&self, task_id: TaskId) -> Result<usize, ServiceError> {
        let task = self.store.task(task_id).await?;
        if task.status == TaskStatus::VotingCompleted {
            self.transition(task_id, TaskStatus::Voting).await?;
        } else if task.status != TaskStatus::Voting {
            return Err(ServiceError::NotVoting {
                task: task_id,
                status: task.status,
            });
        }
        let removed = self.store.clear_votes(task_id).await?;
        tracing::info!(task_id = %task_id, removed, "votes reset");
        Ok(removed)
    }

    async fn transition(&self, task_id: TaskId, to: TaskStatus) -> Result<Task, ServiceError> {
        let mut task = self.store.task(task_id).await?;
        validate_transition(task.status, to)?;
        task.status = to;
        self.store.update_task(task.clone()).await?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = ServiceConfig::new().with_max_code_attempts(0);
        assert_eq!(config.max_code_attempts, 1);
        assert_eq!(ServiceConfig::default().max_code_attempts, 10);
    }
}
