//! Record store interface
//!
//! The hosted backend is reached through tables of records, filtered by a
//! key and ordered by a single field. Every write is announced on a change
//! feed so other clients can refresh.

use crate::error::StoreError;
use async_trait::async_trait;
use estimate_core::{Participant, Session, SessionCode, SessionId, Task, TaskId, Vote};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Tables the estimator reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Sessions
    Sessions,
    /// Participants
    Participants,
    /// Tasks
    Tasks,
    /// Votes
    Votes,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Table::Sessions => "sessions",
            Table::Participants => "participants",
            Table::Tasks => "tasks",
            Table::Votes => "votes",
        };
        f.write_str(name)
    }
}

/// Kind of write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// New record
    Insert,
    /// Existing record replaced
    Update,
    /// Record removed
    Delete,
}

/// Change feed notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Table written
    pub table: Table,
    /// Kind of write
    pub kind: ChangeKind,
    /// Id of the record written
    pub id: Uuid,
}

impl ChangeEvent {
    /// Create event
    #[inline]
    #[must_use]
    pub fn new(table: Table, kind: ChangeKind, id: Uuid) -> Self {
        Self { table, kind, id }
    }
}

/// Persistence for sessions, participants, tasks and votes
///
/// Lists come back ordered by creation/join time, oldest first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a session; its code must be unused
    ///
    /// The code check and the insert are one atomic step: of two sessions
    /// racing for a code, exactly one gets [`StoreError::DuplicateCode`].
    async fn insert_session(&self, session: Session) -> Result<(), StoreError>;

    /// Fetch a session
    async fn session(&self, id: SessionId) -> Result<Session, StoreError>;

    /// Find the session using a join code
    async fn session_by_code(&self, code: &SessionCode) -> Result<Option<Session>, StoreError>;

    /// Insert a participant
    async fn insert_participant(&self, participant: Participant) -> Result<(), StoreError>;

    /// Participants of a session
    async fn participants(&self, session_id: SessionId) -> Result<Vec<Participant>, StoreError>;

    /// Insert a task
    async fn insert_task(&self, task: Task) -> Result<(), StoreError>;

    /// Fetch a task
    async fn task(&self, id: TaskId) -> Result<Task, StoreError>;

    /// Replace an existing task
    async fn update_task(&self, task: Task) -> Result<(), StoreError>;

    /// Tasks of a session
    async fn tasks(&self, session_id: SessionId) -> Result<Vec<Task>, StoreError>;

    /// Insert or replace the vote for (task, participant)
    ///
    /// A replacement keeps the id of the vote it replaces. Returns the
    /// stored vote.
    ///
    /// The task's status is not consulted. Callers gate on `Voting` before
    /// writing, so a vote racing a reveal may land after voting closed; the
    /// next reveal or reset accounts for it.
    async fn upsert_vote(&self, vote: Vote) -> Result<Vote, StoreError>;

    /// Votes for a task
    async fn votes(&self, task_id: TaskId) -> Result<Vec<Vote>, StoreError>;

    /// Delete every vote for a task, returning how many were removed
    async fn clear_votes(&self, task_id: TaskId) -> Result<usize, StoreError>;

    /// Subscribe to the change feed
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
