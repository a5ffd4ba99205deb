//! In-process record store
//!
//! Backs demo mode and tests. Tables are concurrent maps; every write is
//! broadcast on the change feed. Sends with no subscribers are dropped.

use crate::error::StoreError;
use crate::store::{ChangeEvent, ChangeKind, RecordStore, Table};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use estimate_core::{
    Participant, ParticipantId, Session, SessionCode, SessionId, Task, TaskId, Vote,
};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Change feed buffer per subscriber
const EVENT_CAPACITY: usize = 256;

/// Concurrent in-memory store
#[derive(Debug)]
pub struct MemoryStore {
    sessions: DashMap<SessionId, Session>,
    codes: DashMap<SessionCode, SessionId>,
    participants: DashMap<ParticipantId, Participant>,
    tasks: DashMap<TaskId, Task>,
    votes: DashMap<(TaskId, ParticipantId), Vote>,
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sessions: DashMap::new(),
            codes: DashMap::new(),
            participants: DashMap::new(),
            tasks: DashMap::new(),
            votes: DashMap::new(),
            events,
        }
    }

    /// Total votes across all tasks
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    fn emit(&self, table: Table, kind: ChangeKind, id: Uuid) {
        let _ = self.events.send(ChangeEvent::new(table, kind, id));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_session(&self, session: Session) -> Result<(), StoreError> {
        // Claiming the code is the commit point; lock order is codes, then sessions
        match self.codes.entry(session.code.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateCode(session.code)),
            Entry::Vacant(code_slot) => match self.sessions.entry(session.id) {
                Entry::Occupied(_) => Err(StoreError::Duplicate {
                    table: Table::Sessions,
                    id: session.id.to_string(),
                }),
                Entry::Vacant(slot) => {
                    let id = session.id.0;
                    code_slot.insert(session.id);
                    slot.insert(session);
                    self.emit(Table::Sessions, ChangeKind::Insert, id);
                    Ok(())
                }
            },
        }
    }

    async fn session(&self, id: SessionId) -> Result<Session, StoreError> {
        self.sessions
            .get(&id)
            .map(|s| s.clone())
            .ok_or_else(|| StoreError::not_found(Table::Sessions, id))
    }

    async fn session_by_code(&self, code: &SessionCode) -> Result<Option<Session>, StoreError> {
        let Some(id) = self.codes.get(code).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn insert_participant(&self, participant: Participant) -> Result<(), StoreError> {
        if !self.sessions.contains_key(&participant.session_id) {
            return Err(StoreError::not_found(Table::Sessions, participant.session_id));
        }
        match self.participants.entry(participant.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                table: Table::Participants,
                id: participant.id.to_string(),
            }),
            Entry::Vacant(slot) => {
                let id = participant.id.0;
                slot.insert(participant);
                self.emit(Table::Participants, ChangeKind::Insert, id);
                Ok(())
            }
        }
    }

    async fn participants(&self, session_id: SessionId) -> Result<Vec<Participant>, StoreError> {
        let mut found: Vec<Participant> = self
            .participants
            .iter()
            .filter(|p| p.session_id == session_id)
            .map(|p| p.clone())
            .collect();
        found.sort_by_key(|p| p.joined_at);
        Ok(found)
    }

    async fn insert_task(&self, task: Task) -> Result<(), StoreError> {
        if !self.sessions.contains_key(&task.session_id) {
            return Err(StoreError::not_found(Table::Sessions, task.session_id));
        }
        match self.tasks.entry(task.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                table: Table::Tasks,
                id: task.id.to_string(),
            }),
            Entry::Vacant(slot) => {
                let id = task.id.0;
                slot.insert(task);
                self.emit(Table::Tasks, ChangeKind::Insert, id);
                Ok(())
            }
        }
    }

    async fn task(&self, id: TaskId) -> Result<Task, StoreError> {
        self.tasks
            .get(&id)
            .map(|t| t.clone())
            .ok_or_else(|| StoreError::not_found(Table::Tasks, id))
    }

    async fn update_task(&self, task: Task) -> Result<(), StoreError> {
        match self.tasks.get_mut(&task.id) {
            Some(mut existing) => {
                let id = task.id.0;
                *existing = task;
                drop(existing);
                self.emit(Table::Tasks, ChangeKind::Update, id);
                Ok(())
            }
            None => Err(StoreError::not_found(Table::Tasks, task.id)),
        }
    }

    async fn tasks(&self, session_id: SessionId) -> Result<Vec<Task>, StoreError> {
        let mut found: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.session_id == session_id)
            .map(|t| t.clone())
            .collect();
        found.sort_by_key(|t| t.created_at);
        Ok(found)
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<Vote, StoreError> {
        if !self.tasks.contains_key(&vote.task_id) {
            return Err(StoreError::not_found(Table::Tasks, vote.task_id));
        }
        let (stored, kind) = match self.votes.entry((vote.task_id, vote.participant_id)) {
            Entry::Occupied(mut slot) => {
                let replacement = Vote {
                    id: slot.get().id,
                    ..vote
                };
                slot.insert(replacement.clone());
                (replacement, ChangeKind::Update)
            }
            Entry::Vacant(slot) => {
                slot.insert(vote.clone());
                (vote, ChangeKind::Insert)
            }
        };
        self.emit(Table::Votes, kind, stored.id.0);
        Ok(stored)
    }

    async fn votes(&self, task_id: TaskId) -> Result<Vec<Vote>, StoreError> {
        let mut found: Vec<Vote> = self
            .votes
            .iter()
            .filter(|v| v.task_id == task_id)
            .map(|v| v.clone())
            .collect();
        found.sort_by_key(|v| v.created_at);
        Ok(found)
    }

    async fn clear_votes(&self, task_id: TaskId) -> Result<usize, StoreError> {
        let keys: Vec<_> = self
            .votes
            .iter()
            .filter(|v| v.task_id == task_id)
            .map(|v| *v.key())
            .collect();
        let mut removed = 0;
        for key in keys {
            if let Some((_, vote)) = self.votes.remove(&key) {
                removed += 1;
                self.emit(Table::Votes, ChangeKind::Delete, vote.id.0);
            }
        }
        Ok(removed)
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::generate_session_code;
    use std::sync::Arc;

    async fn seeded() -> (MemoryStore, Session, Task) {
        let store = MemoryStore::new();
        let session = Session::new(generate_session_code(), "Sprint 12");
        store.insert_session(session.clone()).await.unwrap();
        let task = Task::new(session.id, "Onboarding flow");
        store.insert_task(task.clone()).await.unwrap();
        (store, session, task)
    }

    #[tokio::test]
    async fn upsert_replaces_existing_vote() {
        let (store, _, task) = seeded().await;
        let voter = ParticipantId::new();

        let first = store
            .upsert_vote(Vote::new(task.id, voter, 5, None))
            .await
            .unwrap();
        let second = store
            .upsert_vote(Vote::new(task.id, voter, 8, None))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let votes = store.votes(task.id).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, 8);
    }

    #[tokio::test]
    async fn duplicate_code_rejected() {
        let (store, session, _) = seeded().await;
        let clash = Session::new(session.code.clone(), "Other");
        assert!(matches!(
            store.insert_session(clash).await,
            Err(StoreError::DuplicateCode(_))
        ));
        assert!(store.session_by_code(&session.code).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_claims_on_one_code_admit_one_session() {
        let store = Arc::new(MemoryStore::new());
        let code = generate_session_code();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                let session = Session::new(code.clone(), format!("Racer {i}"));
                tokio::spawn(async move { store.insert_session(session).await })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => admitted += 1,
                Err(err) => assert!(matches!(err, StoreError::DuplicateCode(_))),
            }
        }
        assert_eq!(admitted, 1);
        assert!(store.session_by_code(&code).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn writes_are_broadcast() {
        let (store, _, task) = seeded().await;
        let mut feed = store.subscribe();

        let vote = store
            .upsert_vote(Vote::new(task.id, ParticipantId::new(), 3, None))
            .await
            .unwrap();
        assert_eq!(
            feed.recv().await.unwrap(),
            ChangeEvent::new(Table::Votes, ChangeKind::Insert, vote.id.0)
        );

        store.clear_votes(task.id).await.unwrap();
        assert_eq!(feed.recv().await.unwrap().kind, ChangeKind::Delete);
    }

    #[tokio::test]
    async fn missing_records() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.task(TaskId::new()).await,
            Err(StoreError::NotFound {
                table: Table::Tasks,
                ..
            })
        ));
        let orphan = Task::new(SessionId::new(), "orphan");
        assert!(store.insert_task(orphan).await.is_err());
    }
}
