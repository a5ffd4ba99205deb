//! Records exchanged with the record store
//!
//! The engine never talks to storage. These are the shapes it expects to be
//! handed: sessions, participants, tasks and votes.

use crate::aggregate::finalize;
use crate::buckets::TShirtSize;
use crate::factors::{sanitize_buffer, sanitize_multiplier};
use crate::legacy::StoredFactors;
use crate::session_code::SessionCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random id
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Estimation session identifier
    SessionId
);
record_id!(
    /// Participant identifier
    ParticipantId
);
record_id!(
    /// Task identifier
    TaskId
);
record_id!(
    /// Vote identifier
    VoteId
);

/// An estimation room, joined by code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Id
    pub id: SessionId,
    /// Join code
    pub code: SessionCode,
    /// Display name
    pub name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh id
    #[must_use]
    pub fn new(code: SessionCode, name: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            code,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Someone in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Id
    pub id: ParticipantId,
    /// Session joined
    pub session_id: SessionId,
    /// Display name
    pub name: String,
    /// Moderators start rounds and finalize tasks
    pub is_moderator: bool,
    /// Join time
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Create a participant with a fresh id
    #[must_use]
    pub fn new(session_id: SessionId, name: impl Into<String>, is_moderator: bool) -> Self {
        Self {
            id: ParticipantId::new(),
            session_id,
            name: name.into(),
            is_moderator,
            joined_at: Utc::now(),
        }
    }
}

/// Where a task is in its estimation round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet opened for voting
    Pending,
    /// Accepting votes
    Voting,
    /// Votes revealed, awaiting a final estimate
    VotingCompleted,
    /// Final estimate recorded
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Voting => "voting",
            TaskStatus::VotingCompleted => "voting_completed",
            TaskStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A design task being estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Id
    pub id: TaskId,
    /// Owning session
    pub session_id: SessionId,
    /// Title
    pub title: String,
    /// Optional details
    #[serde(default)]
    pub description: Option<String>,
    /// Round status
    pub status: TaskStatus,
    /// Moderator-chosen base points
    #[serde(default)]
    pub final_estimate: Option<u32>,
    /// Buffer applied at finalization
    #[serde(default)]
    pub meeting_buffer: f64,
    /// Multiplier applied at finalization
    #[serde(default = "default_multiplier")]
    pub iteration_multiplier: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Task {
    /// Create a pending task
    #[must_use]
    pub fn new(session_id: SessionId, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            session_id,
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            final_estimate: None,
            meeting_buffer: 0.0,
            iteration_multiplier: 1.0,
            created_at: Utc::now(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Total points shown on cards, history and exports
    ///
    /// `None` until a final estimate exists. Stored adjustments that are out
    /// of range are read as "no buffer" and "single pass".
    #[must_use]
    pub fn total_points(&self) -> Option<u32> {
        self.final_estimate.map(|base| {
            finalize(
                base,
                sanitize_buffer(Some(self.meeting_buffer)),
                sanitize_multiplier(Some(self.iteration_multiplier)),
            )
        })
    }

    /// Size label of the total
    #[must_use]
    pub fn tshirt_size(&self) -> Option<TShirtSize> {
        self.total_points().map(TShirtSize::for_points)
    }
}

/// One participant's estimate for one task
///
/// At most one vote exists per (task, participant); a resubmission replaces
/// the earlier vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Id
    pub id: VoteId,
    /// Task voted on
    pub task_id: TaskId,
    /// Voter
    pub participant_id: ParticipantId,
    /// Point total at submission time
    pub value: u32,
    /// Selection the value was computed from; absent on the oldest votes
    #[serde(default)]
    pub factors: Option<StoredFactors>,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// Create a vote with a fresh id
    #[must_use]
    pub fn new(
        task_id: TaskId,
        participant_id: ParticipantId,
        value: u32,
        factors: Option<StoredFactors>,
    ) -> Self {
        Self {
            id: VoteId::new(),
            task_id,
            participant_id,
            value,
            factors,
            created_at: Utc::now(),
        }
    }
}
