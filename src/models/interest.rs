use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of an interest. `Accepted` and `Rejected` are terminal; a pair
/// with a record in any status can never receive a second proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "interest_status", rename_all = "snake_case")]
pub enum InterestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InterestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InterestStatus::Accepted | InterestStatus::Rejected)
    }
}

/// The receiver's verdict on a pending interest. Kept separate from
/// [`InterestStatus`] so `pending` is not an assignable decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveDecision {
    Accepted,
    Rejected,
}

impl From<ResolveDecision> for InterestStatus {
    fn from(decision: ResolveDecision) -> Self {
        match decision {
            ResolveDecision::Accepted => InterestStatus::Accepted,
            ResolveDecision::Rejected => InterestStatus::Rejected,
        }
    }
}

/// Which side of an interest a listing is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestRole {
    Sender,
    Receiver,
    Either,
}

/// A directed matrimonial proposal from one member to another. Records are
/// history: they are never deleted and never re-enter `pending`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Interest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: InterestStatus,
    pub created_at: DateTime<Utc>,
}

impl Interest {
    /// True when `a` and `b` are the two participants, in either direction.
    pub fn links(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}
