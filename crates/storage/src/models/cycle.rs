use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a nomination cycle: DRAFT -> OPEN -> CLOSED -> FINALIZED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cycle_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleStatus {
    Draft,
    Open,
    Closed,
    Finalized,
}

impl CycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Finalized => "FINALIZED",
        }
    }

    /// The single state reachable from this one, if any
    pub fn next(&self) -> Option<CycleStatus> {
        match self {
            Self::Draft => Some(Self::Open),
            Self::Open => Some(Self::Closed),
            Self::Closed => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }

    /// Staying put is always allowed; otherwise only one step forward.
    pub fn can_transition_to(&self, target: CycleStatus) -> bool {
        *self == target || self.next() == Some(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cycle {
    pub cycle_id: Uuid,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: CycleStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cycle {
    /// Bounds are stored as TIMESTAMPTZ and decoded as UTC, so the comparison
    /// is between instants regardless of the zone they were submitted in.
    pub fn accepts_submissions_at(&self, now: DateTime<Utc>) -> bool {
        self.status == CycleStatus::Open && self.start_at <= now && now <= self.end_at
    }
}
