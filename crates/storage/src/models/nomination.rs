use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Answer;

/// Bounds of the legacy integer score; ranking multiplies it by the criterion weight
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "nomination_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NominationStatus {
    Pending,
    Approved,
    Rejected,
}

impl NominationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Nomination {
    pub nomination_id: Uuid,
    pub cycle_id: Uuid,
    pub nominee_user_id: Uuid,
    pub team_id: Option<Uuid>,
    pub submitted_by: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: NominationStatus,
}

/// One answer row of a nomination (table `nomination_criteria_scores`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CriteriaScore {
    pub score_id: Uuid,
    pub nomination_id: Uuid,
    pub criteria_id: Uuid,
    /// Legacy numeric score
    pub score: Option<i32>,
    #[schema(value_type = Option<Answer>)]
    pub answer: Option<Json<Answer>>,
    pub comment: Option<String>,
}
