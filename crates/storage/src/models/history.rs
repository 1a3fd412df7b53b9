use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Snapshot of a nomination taken when its cycle was finalized
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NominationHistory {
    pub history_id: Uuid,
    pub source_nomination_id: Uuid,
    pub cycle_id: Uuid,
    pub nominee_user_id: Uuid,
    pub team_id: Option<Uuid>,
    pub submitted_by: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a ranking row taken when its cycle was finalized
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RankingHistory {
    pub history_id: Uuid,
    pub source_ranking_id: Uuid,
    pub cycle_id: Uuid,
    pub team_id: Option<Uuid>,
    pub nominee_user_id: Uuid,
    pub total_score: Decimal,
    pub rank: i32,
    pub computed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
