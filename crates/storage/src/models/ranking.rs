use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Ranking {
    pub ranking_id: Uuid,
    pub cycle_id: Uuid,
    pub team_id: Option<Uuid>,
    pub nominee_user_id: Uuid,
    pub total_score: Decimal,
    pub rank: i32,
    pub computed_at: DateTime<Utc>,
}
