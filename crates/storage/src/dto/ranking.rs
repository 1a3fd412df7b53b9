use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RankingFilter {
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinalizeResult {
    pub cycle_id: Uuid,
    pub rankings_created: usize,
    pub nominations_snapshotted: usize,
}
