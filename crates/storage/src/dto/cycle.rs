use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::CycleStatus;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCycleRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    pub start_at: DateTime<Utc>,

    pub end_at: DateTime<Utc>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCycleRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub start_at: Option<DateTime<Utc>>,

    pub end_at: Option<DateTime<Utc>>,

    pub status: Option<CycleStatus>,
}

impl UpdateCycleRequest {
    pub fn status(status: CycleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
