use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::CriteriaConfig;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCriteriaRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    pub weight: Decimal,

    pub description: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub config: Option<CriteriaConfig>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCriteriaRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub weight: Option<Decimal>,

    pub description: Option<String>,

    pub is_active: Option<bool>,

    pub config: Option<CriteriaConfig>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CriteriaListParams {
    #[serde(default = "default_active")]
    pub active_only: bool,
}

impl Default for CriteriaListParams {
    fn default() -> Self {
        Self { active_only: true }
    }
}
