use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::NominationStatus;

/// Upper bound of an approval rating, matching `ck_approval_rating_range`
pub const MAX_RATING: Decimal = Decimal::TEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "approval_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl ApprovalAction {
    pub fn resulting_status(&self) -> NominationStatus {
        match self {
            Self::Approve => NominationStatus::Approved,
            Self::Reject => NominationStatus::Rejected,
        }
    }

    pub fn audit_action(&self) -> &'static str {
        match self {
            Self::Approve => "nomination.approve",
            Self::Reject => "nomination.reject",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Approval {
    pub approval_id: Uuid,
    pub nomination_id: Uuid,
    pub actor_user_id: Uuid,
    pub action: ApprovalAction,
    pub reason: Option<String>,
    /// Overall rating on a 0-10 scale
    pub rating: Option<Decimal>,
    pub acted_at: DateTime<Utc>,
}

/// Per-criterion rating given by an approver, bounded by the criterion weight
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApprovalCriteriaReview {
    pub review_id: Uuid,
    pub approval_id: Uuid,
    pub criteria_id: Uuid,
    pub rating: Decimal,
    pub comment: Option<String>,
}
